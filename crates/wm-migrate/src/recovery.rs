//! Classify a failed migration step

use crate::error::MigrateError;

/// How a failed step is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The operator cancelled: end the run quietly
    Cancel,
    /// Ask the operator whether to ignore the failure or quit
    AskOperator,
}

/// Route an apply error to its recovery path
pub fn classify(error: &MigrateError) -> Recovery {
    if error.is_cancelled() {
        Recovery::Cancel
    } else {
        Recovery::AskOperator
    }
}
