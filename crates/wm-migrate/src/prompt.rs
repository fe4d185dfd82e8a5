//! Prompt service consumed by the decision gate
//!
//! The hosting application supplies the concrete prompt (a terminal, a
//! dialog toolkit, a script). Calls block the migration run until answered.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{MigrateError, MigrateResult};

/// Severity of a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Info,
    Error,
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptKind::Info => write!(f, "info"),
            PromptKind::Error => write!(f, "error"),
        }
    }
}

/// A blocking multiple-choice question
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub kind: PromptKind,
    pub title: &'a str,
    pub message: &'a str,
    /// Button labels, in display order
    pub options: &'a [&'static str],
}

/// Human-facing prompt service
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Show `request` and return the chosen label.
    ///
    /// Implementations must return one of `request.options`.
    async fn ask(&self, request: &PromptRequest<'_>) -> MigrateResult<String>;

    /// Ask for a directory, `None` if the operator gave up.
    async fn select_directory(&self, title: &str, default: &Path)
        -> MigrateResult<Option<PathBuf>>;
}

/// A prompt that was shown by [`ScriptedPrompt`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskedPrompt {
    pub title: String,
    pub options: Vec<String>,
}

/// Prompt answered from a fixed list of replies, for unattended runs.
///
/// Each call consumes the next reply. For [`Prompt::select_directory`] an
/// empty reply means the operator cancelled. Running out of replies is an
/// error rather than a silent default.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    replies: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<AskedPrompt>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Parse a reply file: one reply per line, `#` comments ignored
    pub fn from_script(script: &str) -> Self {
        Self::new(
            script
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Every prompt shown so far, in order
    pub fn asked(&self) -> Vec<AskedPrompt> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_reply(&self, title: &str, options: Vec<String>) -> MigrateResult<String> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AskedPrompt {
                title: title.to_string(),
                options,
            });
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| MigrateError::Prompt {
                message: format!("no scripted reply left for '{title}'"),
            })
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn ask(&self, request: &PromptRequest<'_>) -> MigrateResult<String> {
        let options = request.options.iter().map(|o| o.to_string()).collect();
        self.next_reply(request.title, options)
    }

    async fn select_directory(
        &self,
        title: &str,
        _default: &Path,
    ) -> MigrateResult<Option<PathBuf>> {
        let reply = self.next_reply(title, Vec::new())?;
        if reply.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(reply)))
        }
    }
}
