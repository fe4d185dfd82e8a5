//! Interactive prompt on the controlling terminal

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use wm_migrate::{MigrateError, MigrateResult, Prompt, PromptRequest};

/// Reply that abandons a directory selection
const CANCEL_REPLY: &str = "cancel";

/// Prompt that writes questions to stderr and reads replies from stdin
pub(crate) struct TerminalPrompt {
    input: Mutex<Lines<BufReader<Stdin>>>,
}

impl TerminalPrompt {
    pub(crate) fn new() -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Next line of input, `None` at end of input
    async fn read_line(&self) -> MigrateResult<Option<String>> {
        self.input
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| MigrateError::Prompt {
                message: format!("failed to read from stdin: {e}"),
            })
    }
}

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn ask(&self, request: &PromptRequest<'_>) -> MigrateResult<String> {
        eprintln!();
        eprintln!("[{}] {}", request.kind, request.title);
        eprintln!("{}", request.message.trim_end());

        loop {
            for (index, option) in request.options.iter().enumerate() {
                eprintln!("  {}) {}", index + 1, option);
            }
            eprint!("> ");

            let Some(line) = self.read_line().await? else {
                return Err(MigrateError::Prompt {
                    message: format!("input closed while asking '{}'", request.title),
                });
            };
            if let Some(choice) = parse_choice(&line, request.options) {
                return Ok(choice.to_string());
            }
            eprintln!("Please enter one of the numbers or labels above.");
        }
    }

    async fn select_directory(
        &self,
        title: &str,
        default: &Path,
    ) -> MigrateResult<Option<PathBuf>> {
        eprintln!();
        eprintln!("{title}");
        eprintln!(
            "Press Enter for {}, type a path, or '{CANCEL_REPLY}' to stop.",
            default.display()
        );
        eprint!("> ");

        let line = self.read_line().await?;
        Ok(line.and_then(|line| parse_directory(&line, default)))
    }
}

/// Match a reply against `options` by 1-based number or by label, ignoring case
pub(crate) fn parse_choice(reply: &str, options: &[&'static str]) -> Option<&'static str> {
    let reply = reply.trim();
    if let Ok(number) = reply.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| options.get(index))
            .copied();
    }
    options
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(reply))
}

/// Interpret a directory reply: blank takes `default`, `cancel` gives up
pub(crate) fn parse_directory(reply: &str, default: &Path) -> Option<PathBuf> {
    let reply = reply.trim();
    if reply.is_empty() {
        Some(default.to_path_buf())
    } else if reply.eq_ignore_ascii_case(CANCEL_REPLY) {
        None
    } else {
        Some(PathBuf::from(reply))
    }
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
