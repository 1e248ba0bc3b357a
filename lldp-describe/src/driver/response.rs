//! Response type for command execution results.

use std::time::Duration;

use memchr::{memchr, memrchr};

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output (normalized - command echo and trailing prompt removed).
    pub result: String,

    /// The raw output before normalization.
    pub raw_result: String,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Failure message if the command failed (based on failure patterns).
    pub failure_message: Option<String>,
}

impl Response {
    /// Create a new successful response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            raw_result: raw_result.into(),
            prompt: prompt.into(),
            elapsed,
            failure_message: None,
        }
    }

    /// Create a failed response.
    pub fn failed(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            failure_message: Some(failure_message.into()),
            ..Self::new(command, result, raw_result, prompt, elapsed)
        }
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

/// Strip the command echo (first line) and the trailing prompt (last line).
pub(crate) fn normalize_output(raw: &str, command: &str) -> String {
    let bytes = raw.as_bytes();

    let body = match memchr(b'\n', bytes) {
        Some(pos) if raw[..pos].trim_end().ends_with(command.trim()) => &raw[pos + 1..],
        _ => raw,
    };

    let body = match memrchr(b'\n', body.as_bytes()) {
        Some(pos) => &body[..pos],
        None => "",
    };

    body.trim_end().to_string()
}

/// The last line of the output, which holds the prompt.
pub(crate) fn trailing_prompt(raw: &str) -> String {
    let start = memrchr(b'\n', raw.as_bytes()).map_or(0, |pos| pos + 1);
    raw[start..].trim().to_string()
}
