use std::error::Error as StdError;
use std::io::{self, Write};

use crate::core::classify::{classify, ErrorKind};
use crate::error::AppError;

/// Exit code for every reported failure
pub const EXIT_FAILURE: i32 = 1;

/// Environment variable that turns on the technical details dump
pub const DEBUG_ENV: &str = "DEBUG";

/// Fixed explanation and remediation text for a failure category
pub fn guidance(kind: ErrorKind) -> (&'static str, &'static str) {
    match kind {
        ErrorKind::Auth => (
            "Authentication failed. Unable to access Azure DevOps with the provided credentials.",
            "Check your Personal Access Token (PAT) for validity, permissions, and expiration. Ensure it is set in the ADO_PAT environment variable.",
        ),
        ErrorKind::Network => (
            "Network error. Unable to connect to Azure DevOps services.",
            "Check your internet connection and verify Azure DevOps is reachable. Retry after a few moments.",
        ),
        ErrorKind::Validation => (
            "Validation error. One or more input parameters are invalid.",
            "Review your command-line arguments and environment variables for missing or incorrect values.",
        ),
        ErrorKind::RateLimit => (
            "Rate limit exceeded. Too many requests sent to Azure DevOps.",
            "Wait a few minutes before retrying. Consider reducing request frequency or checking your organization's API quota.",
        ),
        ErrorKind::MalformedResponse => (
            "Malformed response. Received unexpected or invalid data from Azure DevOps.",
            "Retry the operation. If the problem persists, check for Azure DevOps service issues or API changes.",
        ),
        ErrorKind::Unknown => (
            "An unexpected error occurred.",
            "Retry the operation or contact support if the issue continues.",
        ),
    }
}

/// What gets written to stderr for a failure, and the exit code to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub kind: ErrorKind,
    pub lines: Vec<String>,
    pub exit_code: i32,
}

impl Presentation {
    pub fn render(&self) -> String {
        let mut output = self.lines.join("\n");
        output.push('\n');
        output
    }
}

/// Turn a failure into user-facing lines.
///
/// The first two lines are always the category explanation and remediation.
/// Unknown failures also echo the error text, as do configuration and argument
/// errors, whose text names the variable or flag to fix. With `debug` set, the
/// full error chain is appended.
pub fn present(error: &AppError, debug: bool) -> Presentation {
    let classified = classify(error);
    let (explanation, remediation) = guidance(classified.kind);

    let mut lines = vec![
        format!("Error: {}", explanation),
        format!("Suggestion: {}", remediation),
    ];

    let names_input = matches!(classified.error, AppError::Config(_) | AppError::Usage(_));
    if classified.kind == ErrorKind::Unknown || names_input {
        lines.push(format!("Details: {}", classified.error.to_string().trim_end()));
    }

    if debug {
        lines.push("--- Technical details ---".to_string());
        lines.push(format!("{:?}", error));
        let mut source = error.source();
        while let Some(cause) = source {
            lines.push(format!("caused by: {}", cause));
            source = cause.source();
        }
    }

    Presentation {
        kind: classified.kind,
        lines,
        exit_code: EXIT_FAILURE,
    }
}

/// Terminal failure behavior, injected so tests can observe it
pub trait FailureHandler {
    /// Report a failure and return the process exit code
    fn handle(&self, error: &AppError) -> i32;
}

/// Writes the presentation to stderr
pub struct TerminalReporter {
    debug: bool,
}

impl TerminalReporter {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Debug dump is on when `DEBUG` is set to a non-empty value
    pub fn from_env() -> Self {
        let debug = std::env::var(DEBUG_ENV).is_ok_and(|v| !v.is_empty());
        Self::new(debug)
    }
}

impl FailureHandler for TerminalReporter {
    fn handle(&self, error: &AppError) -> i32 {
        let presentation = present(error, self.debug);
        let mut stderr = io::stderr().lock();
        stderr.write_all(presentation.render().as_bytes()).ok();
        stderr.flush().ok();
        presentation.exit_code
    }
}
