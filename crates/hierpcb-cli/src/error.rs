use std::fmt;

use hierpcb_board::BoardError;
use hierpcb_engine::EngineError;
use hierpcb_hierarchy::HierarchyError;

/// Process exit status of `hierpcb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad arguments or selectors.
    Usage = 1,
    /// Unreadable board, config or saved selection; conflicting selection.
    Input = 2,
    /// At least one enforcement job failed.
    Processing = 3,
}

impl ErrorCode {
    #[must_use]
    pub fn status(self) -> i32 {
        self as i32
    }
}

/// An error that already knows its exit status.
#[derive(Debug)]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Usage, message)
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Input, message)
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Processing, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for an error bubbled up through `anyhow`.
///
/// Library errors count as bad input; anything unclassified is a
/// processing failure.
pub fn exit_code(err: &anyhow::Error) -> ErrorCode {
    for cause in err.chain() {
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return cli.code;
        }
        if cause.is::<BoardError>() || cause.is::<EngineError>() || cause.is::<HierarchyError>() {
            return ErrorCode::Input;
        }
    }
    ErrorCode::Processing
}
