//! Hand-off of a completed code to whatever verifies it.

use smscode_types::VerificationCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("code rejected: {0}")]
    Rejected(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl SubmitError {
    /// The same code may succeed if sent again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Verifies a completed code.
pub trait CodeSubmitter {
    fn submit(&mut self, code: &VerificationCode) -> Result<(), SubmitError>;
}

/// Stand-in for the verification service: logs the code and accepts it.
#[derive(Debug, Default)]
pub struct LoggingSubmitter {
    sent: usize,
}

impl CodeSubmitter for LoggingSubmitter {
    fn submit(&mut self, code: &VerificationCode) -> Result<(), SubmitError> {
        self.sent += 1;
        tracing::info!(code = %code, attempt = self.sent, "Sent");
        Ok(())
    }
}
