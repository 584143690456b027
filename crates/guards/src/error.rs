//! Contract error model.

use thiserror::Error;

/// Result type returned by every guard.
pub type GuardResult<T> = Result<T, ContractError>;

/// A violated precondition in the caller's own code.
///
/// The message is what callers usually print; `context` carries the
/// key/value details (`Description`, `Received`, ...) that explain it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ContractError {
    message: String,
    context: Vec<(String, String)>,
}

impl ContractError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Attach a context entry. Entries keep their insertion order.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.push((key.into(), value.to_string()));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Look up a context value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Message followed by one `key: value` line per context entry.
    pub fn detailed(&self) -> String {
        let mut out = self.message.clone();
        for (key, value) in &self.context {
            out.push('\n');
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
        }
        out
    }
}

/// Central exit point for every guard failure.
pub(crate) fn fail<T>(error: ContractError) -> GuardResult<T> {
    tracing::debug!(message = %error.message(), "contract violated");
    Err(error)
}

/// `Arg 'name'` when a description is given, `Value` otherwise.
pub(crate) fn subject(description: &str) -> String {
    if description.is_empty() {
        "Value".to_string()
    } else {
        format!("Arg '{description}'")
    }
}

pub(crate) fn described(description: &str) -> &str {
    if description.is_empty() {
        "Unnamed"
    } else {
        description
    }
}
