//! Crate-wide error type.
//!
//! Configuration problems (missing credential, missing CLI argument,
//! unresolved template variable, unknown tool) and remote-call failures
//! share one enum so every exercise can propagate with `?` and the binary
//! can report a single `Error: ...` line. Tool-level failures such as an
//! unparseable expression are *not* errors: tools return them as
//! `"Error: ..."` strings for the model to read.

use thiserror::Error;

/// Errors produced by the library.
#[derive(Debug, Error)]
pub enum Error {
    /// The API credential was not found when the first request was sent.
    #[error("{env_var} environment variable is not set")]
    MissingCredential { env_var: String },

    /// A required command-line or interactive argument was not supplied.
    #[error("{0}")]
    MissingArgument(String),

    /// A template referenced a variable that the mapping does not contain.
    #[error("missing value for template variable '{name}'")]
    MissingVariable { name: String },

    /// The model asked for a tool that is not registered.
    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    /// Transport-level failure (connect, TLS, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status or an error body.
    #[error("API HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be understood.
    #[error("failed to parse response: {0}")]
    InvalidResponse(String),

    /// The model produced neither text nor tool calls.
    #[error("model returned an empty response")]
    EmptyResponse,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error comes from local configuration rather than the
    /// remote model boundary.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingCredential { .. }
                | Error::MissingArgument(_)
                | Error::MissingVariable { .. }
                | Error::UnknownTool { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(
            Error::MissingVariable {
                name: "topic".into()
            }
            .is_configuration()
        );
        assert!(Error::UnknownTool { name: "x".into() }.is_configuration());
        assert!(!Error::EmptyResponse.is_configuration());
        assert!(
            !Error::Api {
                status: 429,
                message: "rate limited".into()
            }
            .is_configuration()
        );
    }

    #[test]
    fn display_names_the_missing_piece() {
        let err = Error::MissingCredential {
            env_var: "OPENAI_API_KEY".into(),
        };
        assert_eq!(
            err.to_string(),
            "OPENAI_API_KEY environment variable is not set"
        );
        let err = Error::MissingVariable {
            name: "location".into(),
        };
        assert!(err.to_string().contains("'location'"));
    }
}
