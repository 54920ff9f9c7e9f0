use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("selector '{input}' has no recognized prefix (expected class:, method: or uid:)")]
    UnknownKind { input: String },

    #[error("method selector '{input}' must look like method:<container>#<name>")]
    MalformedMethod { input: String },

    #[error("unique id '{input}' could not be parsed: {message}")]
    MalformedUniqueId { input: String, message: String },
}

impl SelectorError {
    pub fn unknown_kind(input: impl Into<String>) -> Self {
        Self::UnknownKind {
            input: input.into(),
        }
    }

    pub fn malformed_method(input: impl Into<String>) -> Self {
        Self::MalformedMethod {
            input: input.into(),
        }
    }

    pub fn malformed_unique_id(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedUniqueId {
            input: input.into(),
            message: message.into(),
        }
    }
}
