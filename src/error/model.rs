use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("cannot read model file '{path}': {message}")]
    Unreadable { path: String, message: String },

    #[error("model file '{path}' is not valid JSON: {message}")]
    Malformed { path: String, message: String },

    #[error("container '{container}' references unknown nested container '{nested}'")]
    DanglingNested { container: String, nested: String },
}

impl ModelError {
    pub fn unreadable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unreadable {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn dangling_nested(container: impl Into<String>, nested: impl Into<String>) -> Self {
        Self::DanglingNested {
            container: container.into(),
            nested: nested.into(),
        }
    }
}
