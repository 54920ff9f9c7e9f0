use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("cannot remove the root descriptor '{display_name}' from the hierarchy")]
    RootRemoval { display_name: String },

    #[error("descriptor with unique id '{unique_id}' already exists under a different parent")]
    DuplicateUniqueId { unique_id: String },

    #[error("unique id '{child}' is not a direct extension of parent id '{parent}'")]
    NotADirectChild { parent: String, child: String },

    #[error("descriptor node {index} is not present in the tree")]
    UnknownNode { index: usize },
}

impl TreeError {
    pub fn root_removal(display_name: impl Into<String>) -> Self {
        Self::RootRemoval {
            display_name: display_name.into(),
        }
    }

    pub fn duplicate_unique_id(unique_id: impl Into<String>) -> Self {
        Self::DuplicateUniqueId {
            unique_id: unique_id.into(),
        }
    }

    pub fn not_a_direct_child(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::NotADirectChild {
            parent: parent.into(),
            child: child.into(),
        }
    }
}
