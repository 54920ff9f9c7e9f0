mod model;
mod selector;
mod tree;

pub use model::ModelError;
pub use selector::SelectorError;
pub use tree::TreeError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, Error>;
