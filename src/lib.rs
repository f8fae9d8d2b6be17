pub mod domain;
pub mod infra;
pub mod store;

pub use domain::{ApiError, OperationError, Post, PostDraft, PostId, ValidationErrors};
pub use store::{CollectionState, Store};
