//! Domain types for postsync
//! Defines the post record and the error taxonomy shared by the store and the HTTP layer.

pub mod error;
pub mod post;

pub use error::*;
pub use post::*;
