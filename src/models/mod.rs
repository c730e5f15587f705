//! Data access for snippets and users.
//!
//! Handlers depend on the [`SnippetModel`] and [`UserModel`] traits; the
//! in-memory implementations here back the binary and the tests.

mod snippets;
mod users;

use thiserror::Error;

pub use snippets::{MemorySnippets, Snippet, SnippetModel};
pub use users::{MemoryUsers, User, UserModel};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no matching record found")]
    NoRecord,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("duplicate email")]
    DuplicateEmail,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
