//! Unified error type.

use thiserror::Error;

/// The error type returned by snippetbox's fallible infrastructure operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding to a port, accepting a connection, or
/// installing the logging subscriber.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}
