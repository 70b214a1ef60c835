//! [`Backend`]-related implementations.

#[cfg(feature = "http")]
pub mod http;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "http")]
pub use self::http::Http;

/// Backend operation.
pub use common::Handler as Backend;

/// [`Backend`] error.
#[derive(Clone, Debug, Display, From, StdError)]
pub enum Error {
    /// Request was rejected with field-level errors.
    #[display("Request rejected: {_0}")]
    Rejected(Rejection),

    /// Request failed with an unexpected status.
    #[display("Request failed with `{status}` status: {body}")]
    #[from(ignore)]
    Status {
        /// HTTP status code of the response.
        status: u16,

        /// Raw body of the response.
        body: String,
    },

    /// Request produced no response.
    #[display("`Backend` is unreachable: {_0}")]
    #[from(ignore)]
    Connectivity(#[error(not(source))] String),

    /// Request could not be built.
    #[display("Invalid request: {_0}")]
    #[from(ignore)]
    InvalidRequest(#[error(not(source))] String),

    /// Response body is malformed.
    #[display("Malformed response: {_0}")]
    #[from(ignore)]
    Decode(#[error(not(source))] String),

    /// Request didn't complete in time.
    #[display("Request timed out")]
    #[from(ignore)]
    Timeout,
}

impl Error {
    /// Indicates whether the request never reached the [`Backend`] or never
    /// got a response.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Timeout)
    }
}

/// Rejection of a request, reported by the [`Backend`] along with the
/// offending fields.
#[derive(Clone, Debug, Default, Display, Eq, PartialEq, StdError)]
#[display("{message}")]
pub struct Rejection {
    /// Summary message.
    pub message: String,

    /// Error messages of the offending fields, in the order they were
    /// reported.
    pub errors: Vec<(String, Vec<String>)>,
}
