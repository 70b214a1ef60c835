//! Service contains the reservation workflow of the real-estate dashboard.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod form;
pub mod infra;
pub mod query;

use std::time::Duration;

use smart_default::SmartDefault;
use tracerr::Traced;

use crate::infra::{backend, Backend};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Maximum duration of a single [`Backend`] request.
    #[default(Duration::from_secs(30))]
    pub request_timeout: Duration,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Api> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Backend`] of this [`Service`].
    backend: Api,
}

impl<Api> Service<Api> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, backend: Api) -> Self {
        Self { config, backend }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Backend`] of this [`Service`].
    #[must_use]
    pub fn backend(&self) -> &Api {
        &self.backend
    }

    /// Executes the provided [`Backend`] operation, bounded by the
    /// [`Config::request_timeout`].
    async fn request<Op>(
        &self,
        op: Op,
    ) -> Result<Api::Ok, Traced<backend::Error>>
    where
        Api: Backend<Op, Err = Traced<backend::Error>>,
    {
        let req = self.backend.execute(op);
        tokio::time::timeout(self.config.request_timeout, req)
            .await
            .map_err(|_| tracerr::new!(backend::Error::Timeout))?
            .map_err(tracerr::wrap!())
    }
}
