//! Data fetcher: where the raw roster table comes from.
//!
//! [`EmployeeSource`] is the seam between the application and the network.
//! The reqwest-backed [`TableClient`] lives behind the `http` feature.

mod error;
pub use error::FetchError;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ServiceCredentials, TableClient};

use async_trait::async_trait;
use staffdir_core::RawTable;

/// Anything that can produce the full roster table in one round trip.
///
/// Implementations must not cache: every call re-fetches the whole table.
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    async fn fetch_table(&self) -> Result<RawTable, FetchError>;
}
