//! Relief Registry Client Library
//!
//! A Rust client for a relief/aid-tracking registry service, providing the
//! entity model for its five linked collections (persons, houses, families,
//! neighborhoods, needs), derived cross-reference views, validated mutations
//! with full resynchronization, per-view edit tracking and free-text
//! filtering.
//!
//! The remote service owns durable storage and id assignment; this crate
//! mirrors its collections in memory per view and keeps them referentially
//! consistent on every write.

pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod index;
pub mod model;
pub mod mutation;
pub mod remote;
pub mod session;
pub mod store;

use reqwest::Client;

use crate::config::RegistryOptions;
use crate::mutation::MutationCoordinator;
use crate::remote::RemoteApi;

/// The main entry point for the registry client
pub struct RegistryClient {
    /// The base URL of the registry service
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: RegistryOptions,
}

impl RegistryClient {
    /// Create a new registry client
    ///
    /// # Arguments
    ///
    /// * `service_url` - The base URL of the registry service
    ///
    /// # Example
    ///
    /// ```
    /// use relief_registry::RegistryClient;
    ///
    /// let registry = RegistryClient::new("http://localhost:5000");
    /// ```
    pub fn new(service_url: &str) -> Self {
        Self::new_with_options(service_url, RegistryOptions::default())
    }

    /// Create a new registry client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use relief_registry::{config::RegistryOptions, RegistryClient};
    /// use std::time::Duration;
    ///
    /// let options = RegistryOptions::default()
    ///     .with_request_timeout(Some(Duration::from_secs(5)));
    /// let registry = RegistryClient::new_with_options("http://localhost:5000", options);
    /// ```
    pub fn new_with_options(service_url: &str, options: RegistryOptions) -> Self {
        Self {
            url: service_url.to_string(),
            http_client: Client::new(),
            options,
        }
    }

    /// Create a handle for raw calls against the remote service
    pub fn remote(&self) -> RemoteApi {
        RemoteApi::new(
            &self.url,
            self.http_client.clone(),
            self.options.request_timeout,
        )
    }

    /// Create a mutation coordinator with its own empty entity store.
    ///
    /// One coordinator is constructed per view at mount and dropped at
    /// unmount; call [`MutationCoordinator::refresh`] for the initial load.
    ///
    /// # Example
    ///
    /// ```
    /// use relief_registry::RegistryClient;
    ///
    /// let registry = RegistryClient::new("http://localhost:5000");
    /// let coordinator = registry.coordinator();
    /// assert!(!coordinator.store().is_loaded());
    /// ```
    pub fn coordinator(&self) -> MutationCoordinator {
        MutationCoordinator::new(self.remote())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::RegistryOptions;
    pub use crate::error::Error;
    pub use crate::filter::{filter_records, Matchable};
    pub use crate::index::RegistryIndex;
    pub use crate::model::{
        Beneficiary, Family, FamilyDraft, House, HouseDraft, Need, NeedDraft, Neighborhood,
        NeighborhoodDraft, Person, PersonDraft, Record, RecordId,
    };
    pub use crate::mutation::MutationCoordinator;
    pub use crate::session::{EditSession, EditState};
    pub use crate::store::EntityStore;
    pub use crate::RegistryClient;
}
