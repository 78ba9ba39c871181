//! truenas-provider - TrueNAS users and groups as declarative resources.
//!
//! Maps resource configuration and state onto the TrueNAS v2.0 REST API and
//! back. Resource handlers live in [`resources`], the JSON-facing entry point
//! is [`TrueNasProvider`].

pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod truenas;
pub mod validation;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use provider::{ResourceKind, TrueNasProvider};
pub use resources::group::{GroupDataSource, GroupModel, GroupResource};
pub use resources::user::{UserDataSource, UserModel, UserResource};
pub use resources::{DataSource, ManagedResource};
pub use truenas::{TrueNasClient, TrueNasError};
