pub mod group;
pub mod id;
pub mod user;

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::schema::ResourceSchema;

/// A resource whose lifecycle is owned by the configuration.
///
/// `Model` doubles as configuration (desired values, computed fields unset)
/// and as state (everything the remote side reported).
#[async_trait]
pub trait ManagedResource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync;

    fn type_name(&self) -> &'static str;
    fn schema(&self) -> ResourceSchema;

    async fn create(&self, config: &Self::Model) -> Result<Self::Model, ProviderError>;

    /// Refreshes `state` from the remote side. `Ok(None)` means the object is
    /// gone and should be dropped from state.
    async fn read(&self, state: &Self::Model) -> Result<Option<Self::Model>, ProviderError>;

    async fn update(
        &self,
        state: &Self::Model,
        config: &Self::Model,
    ) -> Result<Self::Model, ProviderError>;

    async fn delete(&self, state: &Self::Model) -> Result<(), ProviderError>;

    async fn import(&self, id: &str) -> Result<Self::Model, ProviderError>;
}

/// A read-only lookup of an existing remote object by its resource id.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Serialize + Send + Sync;

    fn type_name(&self) -> &'static str;
    fn schema(&self) -> ResourceSchema;

    /// Name of the attribute carrying the id to look up.
    fn lookup_key(&self) -> &'static str;

    async fn read(&self, id: i64) -> Result<Self::Model, ProviderError>;
}

/// Returns the configured value when it is set and differs from the prior one.
pub(crate) fn changed<T: PartialEq + Clone>(desired: &Option<T>, prior: &Option<T>) -> Option<T> {
    match desired {
        Some(value) if prior.as_ref() != Some(value) => Some(value.clone()),
        _ => None,
    }
}

/// Same as [`changed`] for set attributes, producing the wire list.
pub(crate) fn changed_set<T: Ord + Clone>(
    desired: &Option<BTreeSet<T>>,
    prior: &Option<BTreeSet<T>>,
) -> Option<Vec<T>> {
    changed(desired, prior).map(|set| set.into_iter().collect())
}
