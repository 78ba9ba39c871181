//! Dynamic dispatch of resource and data source operations by type name.
//!
//! Configuration and state cross this boundary as JSON objects; everything
//! behind it works on the typed models.

use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::resources::group::{
    GROUP_TYPE_NAME, GroupDataSource, GroupResource, group_data_source_schema, group_schema,
};
use crate::resources::user::{
    USER_TYPE_NAME, UserDataSource, UserResource, user_data_source_schema, user_schema,
};
use crate::resources::{DataSource, ManagedResource};
use crate::schema::ResourceSchema;
use crate::truenas::TrueNasClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ResourceKind {
    User,
    Group,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::User, ResourceKind::Group];

    pub fn type_name(&self) -> &'static str {
        match self {
            ResourceKind::User => USER_TYPE_NAME,
            ResourceKind::Group => GROUP_TYPE_NAME,
        }
    }

    pub fn from_type_name(name: &str) -> Result<Self, ProviderError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == name)
            .ok_or_else(|| ProviderError::UnknownResource(name.to_string()))
    }

    /// Attribute carrying the resource id in a data source lookup.
    pub fn lookup_key(&self) -> &'static str {
        match self {
            ResourceKind::User => "user_id",
            ResourceKind::Group => "group_id",
        }
    }

    pub fn resource_schema(&self) -> ResourceSchema {
        match self {
            ResourceKind::User => user_schema(),
            ResourceKind::Group => group_schema(),
        }
    }

    pub fn data_source_schema(&self) -> ResourceSchema {
        match self {
            ResourceKind::User => user_data_source_schema(),
            ResourceKind::Group => group_data_source_schema(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrueNasProvider {
    users: UserResource,
    groups: GroupResource,
    user_lookup: UserDataSource,
    group_lookup: GroupDataSource,
}

impl TrueNasProvider {
    pub fn new(client: TrueNasClient) -> Self {
        Self {
            users: UserResource::new(client.clone()),
            groups: GroupResource::new(client.clone()),
            user_lookup: UserDataSource::new(client.clone()),
            group_lookup: GroupDataSource::new(client),
        }
    }

    pub fn configure(config: &ProviderConfig) -> Result<Self, ProviderError> {
        tracing::debug!(base_url = %config.base_url, "configuring TrueNAS provider");
        Ok(Self::new(config.client()?))
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        vec![self.users.type_name(), self.groups.type_name()]
    }

    pub fn data_source_types(&self) -> Vec<&'static str> {
        vec![self.user_lookup.type_name(), self.group_lookup.type_name()]
    }

    pub async fn create(&self, resource_type: &str, config: Value) -> Result<Value, ProviderError> {
        match ResourceKind::from_type_name(resource_type)? {
            ResourceKind::User => create_with(&self.users, config).await,
            ResourceKind::Group => create_with(&self.groups, config).await,
        }
    }

    /// Returns `None` when the remote object is gone.
    pub async fn read(
        &self,
        resource_type: &str,
        state: Value,
    ) -> Result<Option<Value>, ProviderError> {
        match ResourceKind::from_type_name(resource_type)? {
            ResourceKind::User => read_with(&self.users, state).await,
            ResourceKind::Group => read_with(&self.groups, state).await,
        }
    }

    pub async fn update(
        &self,
        resource_type: &str,
        state: Value,
        config: Value,
    ) -> Result<Value, ProviderError> {
        match ResourceKind::from_type_name(resource_type)? {
            ResourceKind::User => update_with(&self.users, state, config).await,
            ResourceKind::Group => update_with(&self.groups, state, config).await,
        }
    }

    pub async fn delete(&self, resource_type: &str, state: Value) -> Result<(), ProviderError> {
        match ResourceKind::from_type_name(resource_type)? {
            ResourceKind::User => delete_with(&self.users, state).await,
            ResourceKind::Group => delete_with(&self.groups, state).await,
        }
    }

    pub async fn import(&self, resource_type: &str, id: &str) -> Result<Value, ProviderError> {
        match ResourceKind::from_type_name(resource_type)? {
            ResourceKind::User => Ok(serde_json::to_value(self.users.import(id).await?)?),
            ResourceKind::Group => Ok(serde_json::to_value(self.groups.import(id).await?)?),
        }
    }

    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        match ResourceKind::from_type_name(data_source_type)? {
            ResourceKind::User => lookup_with(&self.user_lookup, config).await,
            ResourceKind::Group => lookup_with(&self.group_lookup, config).await,
        }
    }
}

async fn create_with<R: ManagedResource>(
    resource: &R,
    config: Value,
) -> Result<Value, ProviderError> {
    resource.schema().validate_config(&config)?;
    let config: R::Model = serde_json::from_value(config)?;

    let state = resource.create(&config).await?;
    Ok(serde_json::to_value(state)?)
}

async fn read_with<R: ManagedResource>(
    resource: &R,
    state: Value,
) -> Result<Option<Value>, ProviderError> {
    let state: R::Model = serde_json::from_value(state)?;

    match resource.read(&state).await? {
        Some(state) => Ok(Some(serde_json::to_value(state)?)),
        None => Ok(None),
    }
}

async fn update_with<R: ManagedResource>(
    resource: &R,
    state: Value,
    config: Value,
) -> Result<Value, ProviderError> {
    resource.schema().validate_config(&config)?;
    let state: R::Model = serde_json::from_value(state)?;
    let config: R::Model = serde_json::from_value(config)?;

    let state = resource.update(&state, &config).await?;
    Ok(serde_json::to_value(state)?)
}

async fn delete_with<R: ManagedResource>(resource: &R, state: Value) -> Result<(), ProviderError> {
    let state: R::Model = serde_json::from_value(state)?;
    resource.delete(&state).await
}

async fn lookup_with<D: DataSource>(source: &D, config: Value) -> Result<Value, ProviderError> {
    source.schema().validate_config(&config)?;

    let key = source.lookup_key();
    let id = config.get(key).and_then(Value::as_i64).ok_or_else(|| {
        ProviderError::Validation(format!("{}: '{}' must be an integer", source.type_name(), key))
    })?;

    let model = source.read(id).await?;
    let mut value = serde_json::to_value(model)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("password");
    }
    Ok(value)
}
