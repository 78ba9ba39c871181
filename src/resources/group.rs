use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::id::{format_id, parse_id};
use super::{DataSource, ManagedResource, changed, changed_set};
use crate::error::ProviderError;
use crate::schema::{Attribute, ResourceSchema, ValueKind, check_int, check_str};
use crate::truenas::{
    CreateGroupParams, DeleteGroupParams, Group, TrueNasClient, UpdateGroupParams,
};
use crate::validation::{validate_name, validate_unix_id};

pub const GROUP_TYPE_NAME: &str = "truenas_group";

/// Local state of a `truenas_group`.
///
/// `users` holds user resource ids, not UIDs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupModel {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub group_id: Option<i64>,
    pub gid: Option<i64>,
    pub name: String,
    pub builtin: Option<bool>,
    pub sudo: Option<bool>,
    pub sudo_nopasswd: Option<bool>,
    pub sudo_commands: Option<BTreeSet<String>>,
    pub smb: Option<bool>,
    pub users: Option<BTreeSet<i64>>,
    pub local: Option<bool>,
    pub id_type_both: Option<bool>,
}

pub fn expand_group_create(config: &GroupModel) -> CreateGroupParams {
    CreateGroupParams {
        name: config.name.clone(),
        gid: config.gid,
        allow_duplicate_gid: Some(false),
        smb: config.smb,
        sudo: config.sudo,
        sudo_nopasswd: config.sudo_nopasswd,
        sudo_commands: config
            .sudo_commands
            .as_ref()
            .map(|c| c.iter().cloned().collect()),
        users: config.users.as_ref().map(|u| u.iter().copied().collect()),
    }
}

/// Builds a patch holding only the configured fields that differ from `state`.
pub fn expand_group_update(state: &GroupModel, config: &GroupModel) -> UpdateGroupParams {
    let gid = changed(&config.gid, &state.gid);

    UpdateGroupParams {
        name: (config.name != state.name).then(|| config.name.clone()),
        allow_duplicate_gid: gid.map(|_| false),
        gid,
        smb: changed(&config.smb, &state.smb),
        sudo: changed(&config.sudo, &state.sudo),
        sudo_nopasswd: changed(&config.sudo_nopasswd, &state.sudo_nopasswd),
        sudo_commands: changed_set(&config.sudo_commands, &state.sudo_commands),
        users: changed_set(&config.users, &state.users),
    }
}

// Members are never removed together with the group.
pub fn expand_group_delete(_state: &GroupModel) -> DeleteGroupParams {
    DeleteGroupParams {
        delete_users: false,
    }
}

pub fn flatten_group(group: &Group) -> GroupModel {
    GroupModel {
        id: format_id(group.id),
        group_id: Some(group.id),
        gid: group.gid,
        name: group.group.clone(),
        builtin: group.builtin,
        sudo: group.sudo,
        sudo_nopasswd: group.sudo_nopasswd,
        sudo_commands: group
            .sudo_commands
            .as_ref()
            .map(|c| c.iter().cloned().collect()),
        smb: group.smb,
        users: group.users.as_ref().map(|u| u.iter().copied().collect()),
        local: group.local,
        id_type_both: group.id_type_both,
    }
}

pub fn group_schema() -> ResourceSchema {
    ResourceSchema::new(
        GROUP_TYPE_NAME,
        "Using groups in TrueNAS can be an efficient way of managing permissions for many similar user accounts.",
    )
    .with_attribute(Attribute::computed("id", ValueKind::String, "Resource ID"))
    .with_attribute(Attribute::computed("group_id", ValueKind::Int, "Group ID"))
    .with_attribute(
        Attribute::optional("gid", ValueKind::Int, "GID")
            .check(|v| check_int(v, validate_unix_id)),
    )
    .with_attribute(
        Attribute::required("name", ValueKind::String, "This group's name.")
            .check(|v| check_str(v, validate_name)),
    )
    .with_attribute(Attribute::computed(
        "builtin",
        ValueKind::Bool,
        "Whether this is a builtin group.",
    ))
    .with_attribute(Attribute::optional(
        "sudo",
        ValueKind::Bool,
        "Permit sudo usage by this group.",
    ))
    .with_attribute(Attribute::optional(
        "sudo_nopasswd",
        ValueKind::Bool,
        "Permit sudo usage without password authentication for this group.",
    ))
    .with_attribute(Attribute::optional(
        "sudo_commands",
        ValueKind::StringSet,
        "List of permitted sudo commands for this group. They must not rely on $PATH (i.e. have to be absolute).",
    ))
    .with_attribute(Attribute::optional(
        "smb",
        ValueKind::Bool,
        "Samba authentication: Set to allow group to authenticate to Samba shares.",
    ))
    .with_attribute(Attribute::optional(
        "users",
        ValueKind::IntSet,
        "List of User IDs (resource IDs, not UID) in this group.",
    ))
    .with_attribute(Attribute::computed(
        "local",
        ValueKind::Bool,
        "Whether this is a local group.",
    ))
    .with_attribute(Attribute::computed(
        "id_type_both",
        ValueKind::Bool,
        "Samba: ID_TYPE_BOTH",
    ))
}

pub fn group_data_source_schema() -> ResourceSchema {
    let mut schema = group_schema();
    schema.description = "Get information about a specific group";
    for attribute in &mut schema.attributes {
        *attribute = if attribute.name == "group_id" {
            Attribute::required("group_id", ValueKind::Int, "Group ID")
        } else {
            Attribute::computed(attribute.name, attribute.kind, attribute.description)
        };
    }
    schema
}

#[derive(Debug, Clone)]
pub struct GroupResource {
    client: TrueNasClient,
}

impl GroupResource {
    pub fn new(client: TrueNasClient) -> Self {
        Self { client }
    }

    async fn fetch(&self, id: i64) -> Result<GroupModel, ProviderError> {
        let group = self.client.get_group(id).await?;
        Ok(flatten_group(&group))
    }
}

#[async_trait]
impl ManagedResource for GroupResource {
    type Model = GroupModel;

    fn type_name(&self) -> &'static str {
        GROUP_TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        group_schema()
    }

    async fn create(&self, config: &GroupModel) -> Result<GroupModel, ProviderError> {
        self.schema()
            .validate_config(&serde_json::to_value(config)?)?;

        let params = expand_group_create(config);
        let id = self.client.create_group(&params).await?;
        tracing::info!(group_id = id, name = %config.name, "TrueNAS group created");

        self.fetch(id).await
    }

    async fn read(&self, state: &GroupModel) -> Result<Option<GroupModel>, ProviderError> {
        let id = parse_id(&state.id)?;

        match self.client.get_group(id).await {
            Ok(group) => Ok(Some(flatten_group(&group))),
            Err(e) if e.is_not_found() => {
                tracing::warn!(group_id = id, "TrueNAS group no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        state: &GroupModel,
        config: &GroupModel,
    ) -> Result<GroupModel, ProviderError> {
        self.schema()
            .validate_config(&serde_json::to_value(config)?)?;
        let id = parse_id(&state.id)?;

        let params = expand_group_update(state, config);
        if params.is_empty() {
            tracing::debug!(group_id = id, "no group changes to apply");
        } else {
            self.client.update_group(id, &params).await?;
            tracing::info!(group_id = id, "TrueNAS group updated");
        }

        self.fetch(id).await
    }

    async fn delete(&self, state: &GroupModel) -> Result<(), ProviderError> {
        let id = parse_id(&state.id)?;
        let params = expand_group_delete(state);

        tracing::debug!(group_id = id, "Deleting TrueNAS group");
        self.client.delete_group(id, &params).await?;
        tracing::info!(group_id = id, "TrueNAS group deleted");

        Ok(())
    }

    async fn import(&self, id: &str) -> Result<GroupModel, ProviderError> {
        let id = parse_id(id)?;

        self.fetch(id).await.map_err(|e| match e {
            ProviderError::TrueNas(ref err) if err.is_not_found() => {
                ProviderError::ImportNotFound { kind: "group", id }
            }
            other => other,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GroupDataSource {
    client: TrueNasClient,
}

impl GroupDataSource {
    pub fn new(client: TrueNasClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for GroupDataSource {
    type Model = GroupModel;

    fn type_name(&self) -> &'static str {
        GROUP_TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        group_data_source_schema()
    }

    fn lookup_key(&self) -> &'static str {
        "group_id"
    }

    async fn read(&self, id: i64) -> Result<GroupModel, ProviderError> {
        let group = self.client.get_group(id).await?;
        Ok(flatten_group(&group))
    }
}
