use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::id::{format_id, parse_id};
use super::{DataSource, ManagedResource, changed, changed_set};
use crate::error::ProviderError;
use crate::schema::{Attribute, ResourceSchema, ValueKind, check_int, check_str};
use crate::truenas::{
    CreateUserParams, DEFAULT_HOME_MODE, DeleteUserParams, TrueNasClient, UpdateUserParams, User,
};
use crate::validation::{validate_name, validate_password, validate_unix_id};

pub const USER_TYPE_NAME: &str = "truenas_user";

const LOCKED_NEEDS_PASSWORD: &str = "locked needs the user to have a password";
const LOCKED_CONFLICTS: &str = "locked cannot be combined with password_disabled";

/// Local state of a `truenas_user`.
///
/// `primary_group` and `groups` hold group resource ids, not GIDs.
/// `password` is write-only: it is never reported back and is carried over
/// from configuration into state.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserModel {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub user_id: Option<i64>,
    pub uid: Option<i64>,
    pub username: String,
    pub unixhash: Option<String>,
    pub smbhash: Option<String>,
    pub home: Option<String>,
    pub shell: Option<String>,
    pub full_name: String,
    pub builtin: Option<bool>,
    pub smb: Option<bool>,
    pub password: Option<String>,
    pub password_disabled: Option<bool>,
    pub locked: Option<bool>,
    pub sudo: Option<bool>,
    pub sudo_nopasswd: Option<bool>,
    pub sudo_commands: Option<BTreeSet<String>>,
    pub microsoft_account: Option<bool>,
    pub email: Option<String>,
    pub primary_group: Option<i64>,
    pub primary_group_name: Option<String>,
    pub groups: Option<BTreeSet<i64>>,
    pub sshpubkey: Option<String>,
    pub local: Option<bool>,
    pub id_type_both: Option<bool>,
}

impl std::fmt::Debug for UserModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");

        f.debug_struct("UserModel")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("uid", &self.uid)
            .field("username", &self.username)
            .field("unixhash", &redact(&self.unixhash))
            .field("smbhash", &redact(&self.smbhash))
            .field("home", &self.home)
            .field("shell", &self.shell)
            .field("full_name", &self.full_name)
            .field("builtin", &self.builtin)
            .field("smb", &self.smb)
            .field("password", &redact(&self.password))
            .field("password_disabled", &self.password_disabled)
            .field("locked", &self.locked)
            .field("sudo", &self.sudo)
            .field("sudo_nopasswd", &self.sudo_nopasswd)
            .field("sudo_commands", &self.sudo_commands)
            .field("microsoft_account", &self.microsoft_account)
            .field("email", &self.email)
            .field("primary_group", &self.primary_group)
            .field("primary_group_name", &self.primary_group_name)
            .field("groups", &self.groups)
            .field("sshpubkey", &self.sshpubkey)
            .field("local", &self.local)
            .field("id_type_both", &self.id_type_both)
            .finish()
    }
}

/// Builds the create request.
///
/// Password auth is disabled exactly when no password is configured, and a
/// primary group is only auto-created when none is referenced.
pub fn expand_user_create(config: &UserModel) -> Result<CreateUserParams, ProviderError> {
    let password_disabled = config.password.is_none();

    if config.locked == Some(true) {
        if config.password_disabled == Some(true) {
            return Err(ProviderError::Validation(LOCKED_CONFLICTS.to_string()));
        }
        if password_disabled {
            return Err(ProviderError::Validation(LOCKED_NEEDS_PASSWORD.to_string()));
        }
    }

    Ok(CreateUserParams {
        username: config.username.clone(),
        full_name: config.full_name.clone(),
        uid: config.uid,
        group: config.primary_group,
        group_create: Some(config.primary_group.is_none()),
        home: config.home.clone(),
        home_mode: Some(DEFAULT_HOME_MODE.to_string()),
        shell: config.shell.clone(),
        smb: config.smb,
        password: config.password.clone(),
        password_disabled: Some(password_disabled),
        locked: config.locked,
        sudo: config.sudo,
        sudo_nopasswd: config.sudo_nopasswd,
        sudo_commands: config
            .sudo_commands
            .as_ref()
            .map(|c| c.iter().cloned().collect()),
        microsoft_account: config.microsoft_account,
        email: config.email.clone(),
        groups: config.groups.as_ref().map(|g| g.iter().copied().collect()),
        sshpubkey: config.sshpubkey.clone(),
    })
}

/// Builds a patch holding only the configured fields that differ from `state`.
pub fn expand_user_update(
    state: &UserModel,
    config: &UserModel,
) -> Result<UpdateUserParams, ProviderError> {
    if config.locked == Some(true) {
        if config.password_disabled == Some(true) {
            return Err(ProviderError::Validation(LOCKED_CONFLICTS.to_string()));
        }

        let password_available = match (&config.password, &state.password) {
            (Some(_), _) => true,
            // Dropping the configured password disables password auth.
            (None, Some(_)) => false,
            (None, None) => state.password_disabled == Some(false),
        };
        if !password_available {
            return Err(ProviderError::Validation(LOCKED_NEEDS_PASSWORD.to_string()));
        }
    }

    let mut params = UpdateUserParams {
        username: (config.username != state.username).then(|| config.username.clone()),
        full_name: (config.full_name != state.full_name).then(|| config.full_name.clone()),
        uid: changed(&config.uid, &state.uid),
        group: changed(&config.primary_group, &state.primary_group),
        home: changed(&config.home, &state.home),
        shell: changed(&config.shell, &state.shell),
        smb: changed(&config.smb, &state.smb),
        locked: changed(&config.locked, &state.locked),
        sudo: changed(&config.sudo, &state.sudo),
        sudo_nopasswd: changed(&config.sudo_nopasswd, &state.sudo_nopasswd),
        sudo_commands: changed_set(&config.sudo_commands, &state.sudo_commands),
        microsoft_account: changed(&config.microsoft_account, &state.microsoft_account),
        email: changed(&config.email, &state.email),
        groups: changed_set(&config.groups, &state.groups),
        sshpubkey: changed(&config.sshpubkey, &state.sshpubkey),
        ..Default::default()
    };

    if params.home.is_some() {
        params.home_mode = Some(DEFAULT_HOME_MODE.to_string());
    }

    // password_disabled follows the password and is never patched on its own.
    if config.password != state.password {
        match &config.password {
            Some(password) => {
                params.password = Some(password.clone());
                params.password_disabled = Some(false);
            }
            None => params.password_disabled = Some(true),
        }
    }

    Ok(params)
}

/// The primary group is removed with the user only when it carries the
/// user's name, i.e. when it looks like the group auto-created for it.
pub fn expand_user_delete(state: &UserModel) -> DeleteUserParams {
    DeleteUserParams {
        delete_group: state.primary_group_name.as_deref() == Some(state.username.as_str()),
    }
}

pub fn flatten_user(user: &User) -> UserModel {
    let (primary_group, primary_group_name) = match &user.group {
        Some(group) => (group.id, group.bsdgrp_group.clone()),
        None => (None, None),
    };

    UserModel {
        id: format_id(user.id),
        user_id: Some(user.id),
        uid: user.uid,
        username: user.username.clone(),
        unixhash: user.unixhash.clone(),
        smbhash: user.smbhash.clone(),
        home: user.home.clone(),
        shell: user.shell.clone(),
        full_name: user.full_name.clone(),
        builtin: user.builtin,
        smb: user.smb,
        password: None,
        password_disabled: user.password_disabled,
        locked: user.locked,
        sudo: user.sudo,
        sudo_nopasswd: user.sudo_nopasswd,
        sudo_commands: user
            .sudo_commands
            .as_ref()
            .map(|c| c.iter().cloned().collect()),
        microsoft_account: user.microsoft_account,
        email: user.email.clone(),
        primary_group,
        primary_group_name,
        groups: user.groups.as_ref().map(|g| g.iter().copied().collect()),
        sshpubkey: user.sshpubkey.clone(),
        local: user.local,
        id_type_both: user.id_type_both,
    }
}

pub fn user_schema() -> ResourceSchema {
    ResourceSchema::new(
        USER_TYPE_NAME,
        "In TrueNAS, user accounts allow flexibility for accessing shared data. A common practice is to create users and assign them to groups.",
    )
    .with_attribute(Attribute::computed("id", ValueKind::String, "Resource ID"))
    .with_attribute(Attribute::computed("user_id", ValueKind::Int, "User ID"))
    .with_attribute(
        Attribute::optional_computed("uid", ValueKind::Int, "UID")
            .check(|v| check_int(v, validate_unix_id)),
    )
    .with_attribute(
        Attribute::required("username", ValueKind::String, "Username")
            .check(|v| check_str(v, validate_name)),
    )
    .with_attribute(
        Attribute::computed("unixhash", ValueKind::String, "Password hash (UNIX)").sensitive(),
    )
    .with_attribute(
        Attribute::computed("smbhash", ValueKind::String, "Password hash (SMB)").sensitive(),
    )
    .with_attribute(Attribute::optional_computed(
        "home",
        ValueKind::String,
        "This user's home directory. Must begin with /mnt, followed by a valid pool or disk name and be writable.",
    ))
    .with_attribute(Attribute::optional_computed(
        "shell",
        ValueKind::String,
        "This user's shell executable, absolute path.",
    ))
    .with_attribute(Attribute::required(
        "full_name",
        ValueKind::String,
        "This user's full name.",
    ))
    .with_attribute(Attribute::computed(
        "builtin",
        ValueKind::Bool,
        "Whether this is a builtin user.",
    ))
    .with_attribute(Attribute::optional(
        "smb",
        ValueKind::Bool,
        "Samba authentication: Set to allow user to authenticate to Samba shares.",
    ))
    .with_attribute(
        Attribute::optional("password", ValueKind::String, "This user's password.")
            .sensitive()
            .check(|v| check_str(v, validate_password)),
    )
    .with_attribute(
        Attribute::optional_computed(
            "password_disabled",
            ValueKind::Bool,
            "Password disabled: The account cannot use password-based logins for services.",
        )
        .conflicts_with(&["password", "locked"]),
    )
    .with_attribute(
        Attribute::optional(
            "locked",
            ValueKind::Bool,
            "Prevent the user from logging in or using password-based services until this option is unset. Requires a password.",
        )
        .conflicts_with(&["password_disabled"]),
    )
    .with_attribute(Attribute::optional(
        "sudo",
        ValueKind::Bool,
        "Permit sudo usage by this user.",
    ))
    .with_attribute(Attribute::optional(
        "sudo_nopasswd",
        ValueKind::Bool,
        "Permit sudo usage without password authentication for this user.",
    ))
    .with_attribute(Attribute::optional(
        "sudo_commands",
        ValueKind::StringSet,
        "List of permitted sudo commands for this user.",
    ))
    .with_attribute(Attribute::optional(
        "microsoft_account",
        ValueKind::Bool,
        "Microsoft account: Allow additional username authentication methods for Windows >=8 clients.",
    ))
    .with_attribute(Attribute::optional(
        "email",
        ValueKind::String,
        "This user's email address.",
    ))
    .with_attribute(Attribute::optional_computed(
        "primary_group",
        ValueKind::Int,
        "Group ID of this user's primary group (resource ID, not GID). If set, needs to exist.",
    ))
    .with_attribute(Attribute::computed(
        "primary_group_name",
        ValueKind::String,
        "The name of this user's primary group.",
    ))
    .with_attribute(Attribute::optional_computed(
        "groups",
        ValueKind::IntSet,
        "List of group IDs this user is member in (resource IDs, not GIDs).",
    ))
    .with_attribute(Attribute::optional(
        "sshpubkey",
        ValueKind::String,
        "This user's SSH pubkey.",
    ))
    .with_attribute(Attribute::computed(
        "local",
        ValueKind::Bool,
        "Whether this is a local user.",
    ))
    .with_attribute(Attribute::computed(
        "id_type_both",
        ValueKind::Bool,
        "Samba: ID_TYPE_BOTH",
    ))
}

/// Data source view: `user_id` is the lookup key, everything else is
/// reported. The write-only password does not exist here.
pub fn user_data_source_schema() -> ResourceSchema {
    let mut schema = user_schema();
    schema.description = "Get information about a specific user";
    schema.attributes.retain(|a| a.name != "password");
    for attribute in &mut schema.attributes {
        let mut lookup = if attribute.name == "user_id" {
            Attribute::required("user_id", ValueKind::Int, "User ID")
        } else {
            Attribute::computed(attribute.name, attribute.kind, attribute.description)
        };
        lookup.sensitive = attribute.sensitive;
        *attribute = lookup;
    }
    schema
}

#[derive(Debug, Clone)]
pub struct UserResource {
    client: TrueNasClient,
}

impl UserResource {
    pub fn new(client: TrueNasClient) -> Self {
        Self { client }
    }

    async fn fetch(&self, id: i64, password: Option<String>) -> Result<UserModel, ProviderError> {
        let user = self.client.get_user(id).await?;
        let mut state = flatten_user(&user);
        state.password = password;
        Ok(state)
    }
}

#[async_trait]
impl ManagedResource for UserResource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        USER_TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        user_schema()
    }

    async fn create(&self, config: &UserModel) -> Result<UserModel, ProviderError> {
        self.schema()
            .validate_config(&serde_json::to_value(config)?)?;

        let params = expand_user_create(config)?;
        let id = self.client.create_user(&params).await?;
        tracing::info!(user_id = id, username = %config.username, "TrueNAS user created");

        self.fetch(id, config.password.clone()).await
    }

    async fn read(&self, state: &UserModel) -> Result<Option<UserModel>, ProviderError> {
        let id = parse_id(&state.id)?;

        match self.fetch(id, state.password.clone()).await {
            Ok(user) => Ok(Some(user)),
            Err(ProviderError::TrueNas(e)) if e.is_not_found() => {
                tracing::warn!(user_id = id, "TrueNAS user no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        state: &UserModel,
        config: &UserModel,
    ) -> Result<UserModel, ProviderError> {
        self.schema()
            .validate_config(&serde_json::to_value(config)?)?;
        let id = parse_id(&state.id)?;

        let params = expand_user_update(state, config)?;
        if params.is_empty() {
            tracing::debug!(user_id = id, "no user changes to apply");
        } else {
            self.client.update_user(id, &params).await?;
            tracing::info!(user_id = id, "TrueNAS user updated");
        }

        self.fetch(id, config.password.clone()).await
    }

    async fn delete(&self, state: &UserModel) -> Result<(), ProviderError> {
        let id = parse_id(&state.id)?;
        let params = expand_user_delete(state);

        tracing::debug!(
            user_id = id,
            delete_group = params.delete_group,
            "Deleting TrueNAS user"
        );
        self.client.delete_user(id, &params).await?;
        tracing::info!(user_id = id, "TrueNAS user deleted");

        Ok(())
    }

    async fn import(&self, id: &str) -> Result<UserModel, ProviderError> {
        let id = parse_id(id)?;

        self.fetch(id, None).await.map_err(|e| match e {
            ProviderError::TrueNas(ref err) if err.is_not_found() => {
                ProviderError::ImportNotFound { kind: "user", id }
            }
            other => other,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UserDataSource {
    client: TrueNasClient,
}

impl UserDataSource {
    pub fn new(client: TrueNasClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for UserDataSource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        USER_TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        user_data_source_schema()
    }

    fn lookup_key(&self) -> &'static str {
        "user_id"
    }

    async fn read(&self, id: i64) -> Result<UserModel, ProviderError> {
        let user = self.client.get_user(id).await?;
        Ok(flatten_user(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truenas::PrimaryGroup;
    use serde_json::json;

    fn config() -> UserModel {
        UserModel {
            username: "tf_user".to_string(),
            full_name: "Terraform Test".to_string(),
            ..Default::default()
        }
    }

    fn synced_state() -> UserModel {
        UserModel {
            id: "42".to_string(),
            user_id: Some(42),
            uid: Some(17357),
            username: "tf_user".to_string(),
            unixhash: Some("$6$hash".to_string()),
            smbhash: Some("smbhash".to_string()),
            home: Some("/nonexistent".to_string()),
            shell: Some("/usr/sbin/nologin".to_string()),
            full_name: "Terraform Test".to_string(),
            builtin: Some(false),
            smb: Some(true),
            password: None,
            password_disabled: Some(true),
            locked: Some(false),
            sudo: Some(false),
            sudo_nopasswd: Some(false),
            sudo_commands: Some(BTreeSet::new()),
            microsoft_account: Some(false),
            email: None,
            primary_group: Some(45),
            primary_group_name: Some("tf_user".to_string()),
            groups: Some(BTreeSet::from([11])),
            sshpubkey: None,
            local: Some(true),
            id_type_both: Some(false),
        }
    }

    #[test]
    fn test_create_without_password_disables_password_auth() {
        let params = expand_user_create(&config()).unwrap();
        assert_eq!(params.password_disabled, Some(true));
        assert_eq!(params.password, None);
    }

    #[test]
    fn test_create_with_password_enables_password_auth() {
        let mut config = config();
        config.password = Some("s3cret".to_string());

        let params = expand_user_create(&config).unwrap();
        assert_eq!(params.password_disabled, Some(false));
        assert_eq!(params.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_create_locked_without_password_rejected() {
        let mut config = config();
        config.locked = Some(true);

        let err = expand_user_create(&config).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
        assert!(err.to_string().contains(LOCKED_NEEDS_PASSWORD));
    }

    #[test]
    fn test_create_locked_with_password_accepted() {
        let mut config = config();
        config.locked = Some(true);
        config.password = Some("s3cret".to_string());

        let params = expand_user_create(&config).unwrap();
        assert_eq!(params.locked, Some(true));
    }

    #[test]
    fn test_create_locked_and_password_disabled_rejected() {
        let mut config = config();
        config.locked = Some(true);
        config.password = Some("s3cret".to_string());
        config.password_disabled = Some(true);

        let err = expand_user_create(&config).unwrap_err();
        assert!(err.to_string().contains(LOCKED_CONFLICTS));
    }

    #[test]
    fn test_create_primary_group_reference() {
        let params = expand_user_create(&config()).unwrap();
        assert_eq!(params.group, None);
        assert_eq!(params.group_create, Some(true));

        let mut config = config();
        config.primary_group = Some(45);
        let params = expand_user_create(&config).unwrap();
        assert_eq!(params.group, Some(45));
        assert_eq!(params.group_create, Some(false));
    }

    #[test]
    fn test_create_omits_unset_optional_fields() {
        let json = serde_json::to_value(expand_user_create(&config()).unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "username": "tf_user",
                "full_name": "Terraform Test",
                "group_create": true,
                "home_mode": "755",
                "password_disabled": true
            })
        );
    }

    #[test]
    fn test_update_without_changes_is_empty() {
        let state = synced_state();
        let config = config();

        assert!(expand_user_update(&state, &config).unwrap().is_empty());
    }

    #[test]
    fn test_update_sends_only_changed_fields() {
        let state = synced_state();
        let mut config = config();
        config.shell = Some("/bin/zsh".to_string());
        config.smb = Some(true);
        config.groups = Some(BTreeSet::from([11, 12]));

        let json = serde_json::to_value(expand_user_update(&state, &config).unwrap()).unwrap();
        assert_eq!(json, json!({"shell": "/bin/zsh", "groups": [11, 12]}));
    }

    #[test]
    fn test_update_home_carries_home_mode() {
        let state = synced_state();
        let mut config = config();
        config.home = Some("/mnt/tank/tf_user".to_string());

        let params = expand_user_update(&state, &config).unwrap();
        assert_eq!(params.home.as_deref(), Some("/mnt/tank/tf_user"));
        assert_eq!(params.home_mode.as_deref(), Some("755"));
    }

    #[test]
    fn test_update_new_password_enables_password_auth() {
        let state = synced_state();
        let mut config = config();
        config.password = Some("s3cret".to_string());

        let params = expand_user_update(&state, &config).unwrap();
        assert_eq!(params.password.as_deref(), Some("s3cret"));
        assert_eq!(params.password_disabled, Some(false));
    }

    #[test]
    fn test_update_removed_password_disables_password_auth() {
        let mut state = synced_state();
        state.password = Some("s3cret".to_string());
        state.password_disabled = Some(false);

        let params = expand_user_update(&state, &config()).unwrap();
        assert_eq!(params.password, None);
        assert_eq!(params.password_disabled, Some(true));
    }

    #[test]
    fn test_password_disabled_false_without_password_settles_after_create() {
        let mut config = config();
        config.password_disabled = Some(false);

        let params = expand_user_create(&config).unwrap();
        assert_eq!(params.password_disabled, Some(true));

        let stored: User = serde_json::from_value(json!({
            "id": 42,
            "username": params.username,
            "full_name": params.full_name,
            "password_disabled": params.password_disabled,
            "group": {"id": 45, "bsdgrp_gid": 3001, "bsdgrp_group": "tf_user"}
        }))
        .unwrap();
        let state = flatten_user(&stored);
        assert_eq!(state.password_disabled, Some(true));

        let patch = expand_user_update(&state, &config).unwrap();
        assert!(patch.is_empty(), "unexpected patch: {:?}", patch);
    }

    #[test]
    fn test_update_never_patches_password_disabled_alone() {
        let state = synced_state();
        let mut config = config();
        config.password_disabled = Some(false);

        let params = expand_user_update(&state, &config).unwrap();
        assert_eq!(params.password_disabled, None);
    }

    #[test]
    fn test_update_unchanged_password_not_resent() {
        let mut state = synced_state();
        state.password = Some("s3cret".to_string());
        state.password_disabled = Some(false);
        let mut config = config();
        config.password = Some("s3cret".to_string());

        let params = expand_user_update(&state, &config).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_update_locked_without_any_password_rejected() {
        let state = synced_state();
        let mut config = config();
        config.locked = Some(true);

        let err = expand_user_update(&state, &config).unwrap_err();
        assert!(err.to_string().contains(LOCKED_NEEDS_PASSWORD));
    }

    #[test]
    fn test_update_locked_with_remote_password_accepted() {
        let mut state = synced_state();
        state.password_disabled = Some(false);
        let mut config = config();
        config.locked = Some(true);

        let params = expand_user_update(&state, &config).unwrap();
        assert_eq!(params.locked, Some(true));
    }

    #[test]
    fn test_update_locked_while_removing_password_rejected() {
        let mut state = synced_state();
        state.password = Some("s3cret".to_string());
        state.password_disabled = Some(false);
        let mut config = config();
        config.locked = Some(true);

        assert!(expand_user_update(&state, &config).is_err());
    }

    #[test]
    fn test_update_reordered_sets_produce_no_diff() {
        let mut state = synced_state();
        state.sudo_commands = Some(BTreeSet::from([
            "/usr/bin/id".to_string(),
            "/usr/bin/ls".to_string(),
        ]));
        state.groups = Some(BTreeSet::from([11, 12]));

        let config: UserModel = serde_json::from_value(json!({
            "username": "tf_user",
            "full_name": "Terraform Test",
            "sudo_commands": ["/usr/bin/ls", "/usr/bin/id"],
            "groups": [12, 11]
        }))
        .unwrap();

        assert!(expand_user_update(&state, &config).unwrap().is_empty());
    }

    #[test]
    fn test_delete_primary_group_named_like_user() {
        let state = synced_state();
        assert!(expand_user_delete(&state).delete_group);
    }

    #[test]
    fn test_delete_keeps_differently_named_primary_group() {
        let mut state = synced_state();
        state.primary_group_name = Some("staff".to_string());
        assert!(!expand_user_delete(&state).delete_group);
    }

    #[test]
    fn test_delete_keeps_unknown_primary_group() {
        let mut state = synced_state();
        state.primary_group_name = None;
        assert!(!expand_user_delete(&state).delete_group);
    }

    #[test]
    fn test_flatten_uses_group_resource_id_not_gid() {
        let user: User = serde_json::from_value(json!({
            "id": 42,
            "uid": 17357,
            "username": "tf_user",
            "full_name": "Terraform Test",
            "group": {"id": 45, "bsdgrp_gid": 17357, "bsdgrp_group": "tf_user"},
            "groups": [11]
        }))
        .unwrap();

        let state = flatten_user(&user);
        assert_eq!(state.id, "42");
        assert_eq!(state.user_id, Some(42));
        assert_eq!(state.primary_group, Some(45));
        assert_eq!(state.primary_group_name.as_deref(), Some("tf_user"));
        assert_eq!(state.groups, Some(BTreeSet::from([11])));
        assert_eq!(state.email, None);
        assert_eq!(state.password, None);
    }

    #[test]
    fn test_flatten_keeps_absent_lists_absent() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "username": "root",
            "full_name": "root"
        }))
        .unwrap();

        let state = flatten_user(&user);
        assert_eq!(state.sudo_commands, None);
        assert_eq!(state.groups, None);
    }

    #[test]
    fn test_flatten_keeps_empty_lists_empty() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "username": "root",
            "full_name": "root",
            "sudo_commands": [],
            "groups": []
        }))
        .unwrap();

        let state = flatten_user(&user);
        assert_eq!(state.sudo_commands, Some(BTreeSet::new()));
        assert_eq!(state.groups, Some(BTreeSet::new()));
    }

    #[test]
    fn test_expand_then_flatten_reproduces_config() {
        let config = UserModel {
            username: "tf_user".to_string(),
            full_name: "Terraform Test".to_string(),
            uid: Some(17357),
            home: Some("/mnt/tank/tf_user".to_string()),
            shell: Some("/usr/sbin/nologin".to_string()),
            smb: Some(false),
            password: Some("s3cret".to_string()),
            locked: Some(true),
            sudo: Some(true),
            sudo_nopasswd: Some(true),
            sudo_commands: Some(BTreeSet::from(["/usr/bin/id".to_string()])),
            microsoft_account: Some(true),
            email: Some("tf@test.acc".to_string()),
            primary_group: Some(45),
            groups: Some(BTreeSet::from([11])),
            sshpubkey: Some("ssh-ed25519 AAAA tf@test".to_string()),
            ..Default::default()
        };
        let params = expand_user_create(&config).unwrap();
        let stored = User {
            id: 42,
            uid: params.uid,
            username: params.username.clone(),
            unixhash: Some("$6$hash".to_string()),
            smbhash: Some("smbhash".to_string()),
            home: params.home.clone(),
            shell: params.shell.clone(),
            full_name: params.full_name.clone(),
            builtin: Some(false),
            smb: params.smb,
            password_disabled: params.password_disabled,
            locked: params.locked,
            sudo: params.sudo,
            sudo_nopasswd: params.sudo_nopasswd,
            sudo_commands: params.sudo_commands.clone(),
            microsoft_account: params.microsoft_account,
            email: params.email.clone(),
            group: Some(PrimaryGroup {
                id: params.group,
                bsdgrp_gid: Some(1000),
                bsdgrp_group: Some("staff".to_string()),
            }),
            groups: params.groups.clone(),
            sshpubkey: params.sshpubkey.clone(),
            local: Some(true),
            id_type_both: Some(false),
        };

        let mut state = flatten_user(&stored);
        state.password = config.password.clone();

        assert_eq!(state.username, config.username);
        assert_eq!(state.full_name, config.full_name);
        assert_eq!(state.uid, config.uid);
        assert_eq!(state.home, config.home);
        assert_eq!(state.shell, config.shell);
        assert_eq!(state.smb, config.smb);
        assert_eq!(state.locked, config.locked);
        assert_eq!(state.sudo, config.sudo);
        assert_eq!(state.sudo_nopasswd, config.sudo_nopasswd);
        assert_eq!(state.sudo_commands, config.sudo_commands);
        assert_eq!(state.microsoft_account, config.microsoft_account);
        assert_eq!(state.email, config.email);
        assert_eq!(state.primary_group, config.primary_group);
        assert_eq!(state.groups, config.groups);
        assert_eq!(state.sshpubkey, config.sshpubkey);
        assert_eq!(state.password_disabled, Some(false));
        assert!(expand_user_update(&state, &config).unwrap().is_empty());
    }

    #[test]
    fn test_schema_conflicts() {
        let schema = user_schema();
        let err = schema
            .validate_config(&json!({
                "username": "tf_user",
                "full_name": "Terraform Test",
                "password": "s3cret",
                "password_disabled": false
            }))
            .unwrap_err();
        assert!(err.to_string().contains("'password' conflicts with 'password_disabled'"));

        let err = schema
            .validate_config(&json!({
                "username": "tf_user",
                "full_name": "Terraform Test",
                "locked": true,
                "password_disabled": true
            }))
            .unwrap_err();
        assert!(err.to_string().contains("'locked' conflicts with 'password_disabled'"));
    }

    #[test]
    fn test_schema_rejects_question_mark_password() {
        let err = user_schema()
            .validate_config(&json!({
                "username": "tf_user",
                "full_name": "Terraform Test",
                "password": "what?"
            }))
            .unwrap_err();
        assert!(err.to_string().contains("'password' must not contain '?'"));
    }

    #[test]
    fn test_schema_rejects_computed_hashes() {
        let err = user_schema()
            .validate_config(&json!({
                "username": "tf_user",
                "full_name": "Terraform Test",
                "unixhash": "$6$"
            }))
            .unwrap_err();
        assert!(err.to_string().contains("'unixhash' is computed"));
    }

    #[test]
    fn test_data_source_schema_keeps_sensitivity() {
        let schema = user_data_source_schema();
        assert!(schema.attribute("password").is_none());
        assert!(schema.attribute("unixhash").unwrap().sensitive);
        assert!(schema.validate_config(&json!({"user_id": 42})).is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut state = synced_state();
        state.password = Some("super_secret_pw".to_string());

        let debug_output = format!("{:?}", state);
        assert!(!debug_output.contains("super_secret_pw"));
        assert!(!debug_output.contains("$6$hash"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
