use serde::{Deserialize, Serialize};

/// Home directory permissions applied whenever `home` is written.
pub const DEFAULT_HOME_MODE: &str = "755";

/// A user account as returned by `GET /user/id/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub uid: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub unixhash: Option<String>,
    #[serde(default)]
    pub smbhash: Option<String>,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub shell: Option<String>,
    pub full_name: String,
    #[serde(default)]
    pub builtin: Option<bool>,
    #[serde(default)]
    pub smb: Option<bool>,
    #[serde(default)]
    pub password_disabled: Option<bool>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub sudo: Option<bool>,
    #[serde(default)]
    pub sudo_nopasswd: Option<bool>,
    #[serde(default)]
    pub sudo_commands: Option<Vec<String>>,
    #[serde(default)]
    pub microsoft_account: Option<bool>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub group: Option<PrimaryGroup>,
    #[serde(default)]
    pub groups: Option<Vec<i64>>,
    #[serde(default)]
    pub sshpubkey: Option<String>,
    #[serde(default)]
    pub local: Option<bool>,
    #[serde(default)]
    pub id_type_both: Option<bool>,
}

/// The primary group embedded in a user response.
///
/// NOTE: `id` is the group's resource id, `bsdgrp_gid` the unix GID.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrimaryGroup {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub bsdgrp_gid: Option<i64>,
    #[serde(default)]
    pub bsdgrp_group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateUserParams {
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_create: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smb: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_nopasswd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_commands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub microsoft_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sshpubkey: Option<String>,
}

/// Partial user update. Every `None` field is left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateUserParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smb: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_nopasswd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_commands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub microsoft_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sshpubkey: Option<String>,
}

impl UpdateUserParams {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeleteUserParams {
    pub delete_group: bool,
}

/// A group as returned by `GET /group/id/{id}`. The group name is the `group` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    pub id: i64,
    #[serde(default)]
    pub gid: Option<i64>,
    pub group: String,
    #[serde(default)]
    pub builtin: Option<bool>,
    #[serde(default)]
    pub sudo: Option<bool>,
    #[serde(default)]
    pub sudo_nopasswd: Option<bool>,
    #[serde(default)]
    pub sudo_commands: Option<Vec<String>>,
    #[serde(default)]
    pub smb: Option<bool>,
    #[serde(default)]
    pub users: Option<Vec<i64>>,
    #[serde(default)]
    pub local: Option<bool>,
    #[serde(default)]
    pub id_type_both: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateGroupParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_duplicate_gid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smb: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_nopasswd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_commands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateGroupParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_duplicate_gid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smb: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_nopasswd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_commands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<i64>>,
}

impl UpdateGroupParams {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeleteGroupParams {
    pub delete_users: bool,
}
