mod client;
mod error;
mod types;

pub use client::TrueNasClient;
pub use error::TrueNasError;
pub use types::{
    CreateGroupParams, CreateUserParams, DEFAULT_HOME_MODE, DeleteGroupParams, DeleteUserParams,
    Group, PrimaryGroup, UpdateGroupParams, UpdateUserParams, User,
};
