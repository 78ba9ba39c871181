use std::path::PathBuf;

use clap::{Parser, Subcommand};
use truenas_provider::ResourceKind;
use truenas_provider::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// TrueNAS API root, e.g. https://nas.local/api/v2.0
    #[arg(long, global = true, env = "TRUENAS_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, global = true, env = "TRUENAS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage a user or group through its lifecycle
    Resource {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Look up an existing user or group by resource id
    Data(DataArgs),
    /// Print attribute declarations
    Schema(SchemaArgs),
}

#[derive(Subcommand, Debug)]
pub enum ResourceAction {
    Create(CreateArgs),
    Read(StateArgs),
    Update(UpdateArgs),
    Delete(StateArgs),
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    #[arg(value_enum)]
    pub kind: ResourceKind,

    /// Configuration JSON file, `-` for stdin
    #[arg(long)]
    pub config: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct StateArgs {
    #[arg(value_enum)]
    pub kind: ResourceKind,

    /// State JSON file, `-` for stdin
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    #[arg(value_enum)]
    pub kind: ResourceKind,

    #[arg(long)]
    pub state: PathBuf,

    #[arg(long)]
    pub config: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    #[arg(value_enum)]
    pub kind: ResourceKind,

    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DataArgs {
    #[arg(value_enum)]
    pub kind: ResourceKind,

    pub id: i64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub kind: Option<ResourceKind>,
}
