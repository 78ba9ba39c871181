mod cli;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ResourceAction};
use truenas_provider::output;
use truenas_provider::{ProviderConfig, ResourceKind, TrueNasProvider};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries state documents, logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        base_url,
        api_key,
        command,
    } = Cli::parse();

    match command {
        Command::Schema(args) => {
            let kinds = args.kind.map_or(ResourceKind::ALL.to_vec(), |kind| vec![kind]);
            for kind in kinds {
                println!("{}\n", output::render_schema(&kind.resource_schema()));
            }
        }
        Command::Resource { action } => {
            let provider = connect(base_url, api_key)?;

            match action {
                ResourceAction::Create(args) => {
                    let config = cli::read_json(&args.config)?;
                    let state = provider.create(args.kind.type_name(), config).await?;
                    print_json(&state)?;
                }
                ResourceAction::Read(args) => {
                    let state = cli::read_json(&args.state)?;
                    match provider.read(args.kind.type_name(), state).await? {
                        Some(state) => print_json(&state)?,
                        None => {
                            tracing::info!(
                                resource_type = args.kind.type_name(),
                                "resource no longer exists, state cleared"
                            );
                            print_json(&serde_json::Value::Null)?;
                        }
                    }
                }
                ResourceAction::Update(args) => {
                    let state = cli::read_json(&args.state)?;
                    let config = cli::read_json(&args.config)?;
                    let state = provider
                        .update(args.kind.type_name(), state, config)
                        .await?;
                    print_json(&state)?;
                }
                ResourceAction::Delete(args) => {
                    let state = cli::read_json(&args.state)?;
                    provider.delete(args.kind.type_name(), state).await?;
                    tracing::info!(resource_type = args.kind.type_name(), "resource deleted");
                }
                ResourceAction::Import(args) => {
                    let state = provider.import(args.kind.type_name(), &args.id).await?;
                    print_json(&state)?;
                }
            }
        }
        Command::Data(args) => {
            let provider = connect(base_url, api_key)?;

            let mut lookup = serde_json::Map::new();
            lookup.insert(args.kind.lookup_key().to_string(), args.id.into());

            let state = provider
                .read_data_source(args.kind.type_name(), lookup.into())
                .await?;
            let schema = args.kind.data_source_schema();
            println!("{}", output::render_state(&state, &schema, args.format)?);
        }
    }

    Ok(())
}

fn connect(base_url: Option<String>, api_key: Option<String>) -> Result<TrueNasProvider> {
    let config = ProviderConfig::new(base_url, api_key)?;
    Ok(TrueNasProvider::configure(&config)?)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
