mod ai;
mod cli;
mod config;
mod error;
mod pipeline;
mod router;
mod store;
mod ui;

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ai::{AnthropicClient, OpenAiClient, TaskType};
use cli::{Cli, Command};
use config::PipewiseConfig;
use error::PipelineError;
use pipeline::{Client, StageChangeRequest, StageTransitionPolicy};
use router::{AiRouter, TaskRouter};
use store::{ActivityLog, ClientStore, JsonStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::debug!("command failed: {e:?}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// PIPEWISE_LOG_FORMAT=json enables machine-parseable output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "pipewise=info" } else { "pipewise=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    match std::env::var("PIPEWISE_LOG_FORMAT").as_deref() {
        Ok("json") => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = PipewiseConfig::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let acting_user = cli.user.unwrap_or_else(|| config.acting_user.clone());
    let store = JsonStore::open(data_dir);

    match cli.command {
        Command::Add { name } => {
            if name.trim().is_empty() {
                bail!("Client name must not be empty");
            }
            let client = Client::new(name.trim().to_string());
            store.create_client(&client).await?;
            ui::print_client_created(&client);
        }
        Command::List => {
            let clients = store.list_clients().await?;
            ui::print_clients(&clients);
        }
        Command::Show { client_id } => {
            let client = store.get_client(&client_id).await?;
            let entries = store.entries_for(&client_id).await?;
            ui::print_client_history(&client, &entries);
        }
        Command::Classify { from, to } => {
            if from == to {
                bail!("Source and target stage are both {from}");
            }
            ui::print_classification(from, to, StageTransitionPolicy::classify(from, to));
        }
        Command::Move {
            client_id,
            to,
            reason,
        } => {
            let client = store.get_client(&client_id).await?;
            let request = StageChangeRequest {
                client_id,
                from_stage: client.stage,
                to_stage: to,
                reason,
            };
            match StageTransitionPolicy::apply(&store, &store, request, &acting_user).await {
                Ok(entry) => ui::print_entry(&entry),
                Err(e) => {
                    if e.is_validation() {
                        let needs_reason = matches!(e, PipelineError::ReasonRequired { .. });
                        ui::print_reprompt(&e.to_string(), needs_reason);
                    } else if e.is_partial_success() {
                        ui::print_unaudited_warning();
                    }
                    bail!(e);
                }
            }
        }
        Command::Draft { prompt, task } => {
            let task = task
                .map(TaskType::from)
                .unwrap_or_else(|| TaskRouter::infer(&prompt));
            let router = build_router(&config)?;
            if !router.is_configured() {
                bail!("No AI provider configured. Set ANTHROPIC_API_KEY or OPENAI_API_KEY.");
            }

            let progress = ui::DraftProgress::start(task);
            match router.run(task, &prompt).await {
                Ok(completion) => progress.finish(&completion),
                Err(e) => {
                    progress.fail();
                    bail!(e);
                }
            }
        }
    }

    Ok(())
}

fn build_router(config: &PipewiseConfig) -> Result<AiRouter<AnthropicClient, OpenAiClient>> {
    let timeout = config.request_timeout();
    let claude = if config.anthropic_api_key.is_empty() {
        None
    } else {
        Some(AnthropicClient::new(config.anthropic_api_key.clone(), timeout)?)
    };
    let openai = if config.openai_api_key.is_empty() {
        None
    } else {
        Some(OpenAiClient::new(config.openai_api_key.clone(), timeout)?)
    };
    Ok(AiRouter::new(claude, openai))
}
