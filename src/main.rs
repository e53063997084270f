mod answer;
mod config;
mod interface;
mod linkup;
mod markdown;
mod openai;
mod server;

pub const USER_AGENT: &str = concat!("askline/", env!("CARGO_PKG_VERSION"));

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use config::Config;
use interface::EndpointClient;
use interface::render::{render_answer, render_error};
use linkup::LinkupClient;
use openai::OpenAiClient;
use server::AppState;

#[derive(Parser)]
#[command(name = "askline", version, about = "Ask a question, get a sourced answer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP endpoint (POST /search)
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: String,
    },
    /// Ask a running endpoint; reads questions from stdin when none is given
    Ask {
        /// Base URL of the endpoint
        #[arg(long, default_value = "http://localhost:8000")]
        endpoint: String,
        /// The question to answer
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("askline=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let config = Config::from_env()
                .inspect_err(|e| tracing::error!("configuration error: {e}"))?;
            let state = AppState::new(LinkupClient::new(&config)?, OpenAiClient::new(&config)?);
            info!(model = %config.openai_model, "starting askline endpoint");
            server::serve(&bind, state).await?;
            info!("server stopped");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ask { endpoint, query } => {
            let client = EndpointClient::new(&endpoint)?;
            match query {
                Some(query) => {
                    if !query.trim().is_empty() {
                        eprintln!("{}", interface::SEARCHING_STATUS);
                    }
                    match client.ask(&query).await {
                        Ok(answer) => {
                            println!("{}", render_answer(&answer));
                            Ok(ExitCode::SUCCESS)
                        }
                        Err(e) => {
                            eprintln!("{}", render_error(&e));
                            Ok(ExitCode::FAILURE)
                        }
                    }
                }
                None => {
                    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                    interface::run_interactive(&client, stdin, &mut std::io::stdout()).await?;
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
    }
}
