// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use github_chat_gateway::gateway::forwarding;
use github_chat_gateway::utils::logging::{format_error, format_info, format_success};
use github_chat_gateway::{
    Config, ConversationMessage, McpClient, QueryRequest, Validator, run_server,
};
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "github_chat_gateway")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "HTTP gateway for the GitHub Chat MCP server", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = github_chat_gateway::config::DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        #[arg(long, env = "GATEWAY_HOST")]
        host: Option<String>,

        #[arg(short, long, env = "GATEWAY_PORT")]
        port: Option<u16>,
    },

    /// Index a repository synchronously and print the MCP server's reply
    Index { repo_url: String },

    /// Ask a question about a repository
    Query {
        repo_url: String,

        question: String,

        /// Prior turns as a JSON array of {"role", "content"} objects
        #[arg(long, value_name = "JSON")]
        history: Option<String>,
    },

    /// Show the configured MCP server and API key presence
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    github_chat_gateway::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(config, host, port).await?;
        }
        Commands::Index { repo_url } => {
            cmd_index(&config, &repo_url).await?;
        }
        Commands::Query {
            repo_url,
            question,
            history,
        } => {
            cmd_query(&config, repo_url, question, history.as_deref()).await?;
        }
        Commands::Status => {
            cmd_status(&config);
        }
    }

    Ok(())
}

async fn cmd_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate().context("Invalid server configuration")?;

    run_server(config).await.context("Gateway server failed")?;
    Ok(())
}

async fn cmd_index(config: &Config, repo_url: &str) -> Result<()> {
    Validator::validate_repo_url(repo_url)?;

    let client = McpClient::new(&config.mcp).context("Failed to create MCP client")?;
    info!("Indexing {} via {}", repo_url, client.base_url());

    match client.index_repository(repo_url).await {
        Ok(result) => {
            println!("{}", format_success(&format!("Indexed {}", repo_url)));
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", format_error(&e.to_string()));
            Err(e).context("Indexing failed")
        }
    }
}

async fn cmd_query(
    config: &Config,
    repo_url: String,
    question: String,
    history: Option<&str>,
) -> Result<()> {
    let client = McpClient::new(&config.mcp).context("Failed to create MCP client")?;
    let mut request = QueryRequest::new(repo_url, question);
    if let Some(history) = history {
        let turns: Vec<ConversationMessage> =
            serde_json::from_str(history).context("--history must be a JSON array of messages")?;
        request = request.with_history(turns);
    }

    let envelope = forwarding::query_repository(&client, &request, Uuid::new_v4()).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if envelope.success {
        println!("{}", format_success(&envelope.message));
        Ok(())
    } else {
        let detail = envelope.error.as_deref().unwrap_or("unknown error");
        println!("{}", format_error(detail));
        Err(anyhow::anyhow!("{}: {}", envelope.message, detail))
    }
}

fn cmd_status(config: &Config) {
    let report = forwarding::status(config);
    println!("{}", format_info(&report.format()));
}
