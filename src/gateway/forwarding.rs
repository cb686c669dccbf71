// file: src/gateway/forwarding.rs
// description: index, query and status operations shared by the HTTP handlers and the CLI
// reference: request/response forwarding to the GitHub Chat MCP server

use crate::config::Config;
use crate::gateway::dispatcher::{BackgroundDispatcher, IndexJob};
use crate::mcp::McpClient;
use crate::models::{IndexRequest, QueryRequest, ResponseEnvelope, StatusReport};
use serde_json::{Map, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

pub const INDEX_FAILED_MESSAGE: &str = "Erro ao iniciar indexação";
pub const QUERY_OK_MESSAGE: &str = "Consulta realizada com sucesso";
pub const QUERY_FAILED_MESSAGE: &str = "Erro ao consultar repositório";

pub fn index_started_message(repo_url: &str) -> String {
    format!("Indexação do repositório {} iniciada com sucesso", repo_url)
}

/// Hands the index call to the background dispatcher and acknowledges at once.
/// The outcome of the outbound call never reaches the caller.
pub fn start_indexing(
    dispatcher: &BackgroundDispatcher,
    request: &IndexRequest,
    request_id: Uuid,
) -> ResponseEnvelope {
    info!(%request_id, repo_url = %request.repo_url, branch = %request.branch, "Indexing repository");

    let accepted = request
        .validate()
        .and_then(|_| dispatcher.submit(IndexJob::new(request_id, request.repo_url.clone())));

    match accepted {
        Ok(()) => {
            let mut data = Map::new();
            data.insert("repo_url".to_string(), Value::from(request.repo_url.clone()));
            data.insert("status".to_string(), Value::from("indexing"));
            ResponseEnvelope::ok(index_started_message(&request.repo_url), data)
        }
        Err(e) => {
            error!(%request_id, repo_url = %request.repo_url, error = %e, "Failed to start indexing");
            ResponseEnvelope::failure(INDEX_FAILED_MESSAGE, &e)
        }
    }
}

/// Best-effort index followed by the actual query. Only the query outcome
/// decides the envelope; it may race an index still running upstream.
pub async fn query_repository(
    client: &McpClient,
    request: &QueryRequest,
    request_id: Uuid,
) -> ResponseEnvelope {
    info!(%request_id, repo_url = %request.repo_url, "Querying repository");

    if let Err(e) = request.validate() {
        warn!(%request_id, error = %e, "Rejected query request");
        return ResponseEnvelope::failure(QUERY_FAILED_MESSAGE, &e);
    }

    if let Err(e) = client.index_repository(&request.repo_url).await {
        warn!(
            %request_id,
            repo_url = %request.repo_url,
            error = %e,
            "Could not index repository before query (it may already be indexed)"
        );
    }

    match client
        .query_repository(&request.repo_url, &request.question, request.history())
        .await
    {
        Ok(value) => ResponseEnvelope::ok(QUERY_OK_MESSAGE, ResponseEnvelope::data_from_value(value)),
        Err(e) => {
            error!(
                %request_id,
                repo_url = %request.repo_url,
                transport = e.is_transport(),
                error = %e,
                "Query failed"
            );
            ResponseEnvelope::failure(QUERY_FAILED_MESSAGE, &e)
        }
    }
}

pub fn status(config: &Config) -> StatusReport {
    StatusReport::from_config(config)
}
