use std::process::ExitCode;
use std::sync::Arc;

use secret_sync_core::config::SyncConfig;
use secret_sync_lambda::handlers::orchestrator::run_with_aws;
use secret_sync_lambda::telemetry::init_tracing;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match SyncConfig::from_env() {
        Ok(value) => Arc::new(value),
        Err(config_error) => {
            error!(error = %config_error, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let summary = match run_with_aws(config).await {
        Ok(value) => value,
        Err(sync_error) => {
            error!(kind = sync_error.kind(), error = %sync_error, "secret synchronization aborted");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(body) => {
            println!("{body}");
            ExitCode::SUCCESS
        }
        Err(serialize_error) => {
            error!(error = %serialize_error, "failed to serialize run summary");
            ExitCode::FAILURE
        }
    }
}
