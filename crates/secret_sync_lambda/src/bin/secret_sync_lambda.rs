use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use secret_sync_core::config::SyncConfig;
use secret_sync_core::summary::RunSummary;
use secret_sync_lambda::handlers::orchestrator::run_with_aws;
use secret_sync_lambda::telemetry::init_tracing;
use serde_json::Value;

async fn handle_request(
    _event: LambdaEvent<Value>,
    config: Arc<SyncConfig>,
) -> Result<RunSummary, Error> {
    let summary = run_with_aws(config).await.map_err(|error| {
        tracing::error!(kind = error.kind(), error = %error, "secret synchronization aborted");
        Error::from(error)
    })?;
    Ok(summary)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let config = Arc::new(SyncConfig::from_env()?);

    lambda_runtime::run(service_fn(move |event| {
        let config = Arc::clone(&config);
        async move { handle_request(event, config).await }
    }))
    .await
}
