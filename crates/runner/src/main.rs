mod config;
mod error;
mod workflow;

use auth::ApiCredentials;
use config::RunnerConfig;
use error::WorkflowError;
use nicehash_rest::NicehashRestClient;
use tracing::{error, info};
use workflow::Workflow;

#[tokio::main]
async fn main() {
    common::init_logging();

    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hashpower".to_string());

    if let Err(e) = run(&name).await {
        error!(workflow = %name, error = %e, "Workflow failed");
        std::process::exit(1);
    }

    info!(workflow = %name, "Workflow complete");
}

async fn run(name: &str) -> Result<(), WorkflowError> {
    let workflow: Workflow = name.parse()?;
    let config = RunnerConfig::from_env();
    let credentials = ApiCredentials::from_env()?;

    let client = NicehashRestClient::with_environment(credentials, config.environment)?
        .with_locale(config.locale.clone());

    info!(
        environment = %config.environment,
        base_url = %client.base_url(),
        api_key = %client.api_key(),
        workflow = ?workflow,
        "Starting workflow"
    );

    match workflow {
        Workflow::Hashpower => {
            let outcome = workflow::run_hashpower(&client, &config.hashpower).await?;
            info!(pool_id = %outcome.pool_id, order_id = %outcome.order_id, "Hashpower workflow done");
        }
        Workflow::Exchange => {
            let outcome = workflow::run_exchange(&client, &config.exchange).await?;
            info!(market = %outcome.market, order_id = %outcome.order_id, "Exchange workflow done");
        }
    }

    Ok(())
}
