use std::process::ExitCode;

use sycamore_server::{config::AppConfig, init_tracing, run};

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before tracing so RUST_LOG may come from .env; a missing file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
