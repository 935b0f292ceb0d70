use a11yscan_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    a11yscan_infra::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (queue, scan service, routes)
    let (state, router) = a11yscan_api::setup::initialize_app(config)?;

    // Start the server
    a11yscan_api::setup::server::start_server(&state.config, router).await?;

    Ok(())
}
