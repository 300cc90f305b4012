use parkify::garage::GarageRegistry;
use parkify::{api, config, prediction, state};
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use tracing::Level;

fn init_tracing(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_default()?;
    init_tracing(config.log_level());
    tracing::info!(
        config_path = config::DEFAULT_CONFIG_PATH,
        app = %config.app.name,
        "parkify starting"
    );

    let registry = GarageRegistry::new(config.garages.clone())?;
    if registry.is_empty() {
        tracing::warn!("No garages configured in [[garages]]");
    }

    let model = match prediction::create_model(config.model_name()) {
        Ok(model) => model,
        Err(e) => {
            tracing::warn!(error = %e, "Unknown prediction model, using linear trend");
            Box::new(prediction::linear::LinearTrendModel::new())
        }
    };
    tracing::info!(
        model = model.name(),
        garages = registry.len(),
        history_capacity = config.history_capacity(),
        "Prediction model loaded"
    );

    let app_state = state::AppState::new(
        registry,
        config.history_capacity(),
        Arc::from(model),
        config.feed_offset()?,
    )
    .with_default_horizon(config.default_horizon_minutes());
    let state = Arc::new(RwLock::new(app_state));

    let app = api::router(Arc::clone(&state));
    let port = config.server_port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
