use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use canopy_server::api::AppState;
use canopy_server::{
    AnalyzeService, AppConfig, ClimateAggregator, LocationResolver, OpenCageClient,
    OpenMeteoArchive, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let state = Arc::new(AppState {
        analyze: AnalyzeService::new(
            LocationResolver::new(Box::new(OpenCageClient::new(&config)?)),
            ClimateAggregator::new(Box::new(OpenMeteoArchive::new(&config)?)),
        ),
        autocomplete: LocationResolver::new(Box::new(OpenCageClient::new(&config)?)),
    });

    web::run(state, config.port).await
}
