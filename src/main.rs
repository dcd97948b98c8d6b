use std::sync::Arc;

use anyhow::Context;

use launch_dash::app;
use launch_dash::config::Config;
use launch_dash::data::loader;
use launch_dash::state::AppState;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env();

    let dataset = loader::load_file(&config.data_path)
        .with_context(|| format!("loading launch data from {}", config.data_path.display()))?;
    log::info!(
        "Loaded {} launches from {} sites {:?}, payload {}..={} kg",
        dataset.len(),
        dataset.sites.len(),
        dataset.sites,
        dataset.payload_bounds.min,
        dataset.payload_bounds.max
    );

    let state = Arc::new(AppState::new(dataset));
    app::serve(&config, state).await
}
