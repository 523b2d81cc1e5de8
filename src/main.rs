use tracing::info;

use valuedeck_rs::config::{self, Config};
use valuedeck_rs::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load(config::default_path())?;
    logging::init(&cfg.general.log_level)?;
    info!(?cfg, "loaded config");

    server::serve(&cfg).await
}
