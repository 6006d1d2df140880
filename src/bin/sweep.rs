#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::missing_const_for_fn)]
#![deny(clippy::nursery)]
#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use cam_directory::{
    cache::{self, CacheStore},
    config::Config,
};
use std::time::Duration;
use tracing::info;

// One-off cache cleanup, for running from cron instead of relying on the
// probabilistic sweep done by page requests.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    std::env::set_var(
        "RUST_LOG",
        std::env::var("RUST_LOG").unwrap_or_else(|_| String::from("info")),
    );

    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let max_age = match std::env::args().nth(1) {
        Some(secs) => Duration::from_secs(secs.parse()?),
        None => cache::RETENTION,
    };

    let store = CacheStore::new(config.cache_dir);
    let removed = store.sweep(max_age).await;
    info!(
        "removed {removed} cache files older than {}s from {}",
        max_age.as_secs(),
        store.dir().display()
    );

    Ok(())
}
