#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::missing_const_for_fn)]
#![deny(clippy::nursery)]
#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

use cache::CacheStore;
use config::Config;
use entities::{RoomQuery, RoomsResponse};
use error::UpstreamError;
use metrics::increment_counter;
use rand::Rng;
use std::{net::IpAddr, sync::Arc};
use upstream::{RoomSource, UpstreamClient};

pub mod cache;
pub mod client_ip;
pub mod config;
pub mod controller;
pub mod entities;
pub mod error;
pub mod pages;
pub mod render;
pub mod routes;
pub mod upstream;
pub mod util;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: CacheStore,
    pub source: Arc<dyn RoomSource>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, UpstreamError> {
        let source = UpstreamClient::new(&config)?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    pub fn with_source(config: Config, source: Arc<dyn RoomSource>) -> Self {
        let cache = CacheStore::new(config.cache_dir.clone());
        Self {
            config: Arc::new(config),
            cache,
            source,
        }
    }

    /// Serves a page of rooms from the cache, falling back to the listing
    /// API and storing what it returns.
    pub async fn rooms(
        &self,
        query: &RoomQuery,
        client_ip: Option<IpAddr>,
    ) -> Result<RoomsResponse, UpstreamError> {
        let signature = cache::signature(query);

        if let Some(rooms) = self.cache.get(&signature).await {
            increment_counter!("cams_cache_hit");
            return Ok(rooms);
        }
        increment_counter!("cams_cache_miss");

        let rooms = self
            .source
            .fetch_rooms(query, client_ip)
            .await
            .map_err(|err| {
                increment_counter!("cams_upstream_failure");
                err
            })?;
        self.cache.put(&signature, &rooms).await;

        Ok(rooms)
    }

    /// Occasionally clears out old cache files on a background task.
    pub fn maybe_sweep(&self) {
        if rand::thread_rng().gen_bool(cache::SWEEP_PROBABILITY) {
            let cache = self.cache.clone();
            tokio::spawn(async move {
                cache.sweep(cache::RETENTION).await;
            });
        }
    }
}
