//! Client for the third-party room listing API.

use crate::{
    config::Config,
    entities::{RoomQuery, RoomsResponse},
    error::UpstreamError,
};
use async_trait::async_trait;
use metrics::histogram;
use reqwest::{redirect::Policy, Client};
use std::{net::IpAddr, time::Duration, time::Instant};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can produce a page of rooms for a query.
#[async_trait]
pub trait RoomSource: Send + Sync {
    async fn fetch_rooms(
        &self,
        query: &RoomQuery,
        client_ip: Option<IpAddr>,
    ) -> Result<RoomsResponse, UpstreamError>;
}

/// The real listing API over HTTPS. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    api_url: String,
    affiliate_id: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::limited(10))
            .user_agent(format!("{}/1.0", config.site_name))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            affiliate_id: config.affiliate_id.clone(),
        })
    }

    fn query_pairs(
        &self,
        query: &RoomQuery,
        client_ip: Option<IpAddr>,
    ) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("wm", self.affiliate_id.clone()),
            ("format", "json".to_string()),
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];

        if let Some(ip) = client_ip {
            pairs.push(("client_ip", ip.to_string()));
        }
        if let Some(gender) = query.gender {
            pairs.push(("gender", gender.code().to_string()));
        }
        if let Some(region) = query.region {
            pairs.push(("region", region.code().to_string()));
        }
        for tag in query.forwarded_tags() {
            pairs.push(("tag", tag.clone()));
        }
        if query.hd {
            pairs.push(("hd", "true".to_string()));
        }

        pairs
    }
}

#[async_trait]
impl RoomSource for UpstreamClient {
    async fn fetch_rooms(
        &self,
        query: &RoomQuery,
        client_ip: Option<IpAddr>,
    ) -> Result<RoomsResponse, UpstreamError> {
        let start = Instant::now();

        let response = self
            .http
            .get(&self.api_url)
            .query(&self.query_pairs(query, client_ip))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        let rooms = serde_json::from_slice(&body)?;

        let elapsed = start.elapsed();
        histogram!("cams_upstream_time", elapsed);

        Ok(rooms)
    }
}
