use crate::{
    client_ip,
    entities::{Gender, Region, RoomQuery, RoomsResponse, MAX_LIMIT},
    error::AppError,
    AppState,
};
use axum::{
    extract::{ConnectInfo, Query, State},
    http::HeaderMap,
    Json,
};
use metrics::increment_counter;
use std::net::SocketAddr;

/// Builds a query from the raw query-string pairs.
///
/// `tag` may repeat; for `gender` and `region` the first known code wins.
/// A missing, zero or unparsable `limit` falls back to `default_limit`.
pub fn parse_query(pairs: &[(String, String)], default_limit: u32) -> RoomQuery {
    let mut query = RoomQuery::first_page(default_limit);

    for (key, value) in pairs {
        let value = value.trim();
        match key.as_str() {
            "limit" => {
                query.limit = match value.parse::<u32>() {
                    Ok(0) | Err(_) => default_limit,
                    Ok(limit) => limit.min(MAX_LIMIT),
                };
            }
            "offset" => query.offset = value.parse().unwrap_or(0),
            "gender" if query.gender.is_none() => query.gender = Gender::from_code(value),
            "region" if query.region.is_none() => query.region = Region::from_code(value),
            "tag" | "tag[]" if !value.is_empty() => query.tags.push(value.to_string()),
            "hd" => query.hd = value == "true" || value == "1",
            _ => {}
        }
    }

    query
}

pub async fn rooms(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> Result<Json<RoomsResponse>, AppError> {
    increment_counter!("cams_rooms_request", "route" => "api");

    let query = parse_query(&pairs, state.config.default_limit);
    let client_ip = client_ip::resolve(&headers, peer.map(|ConnectInfo(addr)| addr.ip()));

    let rooms = state.rooms(&query, client_ip).await?;
    Ok(Json(rooms))
}
