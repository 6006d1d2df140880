use crate::{client_ip, entities::RoomQuery, pages, render, AppState};
use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use metrics::increment_counter;
use std::net::SocketAddr;
use tracing::warn;

/// Renders a content page, or sends anything else back to `/`.
pub async fn page(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    let Some(page) = pages::resolve(uri.path()) else {
        return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/")]).into_response();
    };
    increment_counter!("cams_rooms_request", "route" => "page");

    let query = RoomQuery {
        gender: page.gender,
        ..RoomQuery::first_page(state.config.default_limit)
    };
    let client_ip = client_ip::resolve(&headers, peer.map(|ConnectInfo(addr)| addr.ip()));

    let (rooms, total_rooms) = match state.rooms(&query, client_ip).await {
        Ok(response) => (response.results, response.count),
        Err(err) => {
            warn!("rendering {} without rooms: {err}", page.path);
            (Vec::new(), 0)
        }
    };

    state.maybe_sweep();

    Html(render::page(&state.config, page, &rooms, total_rooms)).into_response()
}
