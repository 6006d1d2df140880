use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use cam_directory::{
    config::Config,
    entities::{Gender, Room, RoomQuery, RoomsResponse},
    error::UpstreamError,
    routes, AppState,
};
use serde_json::{json, Value};
use std::{
    net::IpAddr,
    sync::{Arc, Mutex},
};
use tempfile::TempDir;
use tower::ServiceExt;

/// Records every call and answers with a fixed page, or fails.
struct FakeSource {
    response: Option<RoomsResponse>,
    calls: Mutex<Vec<(RoomQuery, Option<IpAddr>)>>,
}

impl FakeSource {
    fn answering(response: RoomsResponse) -> Arc<Self> {
        Arc::new(Self {
            response: Some(response),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(RoomQuery, Option<IpAddr>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl cam_directory::upstream::RoomSource for FakeSource {
    async fn fetch_rooms(
        &self,
        query: &RoomQuery,
        client_ip: Option<IpAddr>,
    ) -> Result<RoomsResponse, UpstreamError> {
        self.calls.lock().unwrap().push((query.clone(), client_ip));
        self.response
            .clone()
            .ok_or(UpstreamError::Status(reqwest::StatusCode::BAD_GATEWAY))
    }
}

fn room(username: &str) -> Room {
    serde_json::from_value(json!({
        "username": username,
        "age": 22,
        "gender": "f",
        "tags": ["latina"],
        "num_users": 10,
        "seconds_online": 120,
        "image_url_360x270": "https://img.example/a.jpg",
        "chat_room_url_revshare": "https://upstream.example/a/"
    }))
    .unwrap()
}

fn page_of(count: u64, rooms: usize) -> RoomsResponse {
    RoomsResponse {
        count,
        results: (0..rooms).map(|i| room(&format!("user{i}"))).collect(),
    }
}

fn app(source: Arc<FakeSource>) -> (Router, TempDir) {
    let cache_dir = TempDir::new().unwrap();
    let config = Config {
        cache_dir: cache_dir.path().to_path_buf(),
        ..Config::default()
    };
    (
        routes::router(AppState::with_source(config, source)),
        cache_dir,
    )
}

async fn get(app: &Router, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, String) {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

    match location {
        Some(location) => (status, location),
        None => (status, String::from_utf8(body.to_vec()).unwrap()),
    }
}

#[tokio::test]
async fn girls_page_renders_first_page() {
    let source = FakeSource::answering(page_of(100, 36));
    let (app, _cache) = app(source.clone());

    let (status, html) = get(&app, "/girls", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches(r#"class="room-card "#).count(), 36);
    assert_eq!(html.matches(r#"fetchpriority="high""#).count(), 6);
    assert_eq!(html.matches(r#"loading="lazy""#).count(), 30);
    assert!(html.contains(r#"class="load-more" id="load-more-btn""#));
    assert!(html.contains(r#"class="no-rooms-message hidden""#));
    assert!(!html.contains("upstream.example"));

    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.gender, Some(Gender::Female));
    assert_eq!(calls[0].0.offset, 0);
    assert_eq!(calls[0].0.limit, 36);
}

#[tokio::test]
async fn trailing_slash_is_the_same_page() {
    let (app, _cache) = app(FakeSource::answering(page_of(1, 1)));

    let (status, html) = get(&app, "/girls/", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1 id=\"page-title\">Female Cams</h1>"));
}

#[tokio::test]
async fn unknown_paths_redirect_home() {
    let source = FakeSource::answering(page_of(1, 1));
    let (app, _cache) = app(source.clone());

    let (status, location) = get(&app, "/no/such/page", &[]).await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location, "/");
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn api_returns_upstream_page() {
    let source = FakeSource::answering(page_of(100, 0));
    let (app, _cache) = app(source.clone());

    let (status, body) = get(&app, "/api/rooms?gender=f&offset=36&limit=36", &[]).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "count": 100, "results": [] }));

    let (query, _) = &source.calls()[0];
    assert_eq!(query.gender, Some(Gender::Female));
    assert_eq!(query.offset, 36);
}

#[tokio::test]
async fn api_keeps_unknown_room_fields() {
    let (app, _cache) = app(FakeSource::answering(page_of(1, 1)));

    let (_, body) = get(&app, "/api/rooms/", &[]).await;
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body["results"][0]["chat_room_url_revshare"],
        "https://upstream.example/a/"
    );
}

#[tokio::test]
async fn upstream_failure() {
    let (app, _cache) = app(FakeSource::failing());

    let (status, body) = get(&app, "/api/rooms?gender=f", &[]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "error": "Failed to fetch rooms" }));

    let (status, html) = get(&app, "/girls", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"class="no-rooms-message" id="no-rooms-message""#));
    assert!(html.contains(r#"class="load-more hidden""#));
}

#[tokio::test]
async fn repeated_queries_hit_the_cache() {
    let source = FakeSource::answering(page_of(3, 3));
    let (app, _cache) = app(source.clone());

    let uri = "/api/rooms?gender=c&tag=anal&tag=feet";
    let (_, first) = get(&app, uri, &[("x-forwarded-for", "8.8.8.8")]).await;
    let (_, second) = get(&app, uri, &[("x-forwarded-for", "1.1.1.1")]).await;

    assert_eq!(first, second);
    assert_eq!(source.calls().len(), 1);

    // tag order does not change the signature
    get(&app, "/api/rooms?gender=c&tag=feet&tag=anal", &[]).await;
    assert_eq!(source.calls().len(), 1);

    get(&app, "/api/rooms?gender=m", &[]).await;
    assert_eq!(source.calls().len(), 2);
}

#[tokio::test]
async fn client_ip_is_forwarded_only_when_public() {
    let source = FakeSource::answering(page_of(1, 1));
    let (app, _cache) = app(source.clone());

    get(&app, "/api/rooms?region=asia", &[("x-forwarded-for", "8.8.8.8, 10.0.0.1")]).await;
    get(&app, "/api/rooms?region=europe_russia", &[("x-real-ip", "192.168.1.20")]).await;

    let calls = source.calls();
    assert_eq!(calls[0].1, Some("8.8.8.8".parse().unwrap()));
    assert_eq!(calls[1].1, None);
}
