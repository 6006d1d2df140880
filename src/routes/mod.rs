use crate::AppState;
use axum::{routing::get, Router};
use axum_prometheus::PrometheusMetricLayer;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod page;
pub mod rooms;

pub const API_ROOMS: &str = "/api/rooms";

pub fn router(state: AppState) -> Router {
    let metrics = state.config.metrics;
    let assets = ServeDir::new(&state.config.assets_dir);

    let app: Router = Router::new()
        .route(API_ROOMS, get(rooms::rooms))
        .route("/api/rooms/", get(rooms::rooms))
        .nest_service("/assets", assets)
        .fallback(page::page)
        .with_state(state);

    let app = if metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        app.route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer)
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
}
