use std::path::Path;

use axum::http::{header, Method};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::shared::app_state::AppState;
use crate::system::handlers::health::api_not_found;
use crate::system::middleware::catch_panic::panic_response;
use crate::system::middleware::request_logger::request_logger;
use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState, static_dir: &Path) -> Router {
    // Известный путь с чужим методом отвечает тем же конвертом 404, что и неизвестный путь
    let api = Router::new()
        .route(
            "/data",
            get(handlers::catalogue::get_data).fallback(api_not_found),
        )
        .route(
            "/sites",
            post(handlers::a002_site::create).fallback(api_not_found),
        )
        .route(
            "/sites/:id",
            put(handlers::a002_site::update)
                .delete(handlers::a002_site::delete)
                .fallback(api_not_found),
        )
        .route(
            "/categories",
            post(handlers::a001_category::create).fallback(api_not_found),
        )
        .route(
            "/categories/:id",
            delete(handlers::a001_category::delete).fallback(api_not_found),
        )
        .route(
            "/health",
            get(system::handlers::health::health).fallback(api_not_found),
        )
        .fallback(api_not_found)
        .with_state(state);

    // SPA: неизвестные пути отдают index.html
    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    with_common_layers(Router::new().nest("/api", api).fallback_service(frontend))
}

fn with_common_layers(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}
