//! HTTP server: render models for the public site plus the admin API

mod error;
mod handlers;

pub use error::ApiError;

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::HeaderValue,
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::admin::Admin;
use crate::assemble::Assembler;
use crate::store::{ContentStore, UPLOADS_ROUTE};
use crate::Site;

/// Header carrying the admin password
pub const PASSWORD_HEADER: &str = "x-admin-password";

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub admin: Admin,
    pub assembler: Assembler,
    password: Option<Arc<str>>,
}

impl AppState {
    /// A blank password counts as none
    pub fn new(store: ContentStore, password: Option<String>) -> Self {
        Self {
            admin: Admin::new(store.clone()),
            assembler: Assembler::new(store),
            password: password
                .filter(|p| !p.trim().is_empty())
                .map(Arc::from),
        }
    }
}

/// Whether a request may use the admin API
pub fn authorized(expected: Option<&str>, provided: Option<&HeaderValue>) -> bool {
    match expected {
        None => true,
        Some(expected) => provided
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == expected),
    }
}

async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if authorized(
        state.password.as_deref(),
        request.headers().get(PASSWORD_HEADER),
    ) {
        next.run(request).await
    } else {
        tracing::debug!("Rejected admin request to {}", request.uri());
        ApiError::Unauthorized("Admin password required".to_string()).into_response()
    }
}

/// Build the application router
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let uploads_dir = state.admin.store().uploads_dir();

    let admin = Router::new()
        .route(
            "/api/content",
            get(handlers::get_content).post(handlers::save_content),
        )
        .route(
            "/api/blog",
            get(handlers::list_posts)
                .post(handlers::save_post)
                .delete(handlers::delete_post),
        )
        .route(
            "/api/upload",
            get(handlers::list_uploads)
                .post(handlers::upload)
                .delete(handlers::delete_upload),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let public = Router::new()
        .route("/api/pages/:page", get(handlers::page))
        .route("/api/services/:slug", get(handlers::service))
        .route("/api/posts", get(handlers::blog_index))
        .route("/api/posts/:slug", get(handlers::blog_post));

    public
        .merge(admin)
        .nest_service(UPLOADS_ROUTE, ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let password = site.config.admin.password.clone();
    if password.as_deref().map_or(true, |p| p.trim().is_empty()) {
        tracing::warn!("No admin password configured; the admin API is open");
    }

    let state = AppState::new(site.store(), password);
    let app = router(state, site.config.uploads.max_bytes);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Content root: {}", site.content_dir.display());
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
