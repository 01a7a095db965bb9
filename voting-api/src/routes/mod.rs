mod auth;
mod channel;
mod community;
mod proposals;
mod published;
mod votes;

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use voting_app::domain::PageRequest;
use voting_app::AppContext;

const SESSION_INACTIVITY_DAYS: i64 = 30;

/// `?page=&pageSize=`, kept as raw strings so junk falls back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.page_size.as_deref())
    }
}

pub fn router(ctx: AppContext) -> Router {
    with_layers(api_routes(), ctx)
}

fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/proposals", get(proposals::list).post(proposals::create))
        .route("/proposals/all", get(proposals::list_all))
        .route(
            "/proposals/{id}",
            put(proposals::update).delete(proposals::delete),
        )
        .route("/proposals/{id}/approve", post(proposals::approve))
        .route("/proposals/{id}/vote", post(votes::cast).delete(votes::remove))
        .route(
            "/community-proposals",
            get(community::list).post(community::submit),
        )
        .route("/community-proposals/admin", get(community::list_for_admin))
        .route("/published", get(published::list))
        .route("/channel", get(channel::show))
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

fn with_layers(routes: Router<AppContext>, ctx: AppContext) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(ctx.config.secure_cookies)
        // Lax so the cookie survives the redirect back from Google.
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            SESSION_INACTIVITY_DAYS,
        )));

    let static_files = ServeDir::new(&ctx.config.static_dir);

    routes
        .fallback_service(static_files)
        .layer(sessions)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
