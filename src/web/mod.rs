//! Web front end: accounts, sessions and the on-demand export endpoint.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | Welcome page with links depending on the session |
//! | `GET/POST /signup` | Create an account |
//! | `GET/POST /login` | Start a session (cookie `news_session`) |
//! | `GET /logout` | End the session |
//! | `GET /scrape?date=YYYY-MM-DD` | Combined CSV for the date |
//! | `GET /static/*` | Files from the configured static directory |
//!
//! `/scrape` needs a signed-in user unless the server runs with
//! `require_auth` off.

pub mod accounts;
pub mod auth;
pub mod scrape;

use std::path::Path;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::UserStore;
use crate::error::AppError;
use crate::fetch::Fetch;
use crate::snapshot::SnapshotStore;
use auth::SessionStore;

pub struct AppState {
    pub snapshots: SnapshotStore,
    pub fetcher: Arc<dyn Fetch>,
    pub users: UserStore,
    pub sessions: SessionStore,
    pub require_auth: bool,
    pub password_cost: u32,
}

pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(accounts::index))
        .route("/signup", get(accounts::signup_form).post(accounts::signup_submit))
        .route("/login", get(accounts::login_form).post(accounts::login_submit))
        .route("/logout", get(accounts::logout))
        .route("/scrape", get(scrape::scrape))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(bind: &str, app: Router) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %bind, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}
