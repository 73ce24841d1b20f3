pub mod search;

use axum::{Extension, Router};

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", search::search_routes())
        .layer(Extension(state))
}
