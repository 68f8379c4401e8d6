use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::matching::repository::MatchRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Used directly by the reporting queries.
    pub db: PgPool,
    pub config: Config,
    /// Candidate and job lookups for the matching endpoints.
    pub repository: Arc<dyn MatchRepository>,
}
