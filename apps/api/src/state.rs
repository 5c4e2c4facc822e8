use std::sync::Arc;

use crate::providers::router::ProviderRouter;

/// Shared application state injected into all route handlers via Axum
/// extractors. The router is the only shared object; profiles and message
/// history travel in request bodies, so there is nothing to lock.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProviderRouter>,
}
