use std::sync::Arc;
use crate::auth::AuthGateway;
use crate::services::Store;

// Application state that can be shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<AuthGateway>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, auth: AuthGateway) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
        }
    }
}
