//! Application state shared by every handler.

use std::sync::Arc;

use crate::infra::{Database, UserStore};
use crate::services::{UserManager, UserService};

/// Services reachable from handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
}

impl AppState {
    /// Create state with a manually injected service (mocks in tests).
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self { user_service }
    }

    /// Wire the SeaORM-backed service stack on top of an open database.
    pub fn from_database(database: Database) -> Self {
        let repo = Arc::new(UserStore::new(database));
        Self {
            user_service: Arc::new(UserManager::new(repo)),
        }
    }
}
