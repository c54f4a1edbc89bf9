use std::sync::Arc;

use common::MediaStore;
use sea_orm::DatabaseConnection;

use crate::cache::PageCache;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub media: Arc<dyn MediaStore>,
    pub cache: PageCache,
}

impl AppState {
    /// Called after every successful write that changes what pages show.
    pub fn after_write(&self) {
        if self.config.cache.clear_on_write {
            self.cache.clear();
        }
    }
}
