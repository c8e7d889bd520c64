//! Application state shared across handlers

use std::sync::Arc;

use crate::service::OvertimeService;
use crate::store::RecordStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: OvertimeService,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            service: OvertimeService::new(store),
        }
    }
}
