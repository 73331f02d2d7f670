//! Shared state for the API layer.

use std::sync::Arc;

use crate::pipeline::ondemand::MediaService;

/// Shared context for all API routes: the remote media service behind its
/// trait object, so tests can swap in a scripted mock.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<dyn MediaService>,
}

impl ApiContext {
    pub fn new(service: Arc<dyn MediaService>) -> Self {
        Self { service }
    }
}
