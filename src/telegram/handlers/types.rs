//! Handler types and dependencies

use std::sync::Arc;

use crate::backend::TaskBackend;
use crate::links::LinkPolicy;
use crate::tasks::TaskDispatcher;
use crate::telegram::ChatApi;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub dispatcher: Arc<TaskDispatcher>,
    pub backend: Arc<dyn TaskBackend>,
    pub chat: Arc<dyn ChatApi>,
    pub links: LinkPolicy,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(
        dispatcher: Arc<TaskDispatcher>,
        backend: Arc<dyn TaskBackend>,
        chat: Arc<dyn ChatApi>,
        links: LinkPolicy,
    ) -> Self {
        Self {
            dispatcher,
            backend,
            chat,
            links,
        }
    }
}
