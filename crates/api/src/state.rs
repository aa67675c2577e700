use std::sync::Arc;

use weave_content_core::events::EventBus;
use weave_content_core::store::ContentRepository;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    repository: Arc<dyn ContentRepository>,
    event_bus: EventBus,
}

impl AppState {
    pub fn new(repository: Arc<dyn ContentRepository>, event_bus: EventBus) -> Self {
        Self {
            inner: Arc::new(InnerState {
                repository,
                event_bus,
            }),
        }
    }

    pub fn repository(&self) -> &dyn ContentRepository {
        self.inner.repository.as_ref()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }
}
