use async_trait::async_trait;
use resilo_common::dom::{ElementId, PageSnapshot};
use resilo_common::strategy::SelectorQuery;

pub use resilo_common::error::BackendError;

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
}

/// The Backend trait is the capability set the resolver and session consume:
/// a live DOM behind find-all / visibility / snapshot queries plus the
/// handful of interactions the flows need. Element IDs are only meaningful
/// until the next navigation; backends drop their handle tables there.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect to or start the browser.
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and clean up resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a URL. Invalidates every element ID handed out so far.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Reload the current page. Invalidates element IDs like a navigation.
    async fn refresh(&mut self) -> Result<NavigationResult, BackendError> {
        Err(BackendError::NotSupported("refresh".into()))
    }

    async fn current_url(&mut self) -> Result<String, BackendError>;

    /// All elements currently matching a selector query, in document order.
    async fn find_all(&mut self, query: &SelectorQuery) -> Result<Vec<ElementId>, BackendError>;

    async fn is_visible(&mut self, id: ElementId) -> Result<bool, BackendError>;

    /// Structural snapshot of the current page for scan strategies.
    async fn snapshot(&mut self) -> Result<PageSnapshot, BackendError>;

    async fn click(&mut self, id: ElementId) -> Result<(), BackendError>;

    async fn type_text(
        &mut self,
        id: ElementId,
        text: &str,
        clear_first: bool,
    ) -> Result<(), BackendError>;

    /// Pick an option from a `<select>` by its visible label.
    async fn select_option(&mut self, _id: ElementId, _label: &str) -> Result<(), BackendError> {
        Err(BackendError::NotSupported("select_option".into()))
    }

    async fn text_of(&mut self, id: ElementId) -> Result<String, BackendError>;

    async fn page_source(&mut self) -> Result<String, BackendError>;

    /// Capture a screenshot of the current viewport (PNG bytes).
    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        Err(BackendError::NotSupported("screenshot".into()))
    }
}
