use crate::inject;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use resilo_common::dom::{ElementId, PageSnapshot};
use resilo_common::strategy::SelectorQuery;
use resilo_engine::backend::{Backend, BackendError, NavigationResult};
use std::collections::HashMap;
use tracing::{debug, info};

/// Backend over a remote WebDriver endpoint (chromedriver, geckodriver,
/// selenium). Element IDs map to WebDriver element handles host-side; the
/// table is dropped on every navigation, so an ID from a previous page can
/// only ever fail, never alias a new node.
pub struct WebDriverBackend {
    webdriver_url: String,
    client: Option<Client>,
    handles: HashMap<ElementId, Element>,
    /// WebDriver element reference -> our ID, so repeated polling of the
    /// same query doesn't mint fresh IDs for the same node.
    by_ref: HashMap<String, ElementId>,
    next_id: ElementId,
}

impl WebDriverBackend {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            client: None,
            handles: HashMap::new(),
            by_ref: HashMap::new(),
            next_id: 1,
        }
    }

    fn client(&self) -> Result<&Client, BackendError> {
        self.client
            .as_ref()
            .ok_or_else(|| BackendError::Connect("backend not launched".into()))
    }

    fn handle(&self, id: ElementId) -> Result<&Element, BackendError> {
        self.handles.get(&id).ok_or(BackendError::UnknownElement(id))
    }

    fn register(&mut self, element: Element) -> ElementId {
        let element_ref = element.element_id().to_string();
        if let Some(id) = self.by_ref.get(&element_ref) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.by_ref.insert(element_ref, id);
        self.handles.insert(id, element);
        id
    }

    fn forget_page(&mut self) {
        self.handles.clear();
        self.by_ref.clear();
    }

    fn to_locator(query: &SelectorQuery) -> Locator<'_> {
        match query {
            SelectorQuery::Id(id) => Locator::Id(id),
            SelectorQuery::Css(css) => Locator::Css(css),
            SelectorQuery::XPath(xpath) => Locator::XPath(xpath),
        }
    }

    fn protocol(e: fantoccini::error::CmdError) -> BackendError {
        BackendError::Protocol(e.to_string())
    }

    /// Re-attach a snapshot ID to a live handle via its marker attribute.
    async fn attach_snapshot_element(&mut self, id: ElementId) -> Result<Element, BackendError> {
        let selector = format!("[data-resilo-id=\"{}\"]", id);
        let client = self.client()?;
        let found = client
            .find_all(Locator::Css(&selector))
            .await
            .map_err(Self::protocol)?;
        let element = found
            .into_iter()
            .next()
            .ok_or(BackendError::UnknownElement(id))?;
        self.handles.insert(id, element.clone());
        Ok(element)
    }

    /// Look up a handle, falling back to the snapshot marker for IDs the
    /// snapshot assigned but no query has touched yet.
    async fn live_element(&mut self, id: ElementId) -> Result<Element, BackendError> {
        if let Some(element) = self.handles.get(&id) {
            return Ok(element.clone());
        }
        self.attach_snapshot_element(id).await
    }
}

#[async_trait]
impl Backend for WebDriverBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!(url = %self.webdriver_url, "connecting to webdriver");
        let client = ClientBuilder::native()
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| {
                BackendError::Connect(format!(
                    "failed to connect to WebDriver at {}: {}",
                    self.webdriver_url, e
                ))
            })?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.forget_page();
        if let Some(client) = self.client.take() {
            client.close().await.map_err(Self::protocol)?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        self.forget_page();
        let client = self.client()?;
        client
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;
        let title = client.title().await.unwrap_or_default();
        let url = client
            .current_url()
            .await
            .map(|u| u.to_string())
            .unwrap_or_else(|_| url.to_string());
        Ok(NavigationResult { url, title })
    }

    async fn refresh(&mut self) -> Result<NavigationResult, BackendError> {
        self.forget_page();
        let client = self.client()?;
        client.refresh().await.map_err(Self::protocol)?;
        let title = client.title().await.unwrap_or_default();
        let url = client
            .current_url()
            .await
            .map(|u| u.to_string())
            .map_err(Self::protocol)?;
        Ok(NavigationResult { url, title })
    }

    async fn current_url(&mut self) -> Result<String, BackendError> {
        let client = self.client()?;
        Ok(client
            .current_url()
            .await
            .map_err(Self::protocol)?
            .to_string())
    }

    async fn find_all(&mut self, query: &SelectorQuery) -> Result<Vec<ElementId>, BackendError> {
        let client = self.client()?;
        let found = client
            .find_all(Self::to_locator(query))
            .await
            .map_err(Self::protocol)?;
        debug!(%query, count = found.len(), "query answered");
        Ok(found.into_iter().map(|el| self.register(el)).collect())
    }

    async fn is_visible(&mut self, id: ElementId) -> Result<bool, BackendError> {
        let element = self.live_element(id).await?;
        element.is_displayed().await.map_err(Self::protocol)
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, BackendError> {
        let start = self.next_id;
        let client = self.client()?;
        let value = client
            .execute(inject::SNAPSHOT_JS, vec![serde_json::json!(start)])
            .await
            .map_err(Self::protocol)?;
        let snapshot: PageSnapshot = serde_json::from_value(value)
            .map_err(|e| BackendError::Protocol(format!("malformed snapshot: {}", e)))?;
        self.next_id += snapshot.elements.len() as ElementId;
        Ok(snapshot)
    }

    async fn click(&mut self, id: ElementId) -> Result<(), BackendError> {
        // fantoccini's click consumes the handle because it may navigate;
        // our clone in the table stays valid until forget_page.
        let element = self.live_element(id).await?;
        element.click().await.map_err(Self::protocol)?;
        Ok(())
    }

    async fn type_text(
        &mut self,
        id: ElementId,
        text: &str,
        clear_first: bool,
    ) -> Result<(), BackendError> {
        let element = self.live_element(id).await?;
        if clear_first {
            element.clear().await.map_err(Self::protocol)?;
        }
        element.send_keys(text).await.map_err(Self::protocol)
    }

    async fn select_option(&mut self, id: ElementId, label: &str) -> Result<(), BackendError> {
        // Selection goes through script so the page sees a change event
        // regardless of how the driver implements option picking.
        self.live_element(id).await?;
        let selector = format!("[data-resilo-id=\"{}\"]", id);
        let client = self.client()?;
        let picked = client
            .execute(
                inject::SELECT_BY_LABEL_JS,
                vec![serde_json::json!(selector), serde_json::json!(label)],
            )
            .await
            .map_err(Self::protocol)?;
        if picked.as_bool() != Some(true) {
            return Err(BackendError::Protocol(format!(
                "select has no option labeled {:?}",
                label
            )));
        }
        Ok(())
    }

    async fn text_of(&mut self, id: ElementId) -> Result<String, BackendError> {
        let element = self.live_element(id).await?;
        element.text().await.map_err(Self::protocol)
    }

    async fn page_source(&mut self) -> Result<String, BackendError> {
        let client = self.client()?;
        client.source().await.map_err(Self::protocol)
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        let client = self.client()?;
        client.screenshot().await.map_err(Self::protocol)
    }
}
