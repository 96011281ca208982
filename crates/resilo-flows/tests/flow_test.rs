use async_trait::async_trait;
use resilo_common::dom::{ElementId, PageSnapshot};
use resilo_common::error::BackendError;
use resilo_common::strategy::SelectorQuery;
use resilo_engine::backend::{Backend, NavigationResult};
use resilo_engine::config::RunConfig;
use resilo_engine::diagnostics::NullSink;
use resilo_engine::session::{Session, SessionError};
use resilo_flows::{FlowContext, FlowError, account, catalog, run_group};
use std::collections::HashMap;
use std::time::Duration;

/// One scripted page: selector answers, page source, and which clicks
/// act like an in-page navigation.
#[derive(Default, Clone)]
struct Page {
    queries: HashMap<String, Vec<ElementId>>,
    source: String,
    nav_on_click: HashMap<ElementId, String>,
}

impl Page {
    fn answer(mut self, query: &str, ids: &[ElementId]) -> Self {
        self.queries.insert(query.to_string(), ids.to_vec());
        self
    }

    fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    fn click_leads_to(mut self, id: ElementId, url: &str) -> Self {
        self.nav_on_click.insert(id, url.to_string());
        self
    }
}

/// Mock backend scripted as a tiny storefront: a URL-keyed page table.
#[derive(Default)]
struct ScriptedBackend {
    pages: HashMap<String, Page>,
    current: String,
}

impl ScriptedBackend {
    fn page(mut self, url: &str, page: Page) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    fn here(&self) -> Page {
        self.pages.get(&self.current).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
    async fn is_ready(&self) -> bool {
        true
    }
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        self.current = url.to_string();
        Ok(NavigationResult {
            url: url.to_string(),
            title: String::new(),
        })
    }
    async fn current_url(&mut self) -> Result<String, BackendError> {
        Ok(self.current.clone())
    }
    async fn find_all(&mut self, query: &SelectorQuery) -> Result<Vec<ElementId>, BackendError> {
        Ok(self
            .here()
            .queries
            .get(&query.to_string())
            .cloned()
            .unwrap_or_default())
    }
    async fn is_visible(&mut self, _id: ElementId) -> Result<bool, BackendError> {
        Ok(true)
    }
    async fn snapshot(&mut self) -> Result<PageSnapshot, BackendError> {
        Err(BackendError::NotSupported("snapshot".into()))
    }
    async fn click(&mut self, id: ElementId) -> Result<(), BackendError> {
        if let Some(destination) = self.here().nav_on_click.get(&id) {
            self.current = destination.clone();
        }
        Ok(())
    }
    async fn type_text(
        &mut self,
        _id: ElementId,
        _text: &str,
        _clear_first: bool,
    ) -> Result<(), BackendError> {
        Ok(())
    }
    async fn text_of(&mut self, _id: ElementId) -> Result<String, BackendError> {
        Ok("Sample Laptop".to_string())
    }
    async fn page_source(&mut self) -> Result<String, BackendError> {
        Ok(self.here().source)
    }
}

fn storefront() -> ScriptedBackend {
    ScriptedBackend::default()
        .page(
            "http://localhost:3000/login",
            Page::default()
                .answer("id:email_field", &[1])
                .answer("id:password_field", &[2])
                .answer("css:button[type='submit']", &[3])
                .click_leads_to(3, "http://localhost:3000/"),
        )
        .page(
            "http://localhost:3000/",
            Page::default()
                .answer("css:.dropdown-toggle", &[4])
                .answer("id:search_field", &[10])
                .answer("id:search_btn", &[11])
                .click_leads_to(11, "http://localhost:3000/search")
                .with_source("<main>storefront</main>"),
        )
        .page(
            "http://localhost:3000/search",
            Page::default().with_source("<main>Results for laptop</main>"),
        )
}

fn session(backend: ScriptedBackend) -> Session<ScriptedBackend> {
    Session::new(backend, Box::new(NullSink)).tuned(Duration::ZERO, Duration::from_millis(1))
}

fn context() -> FlowContext {
    FlowContext::from_config(&RunConfig::default()).unwrap()
}

#[tokio::test]
async fn login_flow_walks_the_scripted_storefront() {
    let mut session = session(storefront());
    let ctx = context();

    account::login(&mut session, &ctx).await.unwrap();
}

#[tokio::test]
async fn search_flow_finds_results() {
    let mut session = session(storefront());
    let ctx = context();

    catalog::search(&mut session, &ctx).await.unwrap();
}

#[tokio::test]
async fn login_failure_names_the_missing_target() {
    // An empty storefront: every lookup exhausts its chain.
    let mut session = session(ScriptedBackend::default());
    let ctx = context();

    let error = account::login(&mut session, &ctx).await.unwrap_err();
    match error {
        FlowError::Session(SessionError::Resolution(failure)) => {
            assert_eq!(failure.target, "email field");
            let message = failure.to_string();
            assert!(message.contains("id=email_field"));
            assert!(message.contains("css=input[type=email]"));
        }
        other => panic!("expected a resolution failure, got {}", other),
    }
}

#[tokio::test]
async fn group_runner_reports_per_scenario_outcomes() {
    let mut session = session(storefront());
    let ctx = context();

    // The scripted storefront has no /register page, so the first
    // scenario fails while login still passes.
    let outcomes = run_group("account", &mut session, &ctx).await.unwrap();
    assert_eq!(outcomes.len(), 4);
    assert!(!outcomes[0].passed());
    assert!(outcomes[1].passed());
    assert_eq!(outcomes[1].name, "account::login");
}

#[tokio::test]
async fn unknown_group_is_rejected() {
    let mut session = session(ScriptedBackend::default());
    let ctx = context();

    assert!(matches!(
        run_group("payments", &mut session, &ctx).await,
        Err(FlowError::UnknownGroup(_))
    ));
}
