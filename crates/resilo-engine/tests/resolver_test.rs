use async_trait::async_trait;
use resilo_common::dom::{Element, ElementId, ElementState, PageInfo, PageSnapshot, Rect};
use resilo_common::error::{BackendError, CaptureError};
use resilo_common::strategy::{LocatorStrategy, SelectorQuery};
use resilo_engine::backend::{Backend, NavigationResult};
use resilo_engine::diagnostics::{ArtifactRef, DiagnosticsSink};
use resilo_engine::resolver::{AttemptOutcome, ResolutionRequest, Resolver};
use resilo_engine::scan;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Mock backend for testing: selector queries answered from a table keyed
/// by the query's display form.
#[derive(Default)]
struct MockBackend {
    queries: HashMap<String, Vec<ElementId>>,
    failing_queries: HashSet<String>,
    visible: HashSet<ElementId>,
    snapshot: Option<PageSnapshot>,
    url: String,
    find_log: Vec<String>,
}

impl MockBackend {
    fn answer(mut self, query: &str, ids: &[ElementId]) -> Self {
        self.queries.insert(query.to_string(), ids.to_vec());
        for id in ids {
            self.visible.insert(*id);
        }
        self
    }

    fn failing(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }

    fn hidden(mut self, id: ElementId) -> Self {
        self.visible.remove(&id);
        self
    }

    fn with_snapshot(mut self, snapshot: PageSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

#[async_trait]
impl Backend for MockBackend {
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
        self.url = url.to_string();
        Ok(NavigationResult {
            url: url.to_string(),
            title: String::new(),
        })
    }
    async fn current_url(&mut self) -> Result<String, BackendError> {
        Ok(self.url.clone())
    }
    async fn find_all(&mut self, query: &SelectorQuery) -> Result<Vec<ElementId>, BackendError> {
        let key = query.to_string();
        self.find_log.push(key.clone());
        if self.failing_queries.contains(&key) {
            return Err(BackendError::Protocol("connection reset".into()));
        }
        Ok(self.queries.get(&key).cloned().unwrap_or_default())
    }
    async fn is_visible(&mut self, id: ElementId) -> Result<bool, BackendError> {
        Ok(self.visible.contains(&id))
    }
    async fn snapshot(&mut self) -> Result<PageSnapshot, BackendError> {
        self.snapshot
            .clone()
            .ok_or_else(|| BackendError::Protocol("no snapshot".into()))
    }
    async fn click(&mut self, _id: ElementId) -> Result<(), BackendError> {
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
        Ok(String::new())
    }
    async fn page_source(&mut self) -> Result<String, BackendError> {
        Ok(String::new())
    }
}

#[derive(Default)]
struct RecordingSink {
    labels: Vec<String>,
    fail: bool,
}

#[async_trait]
impl DiagnosticsSink for RecordingSink {
    async fn capture(
        &mut self,
        label: &str,
        _image: Option<&[u8]>,
    ) -> Result<ArtifactRef, CaptureError> {
        self.labels.push(label.to_string());
        if self.fail {
            return Err(CaptureError::Rejected("disk full".into()));
        }
        Ok(ArtifactRef {
            label: label.to_string(),
            path: None,
        })
    }
}

fn quick(request: ResolutionRequest) -> ResolutionRequest {
    request
        .strategy_timeout(Duration::ZERO)
        .poll_interval(Duration::from_millis(1))
}

fn search_input_snapshot(id: ElementId) -> PageSnapshot {
    PageSnapshot {
        page: PageInfo {
            url: "http://localhost:3000".to_string(),
            title: "Home".to_string(),
        },
        elements: vec![Element {
            id,
            element_type: "input".to_string(),
            text: None,
            label: None,
            value: None,
            placeholder: Some("Search products".to_string()),
            selector: format!("[data-resilo-id=\"{}\"]", id),
            rect: Rect {
                x: 0.0,
                y: 0.0,
                width: 200.0,
                height: 30.0,
            },
            attributes: [("type".to_string(), "search".to_string())].into(),
            state: ElementState {
                visible: true,
                ..Default::default()
            },
            children: vec![],
        }],
    }
}

#[tokio::test]
async fn first_satisfiable_strategy_wins_and_is_reported() {
    let mut backend = MockBackend::default().answer("css:input[type=search]", &[7]);
    let mut sink = RecordingSink::default();

    let request = quick(
        ResolutionRequest::new("search box")
            .strategy(LocatorStrategy::Id("search_field".into()))
            .strategy(LocatorStrategy::Css("input[type=search]".into())),
    );

    let element = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap();

    assert_eq!(element.id, 7);
    assert_eq!(element.source.index(), Some(1));
    assert!(!element.source.is_heuristic());
    assert!(sink.labels.is_empty());
}

#[tokio::test]
async fn caller_order_beats_specificity() {
    // Both strategies match; the broader one is configured first and wins.
    let mut backend = MockBackend::default()
        .answer("css:input", &[3])
        .answer("id:search_field", &[9]);
    let mut sink = RecordingSink::default();

    let request = quick(
        ResolutionRequest::new("search box")
            .strategy(LocatorStrategy::Css("input".into()))
            .strategy(LocatorStrategy::Id("search_field".into())),
    );

    let element = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap();

    assert_eq!(element.id, 3);
    assert_eq!(element.source.index(), Some(0));
}

#[tokio::test]
async fn exhaustion_enumerates_strategies_in_order_and_captures_once() {
    let mut backend = MockBackend::default();
    let mut sink = RecordingSink::default();

    let request = quick(
        ResolutionRequest::new("orders table")
            .strategy(LocatorStrategy::Css(".orders-table".into()))
            .strategy(LocatorStrategy::Id("orders".into()))
            .strategy(LocatorStrategy::TagName("table".into())),
    );

    let failure = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap_err();

    let kinds: Vec<_> = failure.attempts.iter().map(|a| a.strategy.kind()).collect();
    assert_eq!(kinds, vec!["css", "id", "tag"]);
    assert!(failure
        .attempts
        .iter()
        .all(|a| matches!(a.outcome, AttemptOutcome::TimedOut { .. })));
    assert!(!failure.heuristic_ran);
    assert_eq!(sink.labels, vec!["orders table".to_string()]);
}

#[tokio::test]
async fn resolution_is_idempotent_on_an_unchanged_dom() {
    let mut backend = MockBackend::default().answer("id:cart_btn", &[4]);
    let mut sink = RecordingSink::default();

    let request = quick(
        ResolutionRequest::new("add to cart")
            .strategy(LocatorStrategy::Name("missing".into()))
            .strategy(LocatorStrategy::Id("cart_btn".into())),
    );

    let first = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap();
    let second = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.source.index(), second.source.index());
}

#[tokio::test]
async fn heuristic_match_is_tagged_as_heuristic_sourced() {
    let mut backend = MockBackend::default().with_snapshot(search_input_snapshot(42));
    let mut sink = RecordingSink::default();

    let request = quick(
        ResolutionRequest::new("search box")
            .strategy(LocatorStrategy::Id("search_field".into()))
            .heuristic(scan::first_search_input),
    );

    let element = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap();

    assert_eq!(element.id, 42);
    assert!(element.source.is_heuristic());
    assert_eq!(element.source.index(), None);
}

#[tokio::test]
async fn empty_request_fails_immediately_with_empty_attempt_list() {
    let mut backend = MockBackend::default();
    let mut sink = RecordingSink::default();

    let request = ResolutionRequest::new("category widget");
    let failure = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap_err();

    assert!(failure.attempts.is_empty());
    assert!(!failure.heuristic_ran);
    assert!(backend.find_log.is_empty());
    assert_eq!(sink.labels.len(), 1);
}

#[tokio::test]
async fn backend_error_is_recorded_and_the_chain_advances() {
    let mut backend = MockBackend::default()
        .failing("id:search_field")
        .answer("css:input[type=search]", &[5]);
    let mut sink = RecordingSink::default();

    let request = quick(
        ResolutionRequest::new("search box")
            .strategy(LocatorStrategy::Id("search_field".into()))
            .strategy(LocatorStrategy::Css("input[type=search]".into())),
    );

    let element = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap();
    assert_eq!(element.source.index(), Some(1));

    // Exhaust a chain whose first strategy errors: the error shows up in
    // the attempt log instead of aborting the chain.
    let mut backend = MockBackend::default().failing("id:search_field");
    let request = quick(
        ResolutionRequest::new("search box")
            .strategy(LocatorStrategy::Id("search_field".into()))
            .strategy(LocatorStrategy::Name("keyword".into())),
    );
    let failure = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap_err();

    assert!(matches!(
        failure.attempts[0].outcome,
        AttemptOutcome::Backend(_)
    ));
    assert!(matches!(
        failure.attempts[1].outcome,
        AttemptOutcome::TimedOut { .. }
    ));
}

#[tokio::test]
async fn capture_failure_never_masks_the_resolution_failure() {
    let mut backend = MockBackend::default();
    let mut sink = RecordingSink {
        fail: true,
        ..Default::default()
    };

    let request = quick(
        ResolutionRequest::new("search box").strategy(LocatorStrategy::Id("search_field".into())),
    );

    let failure = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap_err();

    assert_eq!(failure.target, "search box");
    assert!(failure.artifact.is_none());
    assert_eq!(sink.labels.len(), 1);
}

#[tokio::test]
async fn hidden_matches_are_skipped_when_visibility_is_required() {
    let mut backend = MockBackend::default()
        .answer("css:.checkout-btn", &[1, 2])
        .hidden(1);
    let mut sink = RecordingSink::default();

    let request = quick(
        ResolutionRequest::new("checkout button")
            .strategy(LocatorStrategy::Css(".checkout-btn".into())),
    );
    let element = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap();
    assert_eq!(element.id, 2);

    let request = quick(
        ResolutionRequest::new("checkout button")
            .strategy(LocatorStrategy::Css(".checkout-btn".into()))
            .any_visibility(),
    );
    let element = Resolver::resolve(&mut backend, &mut sink, &request)
        .await
        .unwrap();
    assert_eq!(element.id, 1);
}
