//! One browser session: a backend, a diagnostics sink, and the page
//! generation counter that enforces stale-handle semantics.

use crate::backend::{Backend, NavigationResult};
use crate::diagnostics::{ArtifactRef, DiagnosticsSink};
use crate::resolver::{FailurePolicy, ResolutionFailure, ResolutionRequest, ResolvedElement, Resolver};
use regex::Regex;
use resilo_common::dom::{ElementId, PageSnapshot};
use resilo_common::error::{BackendError, StaleElement};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Stale(#[from] StaleElement),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),

    #[error("timed out after {}ms waiting for {what}", .waited.as_millis())]
    Timeout { what: String, waited: Duration },
}

/// A live browser session. Every navigation bumps the page generation;
/// handles resolved before it fail fast with [`StaleElement`] on any
/// later use instead of touching a dead or different node.
pub struct Session<B: Backend> {
    backend: B,
    sink: Box<dyn DiagnosticsSink>,
    epoch: u64,
    strategy_timeout: Duration,
    poll_interval: Duration,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, sink: Box<dyn DiagnosticsSink>) -> Self {
        Self {
            backend,
            sink,
            epoch: 0,
            strategy_timeout: ResolutionRequest::DEFAULT_STRATEGY_TIMEOUT,
            poll_interval: ResolutionRequest::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the default per-strategy timeout and poll interval used
    /// for requests that don't set their own.
    pub fn tuned(mut self, strategy_timeout: Duration, poll_interval: Duration) -> Self {
        self.strategy_timeout = strategy_timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub async fn launch(&mut self) -> Result<(), SessionError> {
        self.backend.launch().await?;
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), SessionError> {
        self.backend.close().await?;
        Ok(())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub async fn navigate(&mut self, url: &str) -> Result<NavigationResult, SessionError> {
        let result = self.backend.navigate(url).await?;
        self.epoch += 1;
        info!(url = %result.url, epoch = self.epoch, "navigated");
        Ok(result)
    }

    /// Reload the current page. A reload re-renders every node, so it
    /// invalidates handles exactly like a navigation.
    pub async fn refresh(&mut self) -> Result<NavigationResult, SessionError> {
        let result = self.backend.refresh().await?;
        self.epoch += 1;
        Ok(result)
    }

    pub async fn current_url(&mut self) -> Result<String, SessionError> {
        Ok(self.backend.current_url().await?)
    }

    /// Resolve a target, treating exhaustion as an error regardless of the
    /// request's failure policy.
    pub async fn resolve(
        &mut self,
        mut request: ResolutionRequest,
    ) -> Result<ResolvedElement, SessionError> {
        request.tune(self.strategy_timeout, self.poll_interval);
        let element = Resolver::resolve(&mut self.backend, self.sink.as_mut(), &request).await?;
        Ok(element.at_epoch(self.epoch))
    }

    /// Resolve a target, honoring the request's failure policy: a
    /// tolerable request that exhausts its chain yields `Ok(None)`.
    pub async fn try_resolve(
        &mut self,
        request: ResolutionRequest,
    ) -> Result<Option<ResolvedElement>, SessionError> {
        let policy = request.policy();
        match self.resolve(request).await {
            Ok(element) => Ok(Some(element)),
            Err(SessionError::Resolution(failure)) if policy == FailurePolicy::Tolerable => {
                debug!("tolerable lookup '{}' found nothing", failure.target);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn click(&mut self, element: &ResolvedElement) -> Result<(), SessionError> {
        let id = self.guard(element)?;
        self.backend.click(id).await?;
        Ok(())
    }

    /// Clear the control, then type into it.
    pub async fn fill(
        &mut self,
        element: &ResolvedElement,
        text: &str,
    ) -> Result<(), SessionError> {
        let id = self.guard(element)?;
        self.backend.type_text(id, text, true).await?;
        Ok(())
    }

    /// Type without clearing first.
    pub async fn type_text(
        &mut self,
        element: &ResolvedElement,
        text: &str,
    ) -> Result<(), SessionError> {
        let id = self.guard(element)?;
        self.backend.type_text(id, text, false).await?;
        Ok(())
    }

    pub async fn select_option(
        &mut self,
        element: &ResolvedElement,
        label: &str,
    ) -> Result<(), SessionError> {
        let id = self.guard(element)?;
        self.backend.select_option(id, label).await?;
        Ok(())
    }

    pub async fn text_of(&mut self, element: &ResolvedElement) -> Result<String, SessionError> {
        let id = self.guard(element)?;
        Ok(self.backend.text_of(id).await?)
    }

    pub async fn is_visible(&mut self, element: &ResolvedElement) -> Result<bool, SessionError> {
        let id = self.guard(element)?;
        Ok(self.backend.is_visible(id).await?)
    }

    pub async fn page_source(&mut self) -> Result<String, SessionError> {
        Ok(self.backend.page_source().await?)
    }

    /// Case-insensitive substring check against the page source.
    pub async fn source_contains(&mut self, needle: &str) -> Result<bool, SessionError> {
        let source = self.backend.page_source().await?;
        Ok(resilo_common::text::contains_ci(&source, needle))
    }

    pub async fn snapshot(&mut self) -> Result<PageSnapshot, SessionError> {
        Ok(self.backend.snapshot().await?)
    }

    /// Bounded wait until the current URL matches the pattern. Returns the
    /// matching URL.
    pub async fn wait_until_url_matches(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<String, SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            let url = self.backend.current_url().await?;
            if pattern.is_match(&url) {
                return Ok(url);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(SessionError::Timeout {
                    what: format!("url matching /{}/", pattern),
                    waited: timeout,
                });
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    /// Bounded wait until the page source contains the needle
    /// (case-insensitive).
    pub async fn wait_for_source(
        &mut self,
        needle: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.source_contains(needle).await? {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(SessionError::Timeout {
                    what: format!("page source containing {:?}", needle),
                    waited: timeout,
                });
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    /// Record a diagnostic capture outside the resolver's failure path,
    /// e.g. when a flow-level assertion fails. Sink errors are swallowed
    /// the same way the resolver swallows them.
    pub async fn capture(&mut self, label: &str) -> Option<ArtifactRef> {
        let image = self.backend.screenshot().await.ok();
        match self.sink.capture(label, image.as_deref()).await {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                tracing::warn!(label, error = %e, "diagnostic capture failed");
                None
            }
        }
    }

    fn guard(&self, element: &ResolvedElement) -> Result<ElementId, StaleElement> {
        if element.epoch() != self.epoch {
            return Err(StaleElement {
                target: element.target.clone(),
                resolved_epoch: element.epoch(),
                current_epoch: self.epoch,
            });
        }
        Ok(element.id)
    }
}
