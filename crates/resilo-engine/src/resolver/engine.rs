//! The fallback-chain resolution loop.

use crate::backend::Backend;
use crate::diagnostics::{ArtifactRef, DiagnosticsSink};
use crate::resolver::outcome::{
    Attempt, AttemptOutcome, ResolutionFailure, ResolvedElement, StrategySource,
};
use crate::resolver::request::ResolutionRequest;
use crate::scan;
use resilo_common::dom::ElementId;
use resilo_common::error::BackendError;
use resilo_common::strategy::{LocatorStrategy, QueryPlan};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

pub struct Resolver;

impl Resolver {
    /// Walk the request's strategy chain in order; first match wins.
    ///
    /// A strategy that times out or errors is recorded and the chain
    /// advances. After the declared chain is spent, the heuristic (if any)
    /// runs once. Full exhaustion triggers exactly one diagnostic capture
    /// keyed to the target name and returns the attempt log; a capture
    /// failure never masks the resolution failure.
    pub async fn resolve<B: Backend + ?Sized>(
        backend: &mut B,
        sink: &mut dyn DiagnosticsSink,
        request: &ResolutionRequest,
    ) -> Result<ResolvedElement, ResolutionFailure> {
        let mut attempts = Vec::with_capacity(request.strategy_list().len());

        for (index, strategy) in request.strategy_list().iter().enumerate() {
            debug!("trying {} for '{}'", strategy, request.target());

            match Self::try_strategy(backend, strategy, request).await {
                Ok(Some(id)) => {
                    let source = StrategySource::Declared {
                        index,
                        strategy: strategy.clone(),
                    };
                    info!("resolved '{}' via {} (element {})", request.target(), source, id);
                    return Ok(ResolvedElement {
                        id,
                        target: request.target().to_string(),
                        source,
                        epoch: 0,
                    });
                }
                Ok(None) => {
                    attempts.push(Attempt {
                        strategy: strategy.clone(),
                        outcome: AttemptOutcome::TimedOut {
                            waited: request.timeout_per_strategy(),
                        },
                    });
                }
                Err(e) => {
                    warn!("{} failed for '{}': {}", strategy, request.target(), e);
                    attempts.push(Attempt {
                        strategy: strategy.clone(),
                        outcome: AttemptOutcome::Backend(e.to_string()),
                    });
                }
            }
        }

        let mut heuristic_ran = false;
        if let Some(heuristic) = request.heuristic_scan() {
            match backend.snapshot().await {
                Ok(snapshot) => {
                    heuristic_ran = true;
                    if let Some(id) = heuristic(&snapshot) {
                        info!("resolved '{}' by heuristic scan (element {})", request.target(), id);
                        return Ok(ResolvedElement {
                            id,
                            target: request.target().to_string(),
                            source: StrategySource::Heuristic,
                            epoch: 0,
                        });
                    }
                }
                Err(e) => {
                    warn!("snapshot for heuristic scan of '{}' failed: {}", request.target(), e);
                }
            }
        }

        let artifact = Self::capture(backend, sink, request.target()).await;
        Err(ResolutionFailure {
            target: request.target().to_string(),
            attempts,
            heuristic_ran,
            artifact,
        })
    }

    /// Poll one strategy until match or deadline. Always polls at least
    /// once, so a zero timeout still gets one look at the DOM.
    async fn try_strategy<B: Backend + ?Sized>(
        backend: &mut B,
        strategy: &LocatorStrategy,
        request: &ResolutionRequest,
    ) -> Result<Option<ElementId>, BackendError> {
        let deadline = Instant::now() + request.timeout_per_strategy();

        loop {
            if let Some(id) = Self::poll_once(backend, strategy, request).await? {
                return Ok(Some(id));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            sleep(request.interval().min(deadline - now)).await;
        }
    }

    async fn poll_once<B: Backend + ?Sized>(
        backend: &mut B,
        strategy: &LocatorStrategy,
        request: &ResolutionRequest,
    ) -> Result<Option<ElementId>, BackendError> {
        match strategy.query_plan() {
            QueryPlan::Selector(query) => {
                let ids = backend.find_all(&query).await?;
                if !request.require_visible() {
                    return Ok(ids.first().copied());
                }
                for id in ids {
                    if backend.is_visible(id).await? {
                        return Ok(Some(id));
                    }
                }
                Ok(None)
            }
            QueryPlan::AttributeScan(probe) => {
                let snapshot = backend.snapshot().await?;
                Ok(scan::attribute_scan(
                    &snapshot,
                    probe,
                    request.require_visible(),
                ))
            }
            QueryPlan::FormScan(probe) => {
                let snapshot = backend.snapshot().await?;
                Ok(scan::form_scan(&snapshot, probe, request.require_visible()))
            }
        }
    }

    async fn capture<B: Backend + ?Sized>(
        backend: &mut B,
        sink: &mut dyn DiagnosticsSink,
        target: &str,
    ) -> Option<ArtifactRef> {
        let image = match backend.screenshot().await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!("screenshot unavailable for capture of '{}': {}", target, e);
                None
            }
        };

        match sink.capture(target, image.as_deref()).await {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!("diagnostic capture for '{}' failed: {}", target, e);
                None
            }
        }
    }
}
