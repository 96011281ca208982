use resilo_common::dom::{ElementId, PageSnapshot};
use resilo_common::strategy::LocatorStrategy;
use std::time::Duration;

/// Final-resort scan run once after every declared strategy has missed.
pub type HeuristicScan = fn(&PageSnapshot) -> Option<ElementId>;

/// Whether an exhausted resolution sinks the scenario or is expected.
///
/// The flows mark exploratory lookups (an orders table that may be empty,
/// a checkout button that only renders with a non-empty cart) tolerable;
/// everything else is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Fatal,
    Tolerable,
}

/// One resolution job: a logical target plus the ordered strategies that
/// may find it. Strategy order is the priority order; nothing here is
/// mutated by the resolver.
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    target: String,
    strategies: Vec<LocatorStrategy>,
    strategy_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    require_visible: bool,
    heuristic: Option<HeuristicScan>,
    policy: FailurePolicy,
}

impl ResolutionRequest {
    pub const DEFAULT_STRATEGY_TIMEOUT: Duration = Duration::from_millis(2000);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            strategies: Vec::new(),
            strategy_timeout: None,
            poll_interval: None,
            require_visible: true,
            heuristic: None,
            policy: FailurePolicy::Fatal,
        }
    }

    /// Append one strategy to the fallback chain.
    pub fn strategy(mut self, strategy: LocatorStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategies(mut self, strategies: impl IntoIterator<Item = LocatorStrategy>) -> Self {
        self.strategies.extend(strategies);
        self
    }

    /// Budget for each individual strategy, not the whole chain.
    pub fn strategy_timeout(mut self, timeout: Duration) -> Self {
        self.strategy_timeout = Some(timeout);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Accept elements that are present but not visible.
    pub fn any_visibility(mut self) -> Self {
        self.require_visible = false;
        self
    }

    pub fn heuristic(mut self, scan: HeuristicScan) -> Self {
        self.heuristic = Some(scan);
        self
    }

    pub fn tolerable(mut self) -> Self {
        self.policy = FailurePolicy::Tolerable;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn strategy_list(&self) -> &[LocatorStrategy] {
        &self.strategies
    }

    pub fn timeout_per_strategy(&self) -> Duration {
        self.strategy_timeout
            .unwrap_or(Self::DEFAULT_STRATEGY_TIMEOUT)
    }

    pub fn interval(&self) -> Duration {
        self.poll_interval.unwrap_or(Self::DEFAULT_POLL_INTERVAL)
    }

    pub fn require_visible(&self) -> bool {
        self.require_visible
    }

    pub fn heuristic_scan(&self) -> Option<HeuristicScan> {
        self.heuristic
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Fill in session-level defaults without overriding explicit choices.
    pub(crate) fn tune(&mut self, strategy_timeout: Duration, poll_interval: Duration) {
        self.strategy_timeout.get_or_insert(strategy_timeout);
        self.poll_interval.get_or_insert(poll_interval);
    }
}
