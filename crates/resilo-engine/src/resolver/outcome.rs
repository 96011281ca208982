use crate::diagnostics::ArtifactRef;
use resilo_common::dom::ElementId;
use resilo_common::strategy::LocatorStrategy;
use std::fmt;
use std::time::Duration;

/// A successfully resolved element: the live handle plus which strategy
/// produced it. Valid only until the next navigation; the session stamps
/// the page generation so later use of a dead handle fails fast.
#[derive(Debug, Clone)]
pub struct ResolvedElement {
    pub id: ElementId,
    pub target: String,
    pub source: StrategySource,
    pub(crate) epoch: u64,
}

impl ResolvedElement {
    pub(crate) fn at_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Which part of the request produced a match.
#[derive(Debug, Clone)]
pub enum StrategySource {
    /// A declared strategy, by position in the configured chain.
    Declared {
        index: usize,
        strategy: LocatorStrategy,
    },
    /// The final-resort heuristic scan.
    Heuristic,
}

impl StrategySource {
    pub fn is_heuristic(&self) -> bool {
        matches!(self, Self::Heuristic)
    }

    /// Index in the declared chain, when not heuristic-sourced.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Declared { index, .. } => Some(*index),
            Self::Heuristic => None,
        }
    }
}

impl fmt::Display for StrategySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared { index, strategy } => {
                write!(f, "strategy #{} ({})", index + 1, strategy)
            }
            Self::Heuristic => f.write_str("heuristic scan"),
        }
    }
}

/// One tried-and-missed strategy in the attempt log.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub strategy: LocatorStrategy,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// No match within the strategy's budget. Expected, not exceptional.
    TimedOut { waited: Duration },
    /// The backend failed while this strategy was polling; the chain
    /// advances exactly as it does on a timeout.
    Backend(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut { waited } => write!(f, "timed out after {}ms", waited.as_millis()),
            Self::Backend(reason) => write!(f, "backend error: {}", reason),
        }
    }
}

/// Every strategy and the heuristic failed. Carries the full attempt log
/// in configured order so a failure is diagnosable without rerunning.
#[derive(Debug, Clone)]
pub struct ResolutionFailure {
    pub target: String,
    pub attempts: Vec<Attempt>,
    pub heuristic_ran: bool,
    pub artifact: Option<ArtifactRef>,
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not resolve '{}': ", self.target)?;
        if self.attempts.is_empty() {
            f.write_str("no strategies configured")?;
        } else {
            f.write_str("tried ")?;
            for (i, attempt) in self.attempts.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} ({})", attempt.strategy, attempt.outcome)?;
            }
        }
        if self.heuristic_ran {
            f.write_str("; heuristic scan found nothing")?;
        }
        if let Some(artifact) = &self.artifact
            && let Some(path) = &artifact.path
        {
            write!(f, " [capture: {}]", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for ResolutionFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_enumerates_attempts_in_order() {
        let failure = ResolutionFailure {
            target: "search box".to_string(),
            attempts: vec![
                Attempt {
                    strategy: LocatorStrategy::Id("search_field".into()),
                    outcome: AttemptOutcome::TimedOut {
                        waited: Duration::from_millis(2000),
                    },
                },
                Attempt {
                    strategy: LocatorStrategy::Css("input[type=search]".into()),
                    outcome: AttemptOutcome::Backend("connection reset".into()),
                },
            ],
            heuristic_ran: true,
            artifact: None,
        };

        let message = failure.to_string();
        assert!(message.contains("'search box'"));
        assert!(message.contains("id=search_field (timed out after 2000ms)"));
        assert!(message.contains("css=input[type=search] (backend error: connection reset)"));
        assert!(message.ends_with("heuristic scan found nothing"));
    }

    #[test]
    fn empty_attempt_log_renders_plainly() {
        let failure = ResolutionFailure {
            target: "orders table".to_string(),
            attempts: vec![],
            heuristic_ran: false,
            artifact: None,
        };
        assert_eq!(
            failure.to_string(),
            "could not resolve 'orders table': no strategies configured"
        );
    }
}
