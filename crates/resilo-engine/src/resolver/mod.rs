//! Resilient element resolution: an ordered strategy chain, a bounded
//! cooperative wait per strategy, one final heuristic scan, and a failure
//! value that names everything that was tried.

pub mod engine;
pub mod outcome;
pub mod request;

pub use engine::Resolver;
pub use outcome::{Attempt, AttemptOutcome, ResolutionFailure, ResolvedElement, StrategySource};
pub use request::{FailurePolicy, HeuristicScan, ResolutionRequest};
