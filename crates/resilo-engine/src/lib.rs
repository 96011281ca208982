pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod resolver;
pub mod scan;
pub mod session;

pub use backend::{Backend, NavigationResult};
pub use diagnostics::{ArtifactRef, DiagnosticsSink, DirectorySink, NullSink};
pub use resolver::{
    Attempt, AttemptOutcome, FailurePolicy, ResolutionFailure, ResolutionRequest, ResolvedElement,
    Resolver, StrategySource,
};
pub use session::{Session, SessionError};
