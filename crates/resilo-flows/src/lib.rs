//! Storefront end-to-end flows over the resolver.
//!
//! Each flow is an async function over a session and an explicit context;
//! `run_group` runs one named group and reports per-scenario outcomes. A
//! failing scenario never aborts the rest of its group.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod context;
pub mod report;
pub mod targets;

pub use context::FlowContext;
pub use report::{FlowError, FlowOutcome, ensure};

use resilo_common::formatter::format_snapshot;
use resilo_engine::backend::Backend;
use resilo_engine::session::Session;
use std::time::Duration;

/// Budget for page-level waits (post-submit redirects, flash messages).
pub(crate) const PAGE_WAIT: Duration = Duration::from_secs(8);

/// The flow groups, in the order a full run executes them.
pub const GROUPS: &[&str] = &["account", "catalog", "cart", "checkout", "admin"];

/// Wrap up one scenario: log and capture on failure, keep going.
async fn finish<B: Backend>(
    name: &'static str,
    result: Result<(), FlowError>,
    session: &mut Session<B>,
) -> FlowOutcome {
    if let Err(e) = &result {
        tracing::error!(flow = name, error = %e, "flow failed");
        session.capture(&format!("{}-failure", name)).await;
        if let Ok(snapshot) = session.snapshot().await {
            tracing::debug!(flow = name, "page state at failure:\n{}", format_snapshot(&snapshot));
        }
    } else {
        tracing::info!(flow = name, "flow passed");
    }
    FlowOutcome { name, result }
}

macro_rules! record {
    ($outcomes:ident, $session:ident, $ctx:ident, $name:literal, $flow:path) => {
        let result = $flow($session, $ctx).await;
        $outcomes.push(finish($name, result, $session).await);
    };
}

/// Run every scenario in one group, in order.
pub async fn run_group<B: Backend>(
    group: &str,
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<Vec<FlowOutcome>, FlowError> {
    let mut outcomes = Vec::new();
    match group {
        "account" => {
            record!(outcomes, session, ctx, "account::register", account::register);
            record!(outcomes, session, ctx, "account::login", account::login);
            record!(outcomes, session, ctx, "account::update_profile", account::update_profile);
            record!(outcomes, session, ctx, "account::password_reset", account::password_reset);
        }
        "catalog" => {
            record!(outcomes, session, ctx, "catalog::search", catalog::search);
            record!(outcomes, session, ctx, "catalog::product_details", catalog::product_details);
        }
        "cart" => {
            record!(outcomes, session, ctx, "cart::add_to_cart", cart::add_to_cart);
            record!(outcomes, session, ctx, "cart::cart_operations", cart::cart_operations);
        }
        "checkout" => {
            record!(outcomes, session, ctx, "checkout::shipping", checkout::shipping);
            record!(outcomes, session, ctx, "checkout::confirm_order", checkout::confirm_order);
            record!(outcomes, session, ctx, "checkout::payment", checkout::payment);
            record!(outcomes, session, ctx, "checkout::order_history", checkout::order_history);
        }
        "admin" => {
            record!(outcomes, session, ctx, "admin::dashboard", admin::dashboard);
            record!(outcomes, session, ctx, "admin::product_management", admin::product_management);
        }
        other => return Err(FlowError::UnknownGroup(other.to_string())),
    }
    Ok(outcomes)
}
