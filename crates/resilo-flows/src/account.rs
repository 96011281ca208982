//! Account flows: registration, login, profile update, password reset.

use crate::context::FlowContext;
use crate::report::{FlowError, ensure};
use crate::{PAGE_WAIT, targets};
use resilo_engine::backend::Backend;
use resilo_engine::config::Credentials;
use resilo_engine::session::Session;
use tracing::info;

/// Log in and wait for the account menu to confirm the session exists.
/// Shared by every flow that needs an authenticated session.
pub(crate) async fn sign_in<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
    credentials: &Credentials,
) -> Result<(), FlowError> {
    session.navigate(&ctx.page("/login")).await?;

    let email = session.resolve(targets::email_field()).await?;
    session.fill(&email, &credentials.email).await?;
    let password = session.resolve(targets::password_field()).await?;
    session.fill(&password, &credentials.password).await?;

    let submit = session.resolve(targets::submit_button()).await?;
    session.click(&submit).await?;

    let menu = session.resolve(targets::account_menu()).await?;
    ensure(
        session.is_visible(&menu).await?,
        "account menu should be visible after login",
    )
}

pub async fn register<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    let suffix = FlowContext::unique_suffix();
    let name = format!("Test User {}", suffix);
    let email = format!("testuser{}@example.com", suffix);
    info!(%email, "registering account");

    session.navigate(&ctx.page("/register")).await?;

    let name_field = session.resolve(targets::name_field()).await?;
    session.fill(&name_field, &name).await?;
    let email_field = session.resolve(targets::email_field()).await?;
    session.fill(&email_field, &email).await?;
    let password_field = session.resolve(targets::password_field()).await?;
    session
        .fill(&password_field, &ctx.registration_password)
        .await?;

    let submit = session.resolve(targets::submit_button()).await?;
    session.click(&submit).await?;

    session.wait_for_source("registered", PAGE_WAIT).await?;
    Ok(())
}

pub async fn login<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    sign_in(session, ctx, &ctx.customer).await
}

pub async fn update_profile<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    sign_in(session, ctx, &ctx.customer).await?;

    session.navigate(&ctx.page("/me/update")).await?;

    let name_field = session.resolve(targets::name_field()).await?;
    session.fill(&name_field, "Updated Test User").await?;

    let submit = session.resolve(targets::submit_button()).await?;
    session.click(&submit).await?;

    session.wait_for_source("updated", PAGE_WAIT).await?;
    Ok(())
}

pub async fn password_reset<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    session.navigate(&ctx.page("/password/forgot")).await?;

    let email = session.resolve(targets::email_field()).await?;
    session.fill(&email, &ctx.customer.email).await?;

    let submit = session.resolve(targets::submit_button()).await?;
    session.click(&submit).await?;

    session.wait_for_source("email", PAGE_WAIT).await?;
    session.wait_for_source("sent", PAGE_WAIT).await?;
    Ok(())
}
