//! Checkout flows: shipping details, order confirmation, the payment
//! page, and order history. The payment processor's iframe internals
//! belong to an external system; these flows stop at its boundary.

use crate::context::FlowContext;
use crate::report::{FlowError, ensure};
use crate::{PAGE_WAIT, account, cart, targets};
use regex::Regex;
use resilo_engine::backend::Backend;
use resilo_engine::session::Session;
use std::sync::LazyLock;
use tracing::info;

static CONFIRM_PAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new("confirm").expect("literal"));
static PAYMENT_PAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new("payment").expect("literal"));
static ORDERS_PAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new("orders").expect("literal"));
static ORDER_PAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new("order").expect("literal"));

pub async fn shipping<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    account::sign_in(session, ctx, &ctx.customer).await?;
    cart::seed_cart(session, ctx).await?;

    session.navigate(&ctx.page("/cart")).await?;
    let Some(checkout) = session.try_resolve(targets::checkout_button()).await? else {
        info!("checkout button not rendered; skipping shipping flow");
        return Ok(());
    };
    session.click(&checkout).await?;

    let address = session.resolve(targets::address_field()).await?;
    session.fill(&address, "123 Test Street").await?;
    let city = session.resolve(targets::city_field()).await?;
    session.fill(&city, "Test City").await?;
    let postal = session.resolve(targets::postal_code_field()).await?;
    session.fill(&postal, "12345").await?;
    let phone = session.resolve(targets::phone_field()).await?;
    session.fill(&phone, "1234567890").await?;

    let country = session.resolve(targets::country_select()).await?;
    session.select_option(&country, "United States").await?;

    let submit = session.resolve(targets::submit_button()).await?;
    session.click(&submit).await?;

    session.wait_until_url_matches(&CONFIRM_PAGE, PAGE_WAIT).await?;
    Ok(())
}

pub async fn confirm_order<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    account::sign_in(session, ctx, &ctx.customer).await?;
    cart::seed_cart(session, ctx).await?;

    session.navigate(&ctx.page("/confirm")).await?;

    let summary = session.resolve(targets::order_summary()).await?;
    ensure(
        session.is_visible(&summary).await?,
        "order summary should be visible",
    )?;

    let line_item = session.try_resolve(targets::order_line_item()).await?;
    ensure(line_item.is_some(), "confirm page should list the order items")?;

    let shipping = session.resolve(targets::shipping_info()).await?;
    ensure(
        session.is_visible(&shipping).await?,
        "shipping info should be visible",
    )?;

    if let Some(payment) = session.try_resolve(targets::payment_button()).await? {
        session.click(&payment).await?;
        session.wait_until_url_matches(&PAYMENT_PAGE, PAGE_WAIT).await?;
    }
    Ok(())
}

pub async fn payment<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    account::sign_in(session, ctx, &ctx.customer).await?;

    session.navigate(&ctx.page("/payment")).await?;

    if session.try_resolve(targets::payment_widget()).await?.is_some() {
        info!("payment widget rendered");
    }

    let url = session.current_url().await?;
    ensure(
        url.to_lowercase().contains("payment"),
        format!("expected to stay on the payment page, got {}", url),
    )
}

pub async fn order_history<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    account::sign_in(session, ctx, &ctx.customer).await?;

    session.navigate(&ctx.page("/orders/me")).await?;
    session.wait_until_url_matches(&ORDERS_PAGE, PAGE_WAIT).await?;

    let Some(_entry) = session.try_resolve(targets::order_item()).await? else {
        info!("no orders found in history");
        return Ok(());
    };

    let Some(view) = session.try_resolve(targets::view_order_button()).await? else {
        info!("order entries render without a detail view");
        return Ok(());
    };
    session.click(&view).await?;
    session.wait_until_url_matches(&ORDER_PAGE, PAGE_WAIT).await?;

    let details = session.resolve(targets::order_details()).await?;
    ensure(
        session.is_visible(&details).await?,
        "order details should be visible",
    )
}
