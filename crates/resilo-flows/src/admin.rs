//! Admin flows: dashboard visibility and product management.

use crate::context::FlowContext;
use crate::report::{FlowError, ensure};
use crate::{PAGE_WAIT, account, targets};
use resilo_engine::backend::Backend;
use resilo_engine::session::Session;
use tracing::info;

pub async fn dashboard<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    account::sign_in(session, ctx, &ctx.admin).await?;

    session.navigate(&ctx.page("/admin/dashboard")).await?;

    for request in [
        targets::dashboard_panel(),
        targets::products_section(),
        targets::orders_section(),
        targets::users_section(),
    ] {
        let target = request.target().to_string();
        let section = session.resolve(request).await?;
        ensure(
            session.is_visible(&section).await?,
            format!("{} should be visible", target),
        )?;
    }
    Ok(())
}

pub async fn product_management<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    account::sign_in(session, ctx, &ctx.admin).await?;

    session.navigate(&ctx.page("/admin/products")).await?;
    let table = session.resolve(targets::products_table()).await?;
    ensure(
        session.is_visible(&table).await?,
        "products table should be visible",
    )?;

    let new_product = session.resolve(targets::new_product_button()).await?;
    session.click(&new_product).await?;

    let suffix = FlowContext::unique_suffix();
    let product_name = format!("Test Product {}", suffix);
    info!(%product_name, "creating product");

    let name = session.resolve(targets::name_field()).await?;
    session.fill(&name, &product_name).await?;
    let price = session.resolve(targets::price_field()).await?;
    session.fill(&price, "99.99").await?;
    let description = session.resolve(targets::description_field()).await?;
    session
        .fill(&description, "This is a test product description")
        .await?;
    let category = session.resolve(targets::category_field()).await?;
    session.fill(&category, "Electronics").await?;
    let stock = session.resolve(targets::stock_field()).await?;
    session.fill(&stock, "50").await?;
    let seller = session.resolve(targets::seller_field()).await?;
    session.fill(&seller, "Test Seller").await?;

    let submit = session.resolve(targets::submit_button()).await?;
    session.click(&submit).await?;

    session.wait_for_source("success", PAGE_WAIT).await?;
    Ok(())
}
