//! Cart flows: add with quantity bump, then cart page operations.

use crate::context::FlowContext;
use crate::report::{FlowError, ensure};
use crate::{PAGE_WAIT, targets};
use resilo_engine::backend::Backend;
use resilo_engine::session::Session;
use tracing::info;

/// Put the sample product in the cart. Shared with the checkout flows.
pub(crate) async fn seed_cart<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    session.navigate(&ctx.product_page()).await?;
    let cart_button = session.resolve(targets::add_to_cart_button()).await?;
    session.click(&cart_button).await?;
    session.wait_for_source("Item Added to Cart", PAGE_WAIT).await?;
    Ok(())
}

pub async fn add_to_cart<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    session.navigate(&ctx.product_page()).await?;

    let plus = session.resolve(targets::quantity_plus()).await?;
    session.click(&plus).await?;

    let cart_button = session.resolve(targets::add_to_cart_button()).await?;
    session.click(&cart_button).await?;

    session.wait_for_source("Item Added to Cart", PAGE_WAIT).await?;
    Ok(())
}

pub async fn cart_operations<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    seed_cart(session, ctx).await?;

    session.navigate(&ctx.page("/cart")).await?;
    ensure(
        !session.source_contains("Your Cart is Empty").await?,
        "cart should not be empty after adding an item",
    )?;

    match session.try_resolve(targets::remove_from_cart()).await? {
        Some(remove) => session.click(&remove).await?,
        None => info!("no removable line items rendered"),
    }
    Ok(())
}
