//! Catalog flows: keyword search and the product details page.

use crate::context::FlowContext;
use crate::report::{FlowError, ensure};
use crate::{PAGE_WAIT, targets};
use resilo_engine::backend::Backend;
use resilo_engine::session::Session;

pub async fn search<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    session.navigate(&ctx.page("/")).await?;

    let search_box = session.resolve(targets::search_box()).await?;
    session.fill(&search_box, "laptop").await?;

    let search_button = session.resolve(targets::search_button()).await?;
    session.click(&search_button).await?;

    session.wait_for_source("laptop", PAGE_WAIT).await?;
    Ok(())
}

pub async fn product_details<B: Backend>(
    session: &mut Session<B>,
    ctx: &FlowContext,
) -> Result<(), FlowError> {
    session.navigate(&ctx.product_page()).await?;

    let title = session.resolve(targets::product_title()).await?;
    let name = session.text_of(&title).await?;
    ensure(!name.trim().is_empty(), "product title should not be empty")?;

    let price = session.resolve(targets::product_price()).await?;
    ensure(
        session.is_visible(&price).await?,
        "product price should be visible",
    )?;

    let cart_button = session.resolve(targets::add_to_cart_button()).await?;
    ensure(
        session.is_visible(&cart_button).await?,
        "add to cart button should be visible",
    )
}
