//! The shared target catalog: one constructor per logical widget, with
//! its fallback chain as data. Selector values come from the storefront's
//! markup; the scans and heuristics cover redesigned pages where the
//! hard-coded ids have moved.

use resilo_common::strategy::{AttributeProbe, FieldRole, FormProbe, LocatorStrategy};
use resilo_engine::resolver::ResolutionRequest;
use resilo_engine::scan;

fn by_id(target: &str, id: &str) -> ResolutionRequest {
    ResolutionRequest::new(target).strategy(LocatorStrategy::Id(id.into()))
}

pub fn search_box() -> ResolutionRequest {
    ResolutionRequest::new("search box")
        .strategy(LocatorStrategy::Id("search_field".into()))
        .strategy(LocatorStrategy::Name("keyword".into()))
        .strategy(LocatorStrategy::Css("input[type=search]".into()))
        .heuristic(scan::first_search_input)
}

pub fn search_button() -> ResolutionRequest {
    ResolutionRequest::new("search button")
        .strategy(LocatorStrategy::Id("search_btn".into()))
        .strategy(LocatorStrategy::Css("button[type='submit']".into()))
        .strategy(LocatorStrategy::FormScan(FormProbe::new(FieldRole::Submit)))
}

pub fn name_field() -> ResolutionRequest {
    ResolutionRequest::new("name field")
        .strategy(LocatorStrategy::Id("name_field".into()))
        .strategy(LocatorStrategy::Name("name".into()))
}

pub fn email_field() -> ResolutionRequest {
    ResolutionRequest::new("email field")
        .strategy(LocatorStrategy::Id("email_field".into()))
        .strategy(LocatorStrategy::Name("email".into()))
        .strategy(LocatorStrategy::Css("input[type=email]".into()))
        .strategy(LocatorStrategy::FormScan(FormProbe::new(FieldRole::Email)))
}

pub fn password_field() -> ResolutionRequest {
    ResolutionRequest::new("password field")
        .strategy(LocatorStrategy::Id("password_field".into()))
        .strategy(LocatorStrategy::Css("input[type=password]".into()))
        .heuristic(scan::first_password_input)
}

pub fn submit_button() -> ResolutionRequest {
    ResolutionRequest::new("submit button")
        .strategy(LocatorStrategy::Css("button[type='submit']".into()))
        .strategy(LocatorStrategy::FormScan(FormProbe::new(FieldRole::Submit)))
        .heuristic(scan::lone_form_submit)
}

pub fn account_menu() -> ResolutionRequest {
    ResolutionRequest::new("account menu")
        .strategy(LocatorStrategy::Css(".dropdown-toggle".into()))
}

pub fn product_title() -> ResolutionRequest {
    ResolutionRequest::new("product title")
        .strategy(LocatorStrategy::Id("product_title".into()))
        .strategy(LocatorStrategy::TagName("h3".into()))
}

pub fn product_price() -> ResolutionRequest {
    by_id("product price", "product_price")
}

pub fn add_to_cart_button() -> ResolutionRequest {
    ResolutionRequest::new("add to cart button")
        .strategy(LocatorStrategy::Id("cart_btn".into()))
        .strategy(LocatorStrategy::Css(".add-to-cart".into()))
        .strategy(LocatorStrategy::AttributeScan(
            AttributeProbe::new("class").on_tag("button").containing("cart"),
        ))
}

pub fn quantity_plus() -> ResolutionRequest {
    ResolutionRequest::new("quantity increase")
        .strategy(LocatorStrategy::Css("span.btn.btn-primary.plus".into()))
        .strategy(LocatorStrategy::Css(".plus".into()))
}

pub fn remove_from_cart() -> ResolutionRequest {
    ResolutionRequest::new("remove line item")
        .strategy(LocatorStrategy::Css(".fa-trash".into()))
        .tolerable()
}

pub fn checkout_button() -> ResolutionRequest {
    ResolutionRequest::new("checkout button")
        .strategy(LocatorStrategy::Css(".checkout-btn".into()))
        .tolerable()
}

pub fn address_field() -> ResolutionRequest {
    ResolutionRequest::new("address field")
        .strategy(LocatorStrategy::Id("address_field".into()))
        .strategy(LocatorStrategy::Name("address".into()))
}

pub fn city_field() -> ResolutionRequest {
    ResolutionRequest::new("city field")
        .strategy(LocatorStrategy::Id("city_field".into()))
        .strategy(LocatorStrategy::Name("city".into()))
}

pub fn postal_code_field() -> ResolutionRequest {
    ResolutionRequest::new("postal code field")
        .strategy(LocatorStrategy::Id("postal_code_field".into()))
        .strategy(LocatorStrategy::Name("postal_code".into()))
}

pub fn phone_field() -> ResolutionRequest {
    ResolutionRequest::new("phone field")
        .strategy(LocatorStrategy::Id("phone_no_field".into()))
        .strategy(LocatorStrategy::Name("phone".into()))
}

pub fn country_select() -> ResolutionRequest {
    ResolutionRequest::new("country select")
        .strategy(LocatorStrategy::Id("country_field".into()))
        .strategy(LocatorStrategy::Css("select[name=country]".into()))
        .strategy(LocatorStrategy::TagName("select".into()))
}

pub fn order_summary() -> ResolutionRequest {
    ResolutionRequest::new("order summary")
        .strategy(LocatorStrategy::Css(".order-summary".into()))
}

pub fn order_line_item() -> ResolutionRequest {
    ResolutionRequest::new("order line item")
        .strategy(LocatorStrategy::Css(".cart-item".into()))
        .tolerable()
}

pub fn shipping_info() -> ResolutionRequest {
    ResolutionRequest::new("shipping info")
        .strategy(LocatorStrategy::Css(".shipping-info".into()))
}

pub fn payment_button() -> ResolutionRequest {
    ResolutionRequest::new("payment button")
        .strategy(LocatorStrategy::Css(".payment-btn".into()))
        .tolerable()
}

pub fn payment_widget() -> ResolutionRequest {
    ResolutionRequest::new("payment widget")
        .strategy(LocatorStrategy::Css(".stripe-card-element".into()))
        .tolerable()
}

pub fn order_item() -> ResolutionRequest {
    ResolutionRequest::new("order history entry")
        .strategy(LocatorStrategy::Css(".order-item".into()))
        .tolerable()
}

pub fn view_order_button() -> ResolutionRequest {
    ResolutionRequest::new("view order button")
        .strategy(LocatorStrategy::Css(".view-order-btn".into()))
        .tolerable()
}

pub fn order_details() -> ResolutionRequest {
    ResolutionRequest::new("order details")
        .strategy(LocatorStrategy::Css(".order-details".into()))
}

pub fn dashboard_panel() -> ResolutionRequest {
    ResolutionRequest::new("admin dashboard")
        .strategy(LocatorStrategy::Css(".dashboard".into()))
}

pub fn products_section() -> ResolutionRequest {
    ResolutionRequest::new("products section")
        .strategy(LocatorStrategy::Css(".products-section".into()))
}

pub fn orders_section() -> ResolutionRequest {
    ResolutionRequest::new("orders section")
        .strategy(LocatorStrategy::Css(".orders-section".into()))
}

pub fn users_section() -> ResolutionRequest {
    ResolutionRequest::new("users section")
        .strategy(LocatorStrategy::Css(".users-section".into()))
}

pub fn products_table() -> ResolutionRequest {
    ResolutionRequest::new("products table")
        .strategy(LocatorStrategy::Css(".products-table".into()))
        .strategy(LocatorStrategy::TagName("table".into()))
}

pub fn new_product_button() -> ResolutionRequest {
    ResolutionRequest::new("new product button")
        .strategy(LocatorStrategy::Css(".new-product-btn".into()))
}

pub fn price_field() -> ResolutionRequest {
    by_id("price field", "price_field")
}

pub fn description_field() -> ResolutionRequest {
    by_id("description field", "description_field")
}

pub fn category_field() -> ResolutionRequest {
    by_id("category field", "category_field")
}

pub fn stock_field() -> ResolutionRequest {
    by_id("stock field", "stock_field")
}

pub fn seller_field() -> ResolutionRequest {
    by_id("seller field", "seller_field")
}

#[cfg(test)]
mod tests {
    use super::*;
    use resilo_engine::resolver::FailurePolicy;

    #[test]
    fn search_box_chain_prefers_the_known_id() {
        let request = search_box();
        let kinds: Vec<_> = request.strategy_list().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec!["id", "name", "css"]);
        assert!(request.heuristic_scan().is_some());
    }

    #[test]
    fn exploratory_targets_are_tolerable() {
        for request in [checkout_button(), order_item(), remove_from_cart()] {
            assert_eq!(request.policy(), FailurePolicy::Tolerable);
        }
        assert_eq!(search_box().policy(), FailurePolicy::Fatal);
    }
}
