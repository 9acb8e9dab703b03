//! End-to-end order flow over the demo shop.

mod common;

use serde::Deserialize;

use comprar::{
    load_fixture, AutoDialogBehavior, ComprarError, Credentials, LoginIdentity, ProductPick,
    Selector, SelectorChain, ShippingAddress,
};

#[derive(Debug, Deserialize)]
struct HappyPath {
    user: Credentials,
    products: Vec<String>,
    shipping: ShippingAddress,
}

fn happy_path() -> HappyPath {
    load_fixture(format!(
        "{}/tests/fixtures/happy_path.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .expect("happy path fixture")
}

#[tokio::test]
async fn completes_the_happy_path_flow() {
    let (_store, page) = common::ecommerce_harness();
    let data = happy_path();
    let products: Vec<&str> = data.products.iter().map(String::as_str).collect();

    page.visit().await.unwrap();
    page.login(&LoginIdentity::User(data.user)).await.unwrap();
    page.verify_product_list_loaded().await.unwrap();

    page.add_specific_products_to_cart(&products).await.unwrap();
    page.verify_cart_total_matches_products(&products)
        .await
        .unwrap();

    page.proceed_to_checkout().await.unwrap();
    page.verify_shipping_form_visible().await.unwrap();
    page.complete_shipping(&data.shipping).await.unwrap();
    page.verify_order_success(&data.shipping).await.unwrap();
    page.logout().await.unwrap();
}

#[tokio::test]
async fn confirmation_carries_the_exact_shipping_line() {
    let (_store, page) = common::ecommerce_harness();

    page.login_as_admin().await.unwrap();
    page.add_random_products_to_cart(2).await.unwrap();
    page.checkout().open_cart().await.unwrap();
    page.proceed_to_checkout().await.unwrap();

    let shipping = ShippingAddress::new(
        "123 Test St",
        "Test City",
        "United States of America",
        "123-456-7890",
    );
    page.complete_shipping(&shipping).await.unwrap();

    // the exact literal, trailing period stripped
    assert_eq!(
        shipping.confirmation_line(),
        "123 Test St, Test City - United States of America"
    );
    page.verify_order_success(&shipping).await.unwrap();
}

#[tokio::test]
async fn handles_invalid_login_credentials_gracefully() {
    let (_store, page) = common::ecommerce_harness();
    page.login_with_invalid_credentials().await.unwrap();
}

#[tokio::test]
async fn validates_form_fields_with_empty_data() {
    let (_store, page) = common::ecommerce_harness();
    let data = happy_path();

    page.login_as_admin().await.unwrap();
    page.add_random_products_to_cart(1).await.unwrap();
    page.proceed_to_checkout().await.unwrap();

    let form = page.shipping_form();
    form.click_submit().await.unwrap();
    form.verify_validation_errors(1).await.unwrap();

    page.complete_shipping(&data.shipping).await.unwrap();
    page.verify_order_success(&data.shipping).await.unwrap();
}

#[tokio::test]
async fn partial_address_falls_back_to_defaults() {
    let (_store, page) = common::ecommerce_harness();

    page.login_as_admin().await.unwrap();
    page.add_random_products_to_cart(1).await.unwrap();
    page.proceed_to_checkout().await.unwrap();

    // only the street is under test; defaults keep the form submittable
    let address = ShippingAddress::partial().with_street("742 Evergreen Terrace");
    page.complete_shipping(&address).await.unwrap();
    page.verify_order_success(&address).await.unwrap();
}

#[tokio::test]
async fn duplicate_add_surfaces_the_alert_through_the_hook() {
    let (store, page) = common::ecommerce_harness();
    // anticipate the dialog before triggering it
    store.dialogs().set_auto_behavior(AutoDialogBehavior::AcceptAll);

    page.login_as_admin().await.unwrap();
    page.add_specific_products_to_cart(&["iPhone"]).await.unwrap();
    page.add_specific_products_to_cart(&["iPhone"]).await.unwrap();

    // intercepted, not suppressed: the cart did not silently double
    let dialogs = store.dialogs().dialogs();
    assert_eq!(dialogs.len(), 1);
    assert!(dialogs[0].message().contains("already added"));
    assert_eq!(page.product_list().cart_count().await.unwrap(), 1);
}

#[tokio::test]
async fn unhandled_dialog_blocks_the_command_queue() {
    let (_store, page) = common::ecommerce_harness();

    page.login_as_admin().await.unwrap();
    page.add_specific_products_to_cart(&["iPhone"]).await.unwrap();
    page.add_specific_products_to_cart(&["iPhone"]).await.unwrap();

    // no handler registered: the alert stays open and every later command
    // fails until something dismisses it
    let blocked = page.product_list().cart_count().await;
    assert!(matches!(blocked, Err(ComprarError::DialogBlocked { .. })));
}

#[tokio::test]
async fn cached_session_skips_the_login_form() {
    let (store, page) = common::ecommerce_harness();
    let cache = comprar::SessionCache::new();
    let page = page.with_session_cache(cache.clone());

    page.login_as_admin().await.unwrap();
    assert_eq!(store.login_round_trips(), 1);
    assert_eq!(cache.count(), 1);

    // fresh case: cookies and storage reset, cache kept
    store.clear_session_state().await.unwrap();
    page.login_as_admin().await.unwrap();

    // restored, not re-driven
    assert_eq!(store.login_round_trips(), 1);
    page.verify_product_list_loaded().await.unwrap();
}

#[tokio::test]
async fn rerunning_the_scenario_from_fresh_state_is_identical() {
    let (store, page) = common::ecommerce_harness();

    let email_field = SelectorChain::single("login email field", Selector::css("#email"));

    for _ in 0..2 {
        store.clear_session_state().await.unwrap();
        page.visit().await.unwrap();
        assert!(page.nav().element_exists(&email_field).await.unwrap());

        // a reload lands on the same fresh form
        page.nav().reload().await.unwrap();
        assert!(page.nav().element_exists(&email_field).await.unwrap());

        page.login(&LoginIdentity::EmailPassword(
            "admin@admin.com".to_string(),
            "admin123".to_string(),
        ))
        .await
        .unwrap();
        page.verify_product_list_loaded().await.unwrap();

        // no cart persisted across cases
        page.add_to_cart(&ProductPick::from("Nokia")).await.unwrap();
        assert_eq!(page.product_list().cart_count().await.unwrap(), 1);
        page.logout().await.unwrap();
    }
}
