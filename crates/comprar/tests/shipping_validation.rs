//! Stepwise shipping-form validation.
//!
//! Required fields are validated strictly in form order: phone, street,
//! city, country. Each submission surfaces only the first unmet
//! requirement; filling it advances the blockage to the next field.

mod common;

use comprar::{ShippingAddress, ShippingField};

const REQUIRED_MESSAGE: &str = "Please fill out this field.";

#[tokio::test]
async fn validates_required_fields_one_by_one() {
    let (_store, page) = common::ecommerce_harness();

    page.login_as_admin().await.unwrap();
    page.add_random_products_to_cart(1).await.unwrap();
    page.proceed_to_checkout().await.unwrap();

    let form = page.shipping_form();

    // 1) all fields empty -> the phone requirement, and only it
    form.click_submit().await.unwrap();
    assert_eq!(
        form.validation_message(ShippingField::Phone).await.unwrap(),
        REQUIRED_MESSAGE
    );
    assert_eq!(
        form.validation_message(ShippingField::Street).await.unwrap(),
        ""
    );

    // 2) phone filled -> the blockage advances to street
    form.fill_field(ShippingField::Phone, "123-456-7890")
        .await
        .unwrap();
    form.click_submit().await.unwrap();
    assert_eq!(
        form.validation_message(ShippingField::Phone).await.unwrap(),
        ""
    );
    assert_eq!(
        form.validation_message(ShippingField::Street).await.unwrap(),
        REQUIRED_MESSAGE
    );

    // 3) street filled -> city
    form.fill_field(ShippingField::Street, "123 Test St")
        .await
        .unwrap();
    form.click_submit().await.unwrap();
    assert_eq!(
        form.validation_message(ShippingField::City).await.unwrap(),
        REQUIRED_MESSAGE
    );

    // 4) city filled -> country
    form.fill_field(ShippingField::City, "Test City").await.unwrap();
    form.click_submit().await.unwrap();
    assert!(!form
        .validation_message(ShippingField::Country)
        .await
        .unwrap()
        .is_empty());

    // 5) country selected -> submission succeeds
    form.fill_field(ShippingField::Country, "United States of America")
        .await
        .unwrap();
    form.submit().await.unwrap();

    page.verify_order_success(&ShippingAddress::new(
        "123 Test St",
        "Test City",
        "United States of America",
        "123-456-7890",
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn empty_submission_reports_exactly_one_blocking_field() {
    let (_store, page) = common::ecommerce_harness();

    page.login_as_admin().await.unwrap();
    page.add_random_products_to_cart(1).await.unwrap();
    page.proceed_to_checkout().await.unwrap();

    let form = page.shipping_form();
    form.click_submit().await.unwrap();

    let mut reporting = Vec::new();
    for field in ShippingField::IN_VALIDATION_ORDER {
        if !form.validation_message(field).await.unwrap().is_empty() {
            reporting.push(field);
        }
    }
    assert_eq!(reporting, vec![ShippingField::Phone]);
}

#[tokio::test]
async fn shipping_form_fields_are_visible_and_enabled() {
    let (_store, page) = common::ecommerce_harness();

    page.login_as_admin().await.unwrap();
    page.add_random_products_to_cart(1).await.unwrap();
    page.proceed_to_checkout().await.unwrap();

    page.verify_shipping_form().await.unwrap();
}
