//! Test data generators.
//!
//! Pure functions producing randomized or fixed domain values for test
//! parameterization. No shared state: every call draws from a fresh
//! thread-local RNG.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Credentials, Role, ShippingAddress};

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elena", "Felix", "Gloria", "Hugo",
];

const STREET_NAMES: &[&str] = &[
    "Oak Avenue",
    "Main Street",
    "Cedar Lane",
    "Elm Drive",
    "Maple Road",
];

const CITIES: &[&str] = &[
    "Springfield",
    "Riverton",
    "Lakewood",
    "Fairview",
    "Greenville",
];

const COUNTRIES: &[&str] = &[
    "United States of America",
    "Canada",
    "United Kingdom",
    "Australia",
    "Germany",
    "France",
];

/// Product names known to render in the demo shop
pub const KNOWN_PRODUCTS: &[&str] = &["iPhone", "Samsung", "Nokia", "Xiaomi", "Huawei"];

fn alphanumeric(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let chars = b"abcdefghijklmnopqrstuvwxyz0123456789";
            chars[rng.gen_range(0..chars.len())] as char
        })
        .collect()
}

/// User credential generators
pub struct UserGenerator;

impl UserGenerator {
    /// Random plausible credentials (not registered on the target site)
    #[must_use]
    pub fn random() -> Credentials {
        let mut rng = rand::thread_rng();
        let name = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("test");
        let email = format!(
            "{}.{}@example.com",
            name.to_lowercase(),
            rng.gen_range(1000..10_000)
        );
        Credentials::new(email, alphanumeric(10))
    }

    /// The admin account the demo site accepts
    #[must_use]
    pub fn admin() -> Credentials {
        Credentials::new("admin@admin.com", "admin123").with_role(Role::Admin)
    }

    /// A customer-style account
    #[must_use]
    pub fn customer() -> Credentials {
        let mut rng = rand::thread_rng();
        Credentials::new(
            format!("customer.{}@example.com", rng.gen_range(1000..10_000)),
            "customer123",
        )
        .with_role(Role::Customer)
    }

    /// Credentials guaranteed to be rejected
    #[must_use]
    pub fn invalid() -> Credentials {
        Credentials::new(
            format!("invalid_{}@example.com", alphanumeric(8)),
            "wrongpassword123",
        )
    }
}

/// Shipping address generators
pub struct AddressGenerator;

impl AddressGenerator {
    /// Random address drawing from the country list the dropdown offers
    #[must_use]
    pub fn random() -> ShippingAddress {
        let mut rng = rand::thread_rng();
        let number = rng.gen_range(1..1000);
        let street = STREET_NAMES.choose(&mut rng).copied().unwrap_or("Main Street");
        let city = CITIES.choose(&mut rng).copied().unwrap_or("Springfield");
        let country = COUNTRIES
            .choose(&mut rng)
            .copied()
            .unwrap_or("United States of America");
        ShippingAddress::new(format!("{number} {street}"), city, country, Self::us_phone())
    }

    /// US address with a `###-###-####` phone
    #[must_use]
    pub fn us() -> ShippingAddress {
        let mut rng = rand::thread_rng();
        let number = rng.gen_range(1..1000);
        let street = STREET_NAMES.choose(&mut rng).copied().unwrap_or("Main Street");
        let city = CITIES.choose(&mut rng).copied().unwrap_or("Springfield");
        let mut address = ShippingAddress::new(
            format!("{number} {street}"),
            city,
            "United States of America",
            Self::us_phone(),
        );
        address.postal_code = Some(format!("{:05}", rng.gen_range(10000..100_000)));
        address
    }

    fn us_phone() -> String {
        let mut rng = rand::thread_rng();
        format!(
            "{:03}-{:03}-{:04}",
            rng.gen_range(200..1000),
            rng.gen_range(200..1000),
            rng.gen_range(0..10_000)
        )
    }
}

/// Product pick generators
pub struct ProductGenerator;

impl ProductGenerator {
    /// One of the product names known to render in the shop
    #[must_use]
    pub fn known_product() -> &'static str {
        let mut rng = rand::thread_rng();
        KNOWN_PRODUCTS.choose(&mut rng).copied().unwrap_or("iPhone")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_fixed() {
        let admin = UserGenerator::admin();
        assert_eq!(admin.email, "admin@admin.com");
        assert_eq!(admin.password, "admin123");
        assert_eq!(admin.role, Some(Role::Admin));
    }

    #[test]
    fn test_random_user_shape() {
        let user = UserGenerator::random();
        assert!(user.email.contains('@'));
        assert_eq!(user.password.len(), 10);
    }

    #[test]
    fn test_invalid_user_is_not_admin() {
        let user = UserGenerator::invalid();
        assert!(user.email.starts_with("invalid_"));
        assert_ne!(user.email, "admin@admin.com");
    }

    #[test]
    fn test_random_address_country_is_listed() {
        let address = AddressGenerator::random();
        assert!(COUNTRIES.contains(&address.country.as_str()));
        assert!(!address.street.is_empty());
    }

    #[test]
    fn test_us_phone_shape() {
        let address = AddressGenerator::us();
        let parts: Vec<&str> = address.phone.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 3);
        assert_eq!(parts[2].len(), 4);
        assert!(address.postal_code.is_some());
    }

    #[test]
    fn test_known_product() {
        assert!(KNOWN_PRODUCTS.contains(&ProductGenerator::known_product()));
    }
}
