//! Checkout form validation and order placement.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::order::{CustomerDetails, Order};
use crate::types::{Email, EmailError};

/// Optional leading `+`, then digits and common separators.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-.()]+$").expect("Invalid regex"));

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("Invalid regex"));

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// A checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutField {
    Name,
    Email,
    Phone,
    Address,
    City,
    Zip,
}

impl CheckoutField {
    /// Every field, in form order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::Zip,
    ];

    /// Form input name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::Zip => "zip",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::City => "City",
            Self::Zip => "ZIP code",
        }
    }
}

/// Validation messages keyed by field, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<CheckoutField, String>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message for a field, if it failed validation.
    #[must_use]
    pub fn get(&self, field: CheckoutField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: CheckoutField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Raw checkout form input, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

impl CheckoutForm {
    /// Submitted value for a field.
    #[must_use]
    pub fn value(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::Name => &self.name,
            CheckoutField::Email => &self.email,
            CheckoutField::Phone => &self.phone,
            CheckoutField::Address => &self.address,
            CheckoutField::City => &self.city,
            CheckoutField::Zip => &self.zip,
        }
    }

    /// Validate every field.
    ///
    /// All fields are checked so the form can show every problem at once.
    /// Values are trimmed before they are checked and stored.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field.
    pub fn validate(&self) -> Result<CustomerDetails, FieldErrors> {
        let mut errors = FieldErrors::default();

        for field in CheckoutField::ALL {
            if self.value(field).trim().is_empty() {
                errors.insert(field, format!("{} is required", field.label()));
            }
        }

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => None,
            Err(_) => {
                errors.insert(CheckoutField::Email, "Invalid email format");
                None
            }
        };

        let phone = self.phone.trim();
        if !phone.is_empty() && !is_valid_phone(phone) {
            errors.insert(CheckoutField::Phone, "Invalid phone number");
        }

        let zip = self.zip.trim();
        if !zip.is_empty() && !ZIP_RE.is_match(zip) {
            errors.insert(CheckoutField::Zip, "Invalid ZIP code");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(CustomerDetails {
                name: self.name.trim().to_owned(),
                email,
                phone: phone.to_owned(),
                address: self.address.trim().to_owned(),
                city: self.city.trim().to_owned(),
                zip: zip.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

fn is_valid_phone(phone: &str) -> bool {
    if !PHONE_RE.is_match(phone) {
        return false;
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// Snapshot the cart into a pending order.
///
/// Returns `None` for an empty cart. The caller is responsible for clearing
/// the cart once the order is stored.
#[must_use]
pub fn place_order(cart: &Cart, customer: CustomerDetails, now: DateTime<Utc>) -> Option<Order> {
    if cart.is_empty() {
        return None;
    }
    Some(Order::new(customer, cart.items().to_vec(), cart.summary(), now))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{OrderStatus, ProductId};

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "(555) 123-4567".into(),
            address: "42 Elm Street".into(),
            city: "Portland".into(),
            zip: "97201".into(),
        }
    }

    #[test]
    fn test_all_empty_fields_report_one_error_each() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), CheckoutField::ALL.len());
        assert_eq!(errors.get(CheckoutField::Name), Some("Name is required"));
        assert_eq!(errors.get(CheckoutField::Email), Some("Email is required"));
        assert_eq!(errors.get(CheckoutField::Zip), Some("ZIP code is required"));
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let form = CheckoutForm {
            city: "   ".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(CheckoutField::City), Some("City is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_invalid_formats() {
        let form = CheckoutForm {
            email: "not-an-email".into(),
            phone: "12ab".into(),
            zip: "1234".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(CheckoutField::Email), Some("Invalid email format"));
        assert_eq!(errors.get(CheckoutField::Phone), Some("Invalid phone number"));
        assert_eq!(errors.get(CheckoutField::Zip), Some("Invalid ZIP code"));
    }

    #[test]
    fn test_phone_digit_bounds() {
        assert!(is_valid_phone("+1 555.123.4567"));
        assert!(is_valid_phone("5551234"));
        assert!(!is_valid_phone("555123"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("555+1234567"));
    }

    #[test]
    fn test_zip_plus_four() {
        let form = CheckoutForm {
            zip: "97201-1234".into(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_valid_form_trims_values() {
        let form = CheckoutForm {
            name: "  Jane Doe ".into(),
            ..valid_form()
        };
        let details = form.validate().unwrap();
        assert_eq!(details.name, "Jane Doe");
        assert_eq!(details.email.as_str(), "jane@example.com");
    }

    #[test]
    fn test_place_order_snapshots_cart() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(catalog.find(&ProductId::new("prod-1")).cloned().unwrap());
        cart.add(catalog.find(&ProductId::new("prod-6")).cloned().unwrap());

        let now = Utc::now();
        let order = place_order(&cart, valid_form().validate().unwrap(), now).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total.display(), "$74.98");
        assert_eq!(order.total, order.line_items_total() + order.shipping);
        assert_eq!(order.id.as_str(), format!("ORD-{}", now.timestamp_millis()));
    }

    #[test]
    fn test_place_order_rejects_empty_cart() {
        let details = valid_form().validate().unwrap();
        assert!(place_order(&Cart::new(), details, Utc::now()).is_none());
    }
}
