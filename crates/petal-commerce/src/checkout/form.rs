//! Shipping/contact form and its validation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `local@domain.tld` with no whitespace and a single `@`.
///
/// `None` only if the pattern fails to compile, in which case no email passes.
static EMAIL_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

fn looks_like_email(value: &str) -> bool {
    EMAIL_SHAPE.as_ref().is_some_and(|shape| shape.is_match(value))
}

/// A field of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Email,
    Street,
    City,
    State,
    PostalCode,
}

impl FormField {
    /// All fields, in form order.
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Email,
        FormField::Street,
        FormField::City,
        FormField::State,
        FormField::PostalCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Street => "street",
            FormField::City => "city",
            FormField::State => "state",
            FormField::PostalCode => "postalCode",
        }
    }

    fn required_message(&self) -> &'static str {
        match self {
            FormField::Name => "Name is required",
            FormField::Email => "Email is required",
            FormField::Street => "Street address is required",
            FormField::City => "City is required",
            FormField::State => "State is required",
            FormField::PostalCode => "Postal code is required",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message shown when the email doesn't look like an address.
pub const INVALID_EMAIL: &str = "Invalid email address";

/// Field-keyed validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, &'static str>);

impl ValidationErrors {
    /// Check if every field passed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Drop a field's message.
    pub fn clear(&mut self, field: FormField) {
        self.0.remove(&field);
    }

    /// Iterate failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: FormField, message: &'static str) {
        self.0.insert(field, message);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Where the order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl ShippingAddress {
    /// Format as single line (e.g., "12 MG Road, Pune, Maharashtra - 411001").
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.street, self.city, self.state, self.postal_code
        )
    }
}

/// Raw shopper input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl CheckoutForm {
    /// Current value of a field.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Street => &self.street,
            FormField::City => &self.city,
            FormField::State => &self.state,
            FormField::PostalCode => &self.postal_code,
        }
    }

    /// Replace a field's value.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Street => &mut self.street,
            FormField::City => &mut self.city,
            FormField::State => &mut self.state,
            FormField::PostalCode => &mut self.postal_code,
        };
        *slot = value.into();
    }

    /// Run the local checks. An empty result means the form may be submitted.
    ///
    /// Every field is required (whitespace-only counts as missing); the email
    /// must additionally match `local@domain.tld`.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for field in FormField::ALL {
            if self.get(field).trim().is_empty() {
                errors.insert(field, field.required_message());
            }
        }
        if errors.get(FormField::Email).is_none() && !looks_like_email(&self.email) {
            errors.insert(FormField::Email, INVALID_EMAIL);
        }
        errors
    }

    /// Shipping address portion of the form.
    pub fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}
