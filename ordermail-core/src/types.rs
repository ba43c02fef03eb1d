//! Domain types consumed by the email renderer.
//!
//! The renderer only reads these; nothing here is created or persisted by
//! this workspace. Wire shape is camelCase JSON so payloads produced by the
//! ordering service deserialize without adapters.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Human-facing order number, e.g. `ORD-1001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OrderNumber(pub String);

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for OrderNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderNumber {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Internal order identifier used to build the tracking link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How the customer chose to pay at order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    #[default]
    Full,
    Partial,
}

impl PaymentType {
    /// Label shown in order emails.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::Full => "Full Payment",
            PaymentType::Partial => "Partial Payment (Advance)",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Full => write!(f, "full"),
            PaymentType::Partial => write!(f, "partial"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    /// Returns `MissingRequiredField` when the name is blank.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.name.trim().is_empty() {
            return Err(DataError::missing("user.name"));
        }
        Ok(())
    }

    /// Email, or `None` when absent or blank.
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Phone, or `None` when absent or blank.
    pub fn phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    /// `price * quantity`, or `None` when the product does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// `index` is only used to point at the offending item in errors.
    pub fn validate(&self, index: usize) -> Result<(), DataError> {
        if self.name.trim().is_empty() {
            return Err(DataError::missing(format!("items[{index}].name")));
        }
        if self.price < Decimal::ZERO {
            return Err(DataError::invalid_amount(format!("items[{index}].price"), self.price));
        }
        if self.quantity == 0 {
            return Err(DataError::InvalidAmount {
                field: format!("items[{index}].quantity"),
                value: "0".to_string(),
            });
        }
        // Also bounds the unit price, since quantity is at least one.
        let field = format!("items[{index}].lineTotal");
        match self.line_total() {
            Some(total) => check_amount(field, total),
            None => Err(DataError::InvalidAmount {
                field,
                value: format!("{} x {}", self.price, self.quantity),
            }),
        }
    }
}

/// A placed order, as handed over by the ordering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Identifier used for the tracking link.
    #[serde(default)]
    pub id: OrderId,
    #[serde(default)]
    pub order_number: OrderNumber,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub delivery_charge: Decimal,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub advance_amount: Decimal,
    #[serde(default)]
    pub remaining_amount: Decimal,
    /// Estimated preparation time in minutes.
    #[serde(default)]
    pub estimated_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub is_fully_paid: bool,
    pub created_at: DateTime<Utc>,
    /// Populated customer record, when the ordering service joined it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<User>,
}

impl Order {
    /// Check everything an order email needs.
    ///
    /// The arithmetic relations between amounts are not enforced; only the
    /// range of each amount, item sanity, and presence of the order number.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.order_number.0.trim().is_empty() {
            return Err(DataError::missing("order.orderNumber"));
        }
        if self.items.is_empty() {
            return Err(DataError::missing("order.items"));
        }
        for (index, item) in self.items.iter().enumerate() {
            item.validate(index)?;
        }
        for (field, value) in [
            ("order.totalAmount", self.total_amount),
            ("order.deliveryCharge", self.delivery_charge),
            ("order.advanceAmount", self.advance_amount),
        ] {
            check_amount(field, value)?;
        }
        // May be negative (overpaid); only the magnitude is bounded.
        if self.remaining_amount.abs() > max_amount() {
            return Err(DataError::invalid_amount("order.remainingAmount", self.remaining_amount));
        }
        let subtotal = self.subtotal();
        if subtotal < Decimal::ZERO {
            return Err(DataError::invalid_amount("order.subtotal", subtotal));
        }
        Ok(())
    }

    /// `total_amount - delivery_charge`.
    pub fn subtotal(&self) -> Decimal {
        self.total_amount - self.delivery_charge
    }

    pub fn has_delivery_charge(&self) -> bool {
        self.delivery_charge > Decimal::ZERO
    }

    /// True when something is still owed at pickup.
    pub fn has_balance_due(&self) -> bool {
        self.remaining_amount > Decimal::ZERO
    }

    /// Special instructions, or `None` when absent or blank.
    pub fn special_instructions(&self) -> Option<&str> {
        non_blank(self.special_instructions.as_deref())
    }

    /// Tracking identifier; required wherever a tracking link is rendered.
    pub fn tracking_id(&self) -> Result<&str, DataError> {
        non_blank(Some(self.id.0.as_str())).ok_or_else(|| DataError::missing("order.id"))
    }
}

/// Largest accepted amount. Anything bigger cannot always be shown with two
/// decimals, since a `Decimal` mantissa tops out near 7.9e28.
pub fn max_amount() -> Decimal {
    Decimal::from(i64::MAX)
}

fn check_amount(field: impl Into<String>, value: Decimal) -> Result<(), DataError> {
    if value < Decimal::ZERO || value > max_amount() {
        return Err(DataError::invalid_amount(field, value));
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
