//! # Domain Types
//!
//! Core domain types used throughout Meridian POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  Card           │       │
//! │  │  sku            │   │  name           │   │  Cash           │       │
//! │  │  price_cents    │   │  phone/email    │   │  Mobile         │       │
//! │  │  available_stock│   └─────────────────┘   │  Credit         │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │    TaxRate      │                                                   │
//! │  │  ─────────────  │                                                   │
//! │  │  bps (u32)      │                                                   │
//! │  │  825 = 8.25%    │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entity identifiers are the backend's numeric primary keys. The catalog,
//! customer, and cashier records themselves live behind the REST API; only
//! the slices the cart needs are modeled here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25% (e.g., Texas sales tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product, as fetched from the backend.
///
/// The cart snapshots `price_cents` and `tax_rate_bps` when a product is
/// added; later catalog changes never reach lines already in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Backend primary key.
    pub id: i64,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Tax rate in basis points (825 = 8.25%).
    pub tax_rate_bps: u32,

    /// Units currently available for sale.
    pub available_stock: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,
}

impl Product {
    /// Convenience constructor for an active product.
    pub fn new(
        id: i64,
        sku: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        tax_rate_bps: u32,
        available_stock: i64,
    ) -> Self {
        Product {
            id,
            sku: sku.into(),
            name: name.into(),
            price_cents,
            tax_rate_bps,
            available_stock,
            is_active: true,
        }
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Checks whether `quantity` units can be sold from available stock.
    #[inline]
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.available_stock >= quantity
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer attached to a sale.
///
/// A sale without a customer is a walk-in sale; the cart models that as
/// `Option<Customer>` being `None`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    /// Backend primary key.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Contact phone, if on record.
    pub phone: Option<String>,

    /// Contact email, if on record.
    pub email: Option<String>,
}

impl Customer {
    /// Convenience constructor with no contact details.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Customer {
            id,
            name: name.into(),
            phone: None,
            email: None,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid for.
///
/// Serializes to the lowercase strings the sales-recording endpoint
/// expects: `"card" | "cash" | "mobile" | "credit"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment on an external terminal.
    Card,
    /// Physical cash payment.
    Cash,
    /// Mobile wallet payment.
    Mobile,
    /// Store credit account.
    Credit,
}

impl PaymentMethod {
    /// The wire name of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Mobile => "mobile",
            PaymentMethod::Credit => "credit",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(8.25);
        assert_eq!(rate.bps(), 825);
    }

    #[test]
    fn test_product_can_supply() {
        let product = Product::new(1, "COKE-330", "Coca-Cola 330ml", 299, 825, 5);
        assert!(product.can_supply(5));
        assert!(!product.can_supply(6));
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Card).unwrap(),
            "\"card\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Mobile).unwrap(),
            "\"mobile\""
        );
        let parsed: PaymentMethod = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Cash);
    }
}
