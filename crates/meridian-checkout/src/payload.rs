//! # Sale Submission Payload
//!
//! Wire types for the sales-recording contract.
//!
//! ## Contract Shape
//! ```text
//! POST {base}/sales
//! {
//!   "customer_id": 12 | null,
//!   "cashier_id": 3,
//!   "payment_method": "card" | "cash" | "mobile" | "credit",
//!   "items": [
//!     { "product_id": 1, "quantity": 2, "unit_price": 1000,
//!       "tax_rate": 800, "discount_amount": 0 }
//!   ],
//!   "subtotal_amount": 2500,
//!   "tax_amount": 160,
//!   "discount_amount": 0,
//!   "total_amount": 2660
//! }
//! ```
//!
//! Monetary fields are integer minor units (cents); `tax_rate` is basis
//! points. The endpoint answers with an acknowledgement carrying the
//! created sale's identifier on success.

use serde::{Deserialize, Serialize};

use meridian_core::cart::{Cart, LineItem};
use meridian_core::money::Money;
use meridian_core::types::{PaymentMethod, TaxRate};

// =============================================================================
// Sale Line
// =============================================================================

/// One line of the sale-submission request, mirroring a cart line's
/// frozen snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Frozen unit price in minor units.
    pub unit_price: Money,
    /// Frozen tax rate in basis points.
    pub tax_rate: TaxRate,
    /// Line discount in minor units.
    pub discount_amount: Money,
}

impl From<&LineItem> for SaleLine {
    fn from(item: &LineItem) -> Self {
        SaleLine {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price(),
            tax_rate: item.tax_rate(),
            discount_amount: item.discount(),
        }
    }
}

// =============================================================================
// Sale Request
// =============================================================================

/// The full sale-submission request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SaleRequest {
    /// Selected customer, `null` for a walk-in sale.
    pub customer_id: Option<i64>,

    /// The cashier recording the sale.
    pub cashier_id: i64,

    /// How the sale was paid.
    pub payment_method: PaymentMethod,

    /// One entry per cart line, in cart order.
    pub items: Vec<SaleLine>,

    /// Σ line subtotals.
    pub subtotal_amount: Money,

    /// Σ line taxes.
    pub tax_amount: Money,

    /// Σ line discounts.
    pub discount_amount: Money,

    /// subtotal + tax - discount.
    pub total_amount: Money,
}

impl SaleRequest {
    /// Builds a request from the cart's current lines and totals.
    ///
    /// Pure snapshot: the cart is not consumed or mutated; it is cleared
    /// by the register only after the endpoint acknowledges the sale.
    pub fn from_cart(cart: &Cart, payment_method: PaymentMethod, cashier_id: i64) -> Self {
        let totals = cart.totals();

        SaleRequest {
            customer_id: cart.customer().map(|c| c.id),
            cashier_id,
            payment_method,
            items: cart.items().iter().map(SaleLine::from).collect(),
            subtotal_amount: totals.subtotal,
            tax_amount: totals.tax,
            discount_amount: totals.discount,
            total_amount: totals.total,
        }
    }
}

// =============================================================================
// Sale Acknowledgement
// =============================================================================

/// The endpoint's answer to a sale submission.
///
/// `success: false` with an `error` message is an application-level
/// rejection; the register surfaces it without clearing the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SaleAck {
    /// Whether the sale was recorded.
    pub success: bool,

    /// The created sale's identifier, present on success.
    #[serde(default)]
    pub sale_id: Option<i64>,

    /// Human-readable rejection reason, present on failure.
    #[serde(default)]
    pub error: Option<String>,
}

impl SaleAck {
    /// A successful acknowledgement carrying the created sale id.
    pub fn recorded(sale_id: i64) -> Self {
        SaleAck {
            success: true,
            sale_id: Some(sale_id),
            error: None,
        }
    }

    /// A rejection with a reason.
    pub fn rejected(message: impl Into<String>) -> Self {
        SaleAck {
            success: false,
            sale_id: None,
            error: Some(message.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::types::{Customer, Product};
    use serde_json::json;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&Product::new(1, "A-1", "Product A", 1000, 800, 10), 2)
            .unwrap();
        cart.add_item(&Product::new(2, "B-2", "Product B", 500, 0, 10), 1)
            .unwrap();
        cart
    }

    #[test]
    fn test_request_from_cart() {
        let mut cart = sample_cart();
        cart.set_customer(Some(Customer::new(12, "Ada")));

        let request = SaleRequest::from_cart(&cart, PaymentMethod::Card, 3);

        assert_eq!(request.customer_id, Some(12));
        assert_eq!(request.cashier_id, 3);
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].unit_price.cents(), 1000);
        assert_eq!(request.items[0].tax_rate.bps(), 800);
        assert_eq!(request.subtotal_amount.cents(), 2500);
        assert_eq!(request.tax_amount.cents(), 160);
        assert_eq!(request.discount_amount.cents(), 0);
        assert_eq!(request.total_amount.cents(), 2660);
    }

    #[test]
    fn test_request_wire_shape() {
        let cart = sample_cart();
        let request = SaleRequest::from_cart(&cart, PaymentMethod::Cash, 7);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "customer_id": null,
                "cashier_id": 7,
                "payment_method": "cash",
                "items": [
                    { "product_id": 1, "quantity": 2, "unit_price": 1000,
                      "tax_rate": 800, "discount_amount": 0 },
                    { "product_id": 2, "quantity": 1, "unit_price": 500,
                      "tax_rate": 0, "discount_amount": 0 }
                ],
                "subtotal_amount": 2500,
                "tax_amount": 160,
                "discount_amount": 0,
                "total_amount": 2660
            })
        );
    }

    #[test]
    fn test_ack_parses_minimal_failure() {
        // Endpoints may omit sale_id and error entirely
        let ack: SaleAck = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!ack.success);
        assert!(ack.sale_id.is_none());
        assert!(ack.error.is_none());
    }

    #[test]
    fn test_ack_parses_success() {
        let ack: SaleAck = serde_json::from_str(r#"{"success": true, "sale_id": 991}"#).unwrap();
        assert_eq!(ack, SaleAck::recorded(991));
    }
}
