//! # Cart Ledger
//!
//! The in-memory cart: ordered line items with price/tax snapshots and
//! derived monetary totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Ledger Operations                            │
//! │                                                                         │
//! │  UI Action                Operation               Cart Change           │
//! │  ─────────────            ─────────────           ─────────────────     │
//! │                                                                         │
//! │  Click Product ─────────► add_item() ───────────► new line / qty += n  │
//! │                                                                         │
//! │  Change Quantity ───────► update_quantity() ────► line qty = n         │
//! │                                                    (n <= 0 removes)     │
//! │  Click Remove ──────────► remove_item() ────────► line deleted         │
//! │                                                                         │
//! │  Apply Discount ────────► set_discount() ───────► line discount = d    │
//! │                                                                         │
//! │  Pick Customer ─────────► set_customer() ───────► customer replaced    │
//! │                                                                         │
//! │  Checkout OK / Cancel ──► clear() ──────────────► empty, walk-in       │
//! │                                                                         │
//! │  Every rejected operation leaves the cart byte-for-byte unchanged.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Line items are unique by `product_id` (adding the same product merges)
//! - Every line has quantity > 0 (zero or negative removes the line)
//! - A line's discount never exceeds its subtotal plus tax
//! - Totals are recomputed on every read, never cached

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Customer, Product, TaxRate};
use crate::validation::{
    validate_cart_size, validate_discount_cents, validate_price_cents, validate_quantity,
    validate_sku, validate_tax_rate_bps,
};

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in the cart.
///
/// ## Snapshot Pricing
/// `unit_price_cents`, `tax_rate_bps`, `sku`, and `name` are frozen copies
/// of the product at the moment it was added. Catalog changes after that
/// moment never reach lines already in the cart; removing and re-adding a
/// product takes a fresh snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product ID (backend primary key).
    pub product_id: i64,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Tax rate in basis points at time of adding (frozen).
    pub tax_rate_bps: u32,

    /// Available stock observed at the last add/merge for this product.
    /// Quantity updates are checked against this snapshot.
    pub stock_snapshot: i64,

    /// Quantity in cart. Always > 0.
    pub quantity: i64,

    /// Fixed discount in cents subtracted from this line's total.
    pub discount_cents: i64,

    /// When this line was first added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a new line item from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            product_id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            tax_rate_bps: product.tax_rate_bps,
            stock_snapshot: product.available_stock,
            quantity,
            discount_cents: 0,
            added_at: Utc::now(),
        }
    }

    /// The frozen unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// The frozen tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Line subtotal: unit price × quantity.
    pub fn line_subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Tax for this line, rounded once at the line level.
    pub fn line_tax(&self) -> Money {
        self.line_subtotal().calculate_tax(self.tax_rate())
    }

    /// The line's discount as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Line total: subtotal + tax - discount.
    pub fn line_total(&self) -> Money {
        self.line_subtotal() + self.line_tax() - self.discount()
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The two lifecycle states of a cart.
///
/// `checkout` transitions `Open → Empty` only on confirmed success;
/// mutations keep the cart `Open` while at least one line remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    /// No line items (initial, or post-checkout/cancellation).
    Empty,
    /// At least one line item; items may be added and edited.
    Open,
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived monetary totals for a cart.
///
/// Produced fresh by [`Cart::totals`] on every call; nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Σ line subtotals.
    pub subtotal: Money,
    /// Σ line taxes.
    pub tax: Money,
    /// Σ line discounts.
    pub discount: Money,
    /// subtotal + tax - discount.
    pub total: Money,
}

impl CartTotals {
    /// All-zero totals (the empty cart).
    pub fn zero() -> Self {
        CartTotals {
            subtotal: Money::zero(),
            tax: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart ledger for one sale session.
///
/// An explicit owned value, created empty when the session starts and
/// cleared on successful checkout or cancellation. There is no process-wide
/// singleton; whatever orchestrates the checkout flow owns the cart and
/// passes it by reference.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Line items, in insertion order, unique by product id.
    items: Vec<LineItem>,

    /// Selected customer. `None` means a walk-in/anonymous sale.
    customer: Option<Customer>,

    /// When the cart was created or last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            customer: None,
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or merges into the existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases, stock snapshot
    ///   refreshes to the product's current availability
    /// - Product not in cart: new line with price/tax frozen from the
    ///   product and discount zero
    ///
    /// ## Rejections (cart unchanged)
    /// - Inactive product
    /// - Malformed catalog data (empty SKU, negative price, tax over 100%)
    /// - Quantity not positive or past [`crate::MAX_ITEM_QUANTITY`]
    /// - Resulting quantity exceeds `product.available_stock`
    /// - Cart already holds [`crate::MAX_CART_ITEMS`] unique lines
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        // The backend owns the catalog, but a corrupt record must not be
        // frozen into a line snapshot
        validate_sku(&product.sku)?;
        validate_price_cents(product.price_cents)?;
        validate_tax_rate_bps(product.tax_rate_bps)?;

        if !product.is_active {
            return Err(CoreError::ProductInactive {
                sku: product.sku.clone(),
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            validate_quantity(new_qty)?;

            if !product.can_supply(new_qty) {
                return Err(CoreError::InsufficientStock {
                    sku: product.sku.clone(),
                    available: product.available_stock,
                    requested: new_qty,
                });
            }

            item.quantity = new_qty;
            item.stock_snapshot = product.available_stock;
            return Ok(());
        }

        validate_cart_size(self.items.len())?;

        if !product.can_supply(quantity) {
            return Err(CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.available_stock,
                requested: quantity,
            });
        }

        self.items.push(LineItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: equivalent to [`Cart::remove_item`] (and therefore
    ///   a no-op when the product is absent)
    /// - Quantity above the line's stock snapshot: rejected, cart unchanged
    /// - Product not in cart with a positive quantity: error
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(CoreError::ProductNotInCart(product_id))?;

        if quantity > item.stock_snapshot {
            return Err(CoreError::InsufficientStock {
                sku: item.sku.clone(),
                available: item.stock_snapshot,
                requested: quantity,
            });
        }

        item.quantity = quantity;

        // A shrunken line must still cover its discount
        let ceiling = (item.line_subtotal() + item.line_tax()).cents();
        if item.discount_cents > ceiling {
            item.discount_cents = ceiling;
        }

        Ok(())
    }

    /// Removes the line with the given product id.
    ///
    /// A no-op (not an error) if the product is not in the cart, so the
    /// operation is idempotent.
    pub fn remove_item(&mut self, product_id: i64) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Sets a fixed discount on an existing line.
    ///
    /// The discount must be non-negative and must not exceed the line's
    /// subtotal plus tax.
    pub fn set_discount(&mut self, product_id: i64, discount_cents: i64) -> CoreResult<()> {
        validate_discount_cents(discount_cents)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(CoreError::ProductNotInCart(product_id))?;

        let ceiling = (item.line_subtotal() + item.line_tax()).cents();
        if discount_cents > ceiling {
            return Err(CoreError::DiscountExceedsLine {
                sku: item.sku.clone(),
                discount_cents,
                line_total_cents: ceiling,
            });
        }

        item.discount_cents = discount_cents;
        Ok(())
    }

    /// Replaces the selected customer. `None` makes this a walk-in sale.
    pub fn set_customer(&mut self, customer: Option<Customer>) {
        self.customer = customer;
    }

    /// Clears all line items and the selected customer.
    ///
    /// Called after a successful checkout or an explicit cancellation.
    pub fn clear(&mut self) {
        self.items.clear();
        self.customer = None;
        self.created_at = Utc::now();
    }

    /// Computes the four cart totals.
    ///
    /// Pure and derived: each call walks the current lines. Line sums
    /// accumulate exactly in integer cents; the only rounding already
    /// happened per line inside the tax calculation.
    pub fn totals(&self) -> CartTotals {
        let subtotal: Money = self.items.iter().map(LineItem::line_subtotal).sum();
        let tax: Money = self.items.iter().map(LineItem::line_tax).sum();
        let discount: Money = self.items.iter().map(LineItem::discount).sum();

        CartTotals {
            subtotal,
            tax,
            discount,
            total: subtotal + tax - discount,
        }
    }

    /// The cart's lifecycle state, derived from its contents.
    pub fn state(&self) -> CartState {
        if self.items.is_empty() {
            CartState::Empty
        } else {
            CartState::Open
        }
    }

    /// The line items, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The selected customer, if any.
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of unique line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Quantity of the given product currently in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: i64) -> i64 {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map_or(0, |i| i.quantity)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
