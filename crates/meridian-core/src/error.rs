//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── CoreError        - Cart/business rule violations                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  meridian-checkout errors (separate crate)                             │
//! │  └── CheckoutError    - Submission / endpoint failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → UI message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, quantities, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every error here is recoverable by user action at the UI boundary

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to satisfy an add or quantity update.
    ///
    /// ## When This Occurs
    /// - Adding more units than the catalog has available
    /// - Raising a line's quantity past the stock snapshot
    ///
    /// The cart is left exactly as it was before the rejected call.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "COKE", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 COKE in stock"
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The product is not in the cart.
    ///
    /// Raised by `update_quantity` with a positive quantity for a product
    /// that was never added (or already removed). `remove_item` on an
    /// absent product is deliberately a no-op, not this error.
    #[error("Product {0} not in cart")]
    ProductNotInCart(i64),

    /// The product is soft-deleted in the catalog.
    #[error("Product {sku} is not available for sale")]
    ProductInactive { sku: String },

    /// Cart has exceeded maximum allowed unique items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// A line discount would exceed the line's subtotal plus tax.
    #[error("Discount {discount_cents} exceeds line total {line_total_cents} for {sku}")]
    DiscountExceedsLine {
        sku: String,
        discount_cents: i64,
        line_total_cents: i64,
    },

    /// Checkout attempted with zero line items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "COKE-330".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for COKE-330: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
