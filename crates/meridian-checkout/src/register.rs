//! # Register
//!
//! One sale session: owns the cart, exposes its mutation surface, and
//! orchestrates checkout against a [`SalesApi`].
//!
//! ## Checkout State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Register Checkout States                            │
//! │                                                                         │
//! │        ┌────────┐    checkout() started     ┌──────────────────┐        │
//! │        │  Idle  │ ─────────────────────────►│ CheckoutPending  │        │
//! │        └────────┘                           └──────────────────┘        │
//! │            ▲                                        │                   │
//! │            │     ack / rejection / transport error  │                   │
//! │            └────────────────────────────────────────┘                   │
//! │                                                                         │
//! │  While CheckoutPending, a second checkout() is rejected with            │
//! │  CheckoutInProgress - nothing is queued and nothing races.              │
//! │                                                                         │
//! │  Cart effect per outcome:                                               │
//! │    acknowledged success ──► cart.clear()  (Open → Empty, walk-in)       │
//! │    rejection / failure  ──► cart untouched, cashier retries manually    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info, warn};

use meridian_core::cart::{Cart, CartState, CartTotals};
use meridian_core::error::{CoreError, CoreResult};
use meridian_core::types::{Customer, PaymentMethod, Product};

use crate::api::SalesApi;
use crate::error::{CheckoutError, CheckoutResult};
use crate::payload::{SaleAck, SaleRequest};

// =============================================================================
// Register State
// =============================================================================

/// Whether a checkout is currently awaiting the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterState {
    /// No submission in flight; the cart may be mutated and checked out.
    Idle,
    /// A submission is awaiting acknowledgement.
    CheckoutPending,
}

/// Marks the register pending for the lifetime of one submission.
///
/// Restores `Idle` on drop, which covers every exit from `checkout`:
/// acknowledgement, rejection, transport failure, and a future dropped
/// mid-await (e.g. a UI-side timeout). Without the drop path a cancelled
/// checkout would leave the register answering `CheckoutInProgress`
/// forever.
struct PendingGuard<'a> {
    state: &'a mut RegisterState,
}

impl<'a> PendingGuard<'a> {
    fn arm(state: &'a mut RegisterState) -> Self {
        *state = RegisterState::CheckoutPending;
        PendingGuard { state }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.state = RegisterState::Idle;
    }
}

// =============================================================================
// Register
// =============================================================================

/// A register drives exactly one cart for its lifetime.
///
/// There is no shared mutable state between registers; each sale session
/// owns its cart exclusively, so no locking is needed here. Callers that
/// share a register across tasks wrap it in their own synchronization.
#[derive(Debug)]
pub struct Register<S: SalesApi> {
    cart: Cart,
    api: S,
    state: RegisterState,
}

impl<S: SalesApi> Register<S> {
    /// Creates a register with an empty cart.
    pub fn new(api: S) -> Self {
        Register {
            cart: Cart::new(),
            api,
            state: RegisterState::Idle,
        }
    }

    // =========================================================================
    // Cart surface
    // =========================================================================
    // Thin pass-throughs so the UI layer talks to one object per session.

    /// Read access to the cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds a product to the cart. See [`Cart::add_item`].
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        debug!(product_id = product.id, quantity, "add_item");
        self.cart.add_item(product, quantity)
    }

    /// Sets a line's quantity. See [`Cart::update_quantity`].
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        debug!(product_id, quantity, "update_quantity");
        self.cart.update_quantity(product_id, quantity)
    }

    /// Removes a line. See [`Cart::remove_item`].
    pub fn remove_item(&mut self, product_id: i64) {
        debug!(product_id, "remove_item");
        self.cart.remove_item(product_id);
    }

    /// Sets a line discount. See [`Cart::set_discount`].
    pub fn set_discount(&mut self, product_id: i64, discount_cents: i64) -> CoreResult<()> {
        debug!(product_id, discount_cents, "set_discount");
        self.cart.set_discount(product_id, discount_cents)
    }

    /// Replaces the selected customer.
    pub fn set_customer(&mut self, customer: Option<Customer>) {
        self.cart.set_customer(customer);
    }

    /// Current cart totals.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Abandons the sale: clears the cart without submitting anything.
    pub fn cancel(&mut self) {
        info!("Sale cancelled, cart cleared");
        self.cart.clear();
    }

    /// Whether a submission is in flight.
    pub fn state(&self) -> RegisterState {
        self.state
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Submits the cart as a sale.
    ///
    /// ## Preconditions
    /// - No checkout already pending ([`CheckoutError::CheckoutInProgress`])
    /// - Cart non-empty ([`CoreError::EmptyCart`], checked before any
    ///   network activity)
    ///
    /// ## Outcome
    /// - Acknowledged success: cart cleared (customer included), the ack
    ///   with the created sale id is returned
    /// - Application rejection or transport failure: cart left intact so
    ///   the cashier can correct and resubmit; never retried automatically
    pub async fn checkout(
        &mut self,
        payment_method: PaymentMethod,
        cashier_id: i64,
    ) -> CheckoutResult<SaleAck> {
        if self.state == RegisterState::CheckoutPending {
            warn!("Checkout attempted while another is pending");
            return Err(CheckoutError::CheckoutInProgress);
        }

        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let request = SaleRequest::from_cart(&self.cart, payment_method, cashier_id);
        debug!(
            cashier_id,
            payment_method = %payment_method,
            items = request.items.len(),
            total = %request.total_amount,
            "Starting checkout"
        );

        let guard = PendingGuard::arm(&mut self.state);
        let result = self.api.submit_sale(&request).await;
        drop(guard);

        match result {
            Ok(ack) if ack.success => {
                info!(sale_id = ?ack.sale_id, total = %request.total_amount, "Sale recorded");
                self.cart.clear();
                debug_assert_eq!(self.cart.state(), CartState::Empty);
                Ok(ack)
            }
            Ok(ack) => {
                let message = ack
                    .error
                    .unwrap_or_else(|| "no reason given".to_string());
                warn!(message = %message, "Sale rejected, cart preserved");
                Err(CheckoutError::Rejected { message })
            }
            Err(e) => {
                warn!(error = %e, "Sale submission failed, cart preserved");
                Err(e)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use meridian_core::types::Product;

    /// What the fake endpoint should answer with.
    enum Outcome {
        Ack(SaleAck),
        TransportError,
        /// Never answers; for exercising in-flight behavior.
        Stall,
    }

    /// In-process [`SalesApi`] double recording every request it sees.
    struct FakeSalesApi {
        outcome: Outcome,
        requests: Mutex<Vec<SaleRequest>>,
    }

    impl FakeSalesApi {
        fn answering(outcome: Outcome) -> Self {
            FakeSalesApi {
                outcome,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last_request(&self) -> SaleRequest {
            self.requests.lock().unwrap().last().unwrap().clone()
        }
    }

    impl SalesApi for FakeSalesApi {
        async fn submit_sale(&self, request: &SaleRequest) -> CheckoutResult<SaleAck> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.outcome {
                Outcome::Ack(ack) => Ok(ack.clone()),
                Outcome::TransportError => Err(CheckoutError::UnexpectedStatus { status: 503 }),
                Outcome::Stall => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    fn test_product(id: i64, price_cents: i64, tax_rate_bps: u32, stock: i64) -> Product {
        Product::new(
            id,
            format!("SKU-{}", id),
            format!("Product {}", id),
            price_cents,
            tax_rate_bps,
            stock,
        )
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart() {
        let api = FakeSalesApi::answering(Outcome::Ack(SaleAck::recorded(991)));
        let mut register = Register::new(api);

        register.add_item(&test_product(1, 1000, 800, 10), 2).unwrap();
        register.set_customer(Some(Customer::new(12, "Ada")));

        let ack = register.checkout(PaymentMethod::Card, 3).await.unwrap();

        assert_eq!(ack.sale_id, Some(991));
        assert!(register.cart().is_empty());
        assert!(register.cart().customer().is_none());
        assert_eq!(register.cart().state(), CartState::Empty);
        assert_eq!(register.totals(), CartTotals::zero());
        assert_eq!(register.state(), RegisterState::Idle);
    }

    #[tokio::test]
    async fn test_checkout_payload_matches_cart() {
        let api = FakeSalesApi::answering(Outcome::Ack(SaleAck::recorded(1)));
        let mut register = Register::new(api);

        register.add_item(&test_product(1, 1000, 800, 10), 2).unwrap();
        register.add_item(&test_product(2, 500, 0, 10), 1).unwrap();
        register.set_discount(2, 50).unwrap();

        register.checkout(PaymentMethod::Mobile, 7).await.unwrap();

        let request = register.api.last_request();
        assert_eq!(request.cashier_id, 7);
        assert_eq!(request.customer_id, None); // Walk-in
        assert_eq!(request.payment_method, PaymentMethod::Mobile);
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.subtotal_amount.cents(), 2500);
        assert_eq!(request.tax_amount.cents(), 160);
        assert_eq!(request.discount_amount.cents(), 50);
        assert_eq!(request.total_amount.cents(), 2610);
    }

    #[tokio::test]
    async fn test_empty_cart_checkout_rejected_without_network_call() {
        let api = FakeSalesApi::answering(Outcome::Ack(SaleAck::recorded(1)));
        let mut register = Register::new(api);

        let err = register.checkout(PaymentMethod::Cash, 3).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Cart(CoreError::EmptyCart)));
        assert_eq!(register.api.request_count(), 0);
        assert_eq!(register.cart().state(), CartState::Empty);
    }

    #[tokio::test]
    async fn test_rejected_sale_preserves_cart() {
        let api = FakeSalesApi::answering(Outcome::Ack(SaleAck::rejected("cashier unknown")));
        let mut register = Register::new(api);

        register.add_item(&test_product(1, 1000, 0, 10), 1).unwrap();
        let before = register.totals();

        let err = register.checkout(PaymentMethod::Card, 99).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Rejected { .. }));
        assert_eq!(register.totals(), before);
        assert_eq!(register.cart().state(), CartState::Open);
        assert_eq!(register.state(), RegisterState::Idle); // Can retry
    }

    #[tokio::test]
    async fn test_transport_failure_preserves_cart() {
        let api = FakeSalesApi::answering(Outcome::TransportError);
        let mut register = Register::new(api);

        register.add_item(&test_product(1, 1000, 0, 10), 1).unwrap();

        let err = register.checkout(PaymentMethod::Card, 3).await.unwrap_err();

        assert!(matches!(err, CheckoutError::UnexpectedStatus { status: 503 }));
        assert_eq!(register.cart().item_count(), 1);
        assert_eq!(register.state(), RegisterState::Idle);
    }

    #[tokio::test]
    async fn test_retry_after_failure_succeeds() {
        // First register sees a transport failure; the same cart contents
        // then go through a healthy endpoint untouched.
        let api = FakeSalesApi::answering(Outcome::TransportError);
        let mut register = Register::new(api);
        register.add_item(&test_product(1, 1000, 0, 10), 1).unwrap();
        assert!(register.checkout(PaymentMethod::Card, 3).await.is_err());

        register.api = FakeSalesApi::answering(Outcome::Ack(SaleAck::recorded(5)));
        let ack = register.checkout(PaymentMethod::Card, 3).await.unwrap();
        assert_eq!(ack.sale_id, Some(5));
        assert!(register.cart().is_empty());
    }

    #[tokio::test]
    async fn test_second_checkout_while_pending_is_rejected() {
        let api = FakeSalesApi::answering(Outcome::Ack(SaleAck::recorded(1)));
        let mut register = Register::new(api);
        register.add_item(&test_product(1, 1000, 0, 10), 1).unwrap();

        // Simulate an in-flight submission
        register.state = RegisterState::CheckoutPending;

        let err = register.checkout(PaymentMethod::Card, 3).await.unwrap_err();
        assert!(matches!(err, CheckoutError::CheckoutInProgress));
        assert_eq!(register.api.request_count(), 0);
        assert_eq!(register.cart().item_count(), 1);
    }

    #[test]
    fn test_dropped_checkout_future_releases_pending_state() {
        use std::future::Future;
        use std::pin::pin;
        use std::sync::Arc;
        use std::task::{Context, Poll, Wake, Waker};

        struct NoopWaker;
        impl Wake for NoopWaker {
            fn wake(self: Arc<Self>) {}
        }

        let api = FakeSalesApi::answering(Outcome::Stall);
        let mut register = Register::new(api);
        register.add_item(&test_product(1, 1000, 0, 10), 1).unwrap();

        let waker: Waker = Arc::new(NoopWaker).into();
        let mut cx = Context::from_waker(&waker);
        {
            let mut fut = pin!(register.checkout(PaymentMethod::Card, 3));
            assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Pending));
        } // Future dropped mid-await, as a UI timeout would

        // The register must not be stuck reporting CheckoutInProgress
        assert_eq!(register.state(), RegisterState::Idle);
        assert_eq!(register.cart().item_count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_clears_without_submitting() {
        let api = FakeSalesApi::answering(Outcome::Ack(SaleAck::recorded(1)));
        let mut register = Register::new(api);

        register.add_item(&test_product(1, 1000, 0, 10), 2).unwrap();
        register.cancel();

        assert!(register.cart().is_empty());
        assert_eq!(register.api.request_count(), 0);
    }
}
