//! Checkout orchestration state machine.
//!
//! ```text
//! Editing -> Validating -> Submitting -> Succeeded
//!    ^           |              |
//!    +-----------+              +-----> Failed -> (edit or resubmit)
//! ```
//!
//! Submission is split in two so the gateway call can happen anywhere:
//! [`Checkout::begin_submission`] validates and builds the request, and
//! [`Checkout::complete_submission`] applies the gateway's answer.
//! [`Checkout::submit`] runs both around a gateway call.

use crate::cart::{CartLine, CartStore};
use crate::checkout::relay::{compose_summary, DeepLink, RelayChannel, DEFAULT_RELAY_ENDPOINT};
use crate::checkout::{CheckoutForm, FormField, OrderItem, OrderRequest, ValidationErrors};
use crate::error::CommerceError;
use crate::gateway::StoreGateway;
use crate::ids::OrderId;

/// Notice shown for any gateway failure.
pub const FAILURE_NOTICE: &str = "Failed to place order. Please try again.";

/// Where the checkout is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Shopper is filling in the form.
    Editing,
    /// Local checks are running.
    Validating,
    /// Waiting on the gateway. Further submissions are rejected.
    Submitting,
    /// The gateway created an order.
    Succeeded(OrderId),
    /// The gateway refused or failed; the shopper may retry.
    Failed,
}

impl CheckoutPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutPhase::Editing => "editing",
            CheckoutPhase::Validating => "validating",
            CheckoutPhase::Submitting => "submitting",
            CheckoutPhase::Succeeded(_) => "succeeded",
            CheckoutPhase::Failed => "failed",
        }
    }
}

/// Which submit affordance the shopper used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Place the order and show the confirmation.
    Direct,
    /// Place the order, then forward a summary through the relay channel.
    Relay,
}

/// A view the checkout asks the presentation layer to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Catalog,
    OrderConfirmation(OrderId),
}

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub order_id: OrderId,
    pub mode: SubmitMode,
    pub navigation: Navigation,
    /// Link handed to the relay channel, for [`SubmitMode::Relay`].
    pub relay_link: Option<DeepLink>,
}

/// A validated submission waiting for the gateway's answer.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    request: OrderRequest,
    lines: Vec<CartLine>,
    form: CheckoutForm,
    mode: SubmitMode,
}

impl PendingSubmission {
    /// Request to send to `create_order`.
    pub fn request(&self) -> &OrderRequest {
        &self.request
    }

    pub fn mode(&self) -> SubmitMode {
        self.mode
    }
}

/// Checkout orchestrator for one shopper session.
#[derive(Debug)]
pub struct Checkout {
    form: CheckoutForm,
    errors: ValidationErrors,
    phase: CheckoutPhase,
    notice: Option<&'static str>,
    relay_endpoint: String,
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkout {
    /// Create a checkout with an empty form.
    pub fn new() -> Self {
        Self {
            form: CheckoutForm::default(),
            errors: ValidationErrors::default(),
            phase: CheckoutPhase::Editing,
            notice: None,
            relay_endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
        }
    }

    /// Use a different messaging endpoint for relay handoff.
    pub fn with_relay_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.relay_endpoint = endpoint.into();
        self
    }

    /// Prefill the form.
    pub fn with_form(mut self, form: CheckoutForm) -> Self {
        self.form = form;
        self
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Field errors from the last validation, minus fields edited since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Failure notice to show, if the last submission failed.
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Whether submit affordances should be disabled.
    pub fn is_submitting(&self) -> bool {
        self.phase == CheckoutPhase::Submitting
    }

    /// Where to send a shopper arriving at checkout.
    ///
    /// An empty cart goes back to the catalog unless an order was just placed.
    pub fn entry_route(&self, cart: &CartStore) -> Option<Navigation> {
        match self.phase {
            CheckoutPhase::Succeeded(_) => None,
            _ if cart.is_empty() => Some(Navigation::Catalog),
            _ => None,
        }
    }

    /// Edit one field. Clears that field's error only.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
        self.errors.clear(field);
        if self.phase == CheckoutPhase::Failed {
            self.phase = CheckoutPhase::Editing;
        }
    }

    /// Validate and build the order request.
    ///
    /// Fails with [`CommerceError::SubmissionInProgress`] while a previous
    /// submission is pending, [`CommerceError::EmptyCart`] when there is
    /// nothing to order, and [`CommerceError::Validation`] (returning to
    /// `Editing`) when a field is missing or malformed.
    pub fn begin_submission(
        &mut self,
        cart: &CartStore,
        mode: SubmitMode,
    ) -> Result<PendingSubmission, CommerceError> {
        if self.phase == CheckoutPhase::Submitting {
            return Err(CommerceError::SubmissionInProgress);
        }
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        self.phase = CheckoutPhase::Validating;
        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            self.phase = CheckoutPhase::Editing;
            tracing::debug!(fields = self.errors.len(), "checkout form invalid");
            return Err(CommerceError::Validation(self.errors.clone()));
        }

        let request = OrderRequest {
            customer_name: self.form.name.clone(),
            email: self.form.email.clone(),
            shipping_address: self.form.shipping_address(),
            items: cart.lines().iter().map(OrderItem::from).collect(),
        };

        self.phase = CheckoutPhase::Submitting;
        self.notice = None;
        Ok(PendingSubmission {
            request,
            lines: cart.lines().to_vec(),
            form: self.form.clone(),
            mode,
        })
    }

    /// Abandon a pending submission before the gateway is called.
    ///
    /// Returns to `Editing` with the form and cart untouched.
    pub fn cancel_submission(&mut self, pending: PendingSubmission) {
        if self.phase == CheckoutPhase::Submitting {
            self.phase = CheckoutPhase::Editing;
        }
        tracing::debug!(items = pending.lines.len(), "order submission cancelled");
    }

    /// Apply the gateway's answer to a pending submission.
    ///
    /// On success the cart is cleared (whatever it holds by now) and, for
    /// relay submissions, the summary link is dispatched without waiting.
    /// On failure the cart and form are left as they are.
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        result: Result<OrderId, CommerceError>,
        cart: &mut CartStore,
        relay: &dyn RelayChannel,
    ) -> Result<CheckoutOutcome, CommerceError> {
        let order_id = match result {
            Ok(order_id) => order_id,
            Err(e) => {
                tracing::error!(error = %e, "order submission failed");
                self.phase = CheckoutPhase::Failed;
                self.notice = Some(FAILURE_NOTICE);
                return Err(e);
            }
        };

        cart.clear_cart();
        self.phase = CheckoutPhase::Succeeded(order_id);
        tracing::info!(%order_id, items = pending.lines.len(), "order placed");

        let relay_link = match pending.mode {
            SubmitMode::Direct => None,
            SubmitMode::Relay => {
                let summary = compose_summary(order_id, &pending.lines, &pending.form);
                let link = DeepLink::new(&self.relay_endpoint, &summary);
                relay.dispatch(&link);
                Some(link)
            }
        };

        Ok(CheckoutOutcome {
            order_id,
            mode: pending.mode,
            navigation: Navigation::OrderConfirmation(order_id),
            relay_link,
        })
    }

    /// Validate, call `create_order` once, and apply the result.
    pub async fn submit<G>(
        &mut self,
        cart: &mut CartStore,
        gateway: &G,
        mode: SubmitMode,
        relay: &dyn RelayChannel,
    ) -> Result<CheckoutOutcome, CommerceError>
    where
        G: StoreGateway + ?Sized,
    {
        let pending = self.begin_submission(cart, mode)?;
        let result = gateway.create_order(pending.request()).await;
        self.complete_submission(pending, result, cart, relay)
    }
}
