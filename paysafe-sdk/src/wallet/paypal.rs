//! PayPal adapter.

use super::{WalletAdapter, WalletResult, handle_result, vendor_failure};
use crate::{
    error::Result,
    models::{PayPalRequest, PayPalShippingPreference, PaymentHandle, PaymentMethodRequest},
};

/// Host input for a PayPal handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayPalOptions {
    /// Payer's PayPal account id.
    pub consumer_id: Option<String>,
    /// Order description shown by PayPal.
    pub order_description: Option<String>,
    /// Recipient description.
    pub recipient_description: Option<String>,
    /// Shipping preference.
    pub shipping_preference: Option<PayPalShippingPreference>,
}

/// What the PayPal checkout reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayPalVendorResult {
    /// The payer approved the order.
    Approved {
        /// Order the payer approved.
        order_id: String,
    },
    /// The payer cancelled.
    Cancelled,
    /// The PayPal SDK reported an error.
    Error(String),
}

/// Stateless PayPal adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayPalAdapter;

impl WalletAdapter for PayPalAdapter {
    type Input = PayPalOptions;
    type VendorResult = PayPalVendorResult;

    fn build_request(&self, input: &PayPalOptions) -> PaymentMethodRequest {
        PaymentMethodRequest::Paypal(PayPalRequest {
            consumer_id: input.consumer_id.clone(),
            order_description: input.order_description.clone(),
            recipient_description: input.recipient_description.clone(),
            shipping_preference: input.shipping_preference,
        })
    }

    /// An approval only counts for the order the gateway created for this handle.
    fn wallet_result(
        &self,
        handle: &Result<PaymentHandle>,
        vendor: PayPalVendorResult,
        correlation_id: &str,
    ) -> WalletResult {
        match vendor {
            PayPalVendorResult::Approved { order_id } => {
                let expected = handle
                    .as_ref()
                    .ok()
                    .and_then(|h| h.gateway_response.as_ref())
                    .and_then(|g| g.order_id.as_deref());
                match expected {
                    Some(expected) if expected != order_id => vendor_failure(
                        "PayPal",
                        &format!("approved order {order_id} does not match {expected}"),
                        correlation_id,
                    ),
                    _ => handle_result(handle, correlation_id),
                }
            }
            PayPalVendorResult::Cancelled => WalletResult::Cancelled,
            PayPalVendorResult::Error(message) => vendor_failure("PayPal", &message, correlation_id),
        }
    }
}
