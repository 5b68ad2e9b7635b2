//! Venmo adapter.

use super::{WalletAdapter, WalletResult, handle_result, vendor_failure};
use crate::{
    error::Result,
    models::{PaymentHandle, PaymentMethodRequest, VenmoRequest},
};

/// Host input for a Venmo handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenmoOptions {
    /// Payer id at the merchant.
    pub consumer_id: Option<String>,
    /// Venmo profile id.
    pub profile_id: Option<String>,
    /// Venmo merchant account id.
    pub merchant_account_id: Option<String>,
}

/// What the Venmo app reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenmoVendorResult {
    /// The payer authorized; the app returned a nonce.
    Authorized {
        /// Payment method nonce.
        nonce: String,
    },
    /// The payer cancelled.
    Cancelled,
    /// The Venmo SDK reported an error.
    Error(String),
}

/// Stateless Venmo adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct VenmoAdapter;

impl WalletAdapter for VenmoAdapter {
    type Input = VenmoOptions;
    type VendorResult = VenmoVendorResult;

    fn build_request(&self, input: &VenmoOptions) -> PaymentMethodRequest {
        PaymentMethodRequest::Venmo(VenmoRequest {
            consumer_id: input.consumer_id.clone(),
            profile_id: input.profile_id.clone(),
            merchant_account_id: input.merchant_account_id.clone(),
        })
    }

    fn wallet_result(
        &self,
        handle: &Result<PaymentHandle>,
        vendor: VenmoVendorResult,
        correlation_id: &str,
    ) -> WalletResult {
        match vendor {
            VenmoVendorResult::Authorized { nonce } if nonce.is_empty() => {
                vendor_failure("Venmo", "empty payment method nonce", correlation_id)
            }
            VenmoVendorResult::Authorized { .. } => handle_result(handle, correlation_id),
            VenmoVendorResult::Cancelled => WalletResult::Cancelled,
            VenmoVendorResult::Error(message) => vendor_failure("Venmo", &message, correlation_id),
        }
    }
}
