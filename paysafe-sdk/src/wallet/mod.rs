//! Wallet and alternative payment method adapters.
//!
//! Each adapter translates between one vendor's vocabulary and this crate's
//! models in both directions:
//!
//! - [`WalletAdapter::build_request`] turns host input into the
//!   [`PaymentMethodRequest`] sub-object of a payment handle request
//! - [`WalletAdapter::wallet_result`] combines the gateway outcome with the
//!   vendor UI outcome into the [`WalletResult`] reported to the host
//!
//! Adapters are stateless: every call is a pure field-by-field translation.

use crate::{
    error::{ErrorKind, PaysafeError, Result},
    models::{PaymentHandle, PaymentHandleStatus, PaymentMethodRequest},
};

pub mod apple_pay;
pub mod paypal;
pub mod venmo;

pub use apple_pay::{
    ApplePayAdapter, ApplePayAuthorization, ApplePayContact, ApplePayPaymentMethod,
    ApplePaySheetResult,
};
pub use paypal::{PayPalAdapter, PayPalOptions, PayPalVendorResult};
pub use venmo::{VenmoAdapter, VenmoOptions, VenmoVendorResult};

/// Outcome of a wallet flow as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletResult {
    /// The instrument is tokenized and ready.
    Success {
        /// Token to charge.
        payment_handle_token: String,
    },
    /// The gateway or the vendor failed.
    Failed(PaysafeError),
    /// The payer backed out.
    Cancelled,
}

/// Translation between a vendor and the gateway models.
pub trait WalletAdapter {
    /// Host-provided input for the request sub-object.
    type Input;
    /// What the vendor UI reported.
    type VendorResult;

    /// Builds the request sub-object.
    fn build_request(&self, input: &Self::Input) -> PaymentMethodRequest;

    /// Combines the gateway outcome and the vendor outcome.
    fn wallet_result(
        &self,
        handle: &Result<PaymentHandle>,
        vendor: Self::VendorResult,
        correlation_id: &str,
    ) -> WalletResult;
}

/// Shared success path: a usable handle yields its token, anything else fails.
fn handle_result(handle: &Result<PaymentHandle>, correlation_id: &str) -> WalletResult {
    match handle {
        Ok(handle) if handle.status.is_terminal_failure() => WalletResult::Failed(
            PaysafeError::new(
                ErrorKind::GenericApi {
                    code: 0,
                    raw_code: String::new(),
                    message: format!("payment handle {}", handle.status),
                },
                correlation_id,
            ),
        ),
        Ok(handle) => {
            WalletResult::Success { payment_handle_token: handle.payment_handle_token.clone() }
        }
        Err(e) => WalletResult::Failed(e.clone()),
    }
}

/// Success path for card-backed wallets: only a `PAYABLE` handle can be charged.
fn payable_result(handle: &Result<PaymentHandle>, correlation_id: &str) -> WalletResult {
    match handle {
        Ok(handle) if handle.status != PaymentHandleStatus::Payable => {
            WalletResult::Failed(PaysafeError::new(
                ErrorKind::GenericApi {
                    code: 0,
                    raw_code: String::new(),
                    message: format!("payment handle {} is not payable", handle.status),
                },
                correlation_id,
            ))
        }
        _ => handle_result(handle, correlation_id),
    }
}

/// Wraps a vendor-side failure message.
fn vendor_failure(vendor: &str, message: &str, correlation_id: &str) -> WalletResult {
    WalletResult::Failed(PaysafeError::new(
        ErrorKind::GenericApi { code: 0, raw_code: String::new(), message: format!("{vendor}: {message}") },
        correlation_id,
    ))
}
