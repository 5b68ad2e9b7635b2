//! Apple Pay adapter.
//!
//! Apple Pay rides on card accounts: the handle request carries
//! `paymentType = CARD` plus an `applePay` sub-object wrapping the wallet token.

use super::{WalletAdapter, WalletResult, payable_result, vendor_failure};
use crate::{
    error::Result,
    models::{
        ApplePayPaymentToken, ApplePayRequest, BillingDetails, PaymentHandle,
        PaymentMethodRequest, Profile,
    },
};

/// Card information Apple Pay exposes about the selected card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplePayPaymentMethod {
    /// Display name such as `Visa 1234`.
    pub display_name: Option<String>,
    /// Network such as `Visa`.
    pub network: Option<String>,
    /// `debit`, `credit`, `prepaid` or `store`.
    pub card_type: Option<String>,
}

/// Billing contact returned by the payment sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplePayContact {
    /// Given name.
    pub given_name: Option<String>,
    /// Family name.
    pub family_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Street lines.
    pub street_lines: Vec<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<String>,
}

/// Authorization produced by the payment sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplePayAuthorization {
    /// Label the sheet was shown with.
    pub label: String,
    /// Whether the sheet asked for a billing address.
    pub request_billing_address: bool,
    /// Wallet transaction identifier.
    pub transaction_identifier: String,
    /// Base64 of the encrypted payment data.
    pub payment_data: String,
    /// Selected card.
    pub payment_method: ApplePayPaymentMethod,
    /// Billing contact, when requested.
    pub billing_contact: Option<ApplePayContact>,
}

/// How the payment sheet was dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplePaySheetResult {
    /// The payer authorized the payment.
    Authorized,
    /// The payer closed the sheet.
    Cancelled,
    /// The sheet reported an error.
    Failed(String),
}

/// Stateless Apple Pay adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplePayAdapter;

impl ApplePayAdapter {
    /// Billing details from the sheet's billing contact.
    ///
    /// Returns `None` without a contact, or when the contact lacks the country
    /// or postal code the gateway requires.
    #[must_use]
    pub fn billing_details(&self, input: &ApplePayAuthorization) -> Option<BillingDetails> {
        let contact = input.billing_contact.as_ref()?;
        Some(BillingDetails {
            street: contact.street_lines.first().cloned(),
            street2: contact.street_lines.get(1).cloned(),
            city: contact.city.clone(),
            state: contact.state.clone(),
            country: contact.country_code.as_ref()?.to_ascii_uppercase(),
            zip: contact.postal_code.clone()?,
            phone: contact.phone.clone(),
            nick_name: None,
        })
    }

    /// Payer profile from the sheet's billing contact.
    #[must_use]
    pub fn profile(&self, input: &ApplePayAuthorization) -> Option<Profile> {
        let contact = input.billing_contact.as_ref()?;
        Some(Profile {
            first_name: contact.given_name.clone(),
            last_name: contact.family_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            locale: None,
        })
    }
}

impl WalletAdapter for ApplePayAdapter {
    type Input = ApplePayAuthorization;
    type VendorResult = ApplePaySheetResult;

    fn build_request(&self, input: &ApplePayAuthorization) -> PaymentMethodRequest {
        PaymentMethodRequest::ApplePay(ApplePayRequest {
            label: input.label.clone(),
            request_billing_address: input.request_billing_address,
            apple_pay_payment_token: ApplePayPaymentToken {
                transaction_identifier: input.transaction_identifier.clone(),
                payment_data: input.payment_data.clone(),
                display_name: input.payment_method.display_name.clone(),
                network: input.payment_method.network.clone(),
                card_type: input.payment_method.card_type.clone(),
            },
        })
    }

    fn wallet_result(
        &self,
        handle: &Result<PaymentHandle>,
        vendor: ApplePaySheetResult,
        correlation_id: &str,
    ) -> WalletResult {
        match vendor {
            ApplePaySheetResult::Authorized => payable_result(handle, correlation_id),
            ApplePaySheetResult::Cancelled => WalletResult::Cancelled,
            ApplePaySheetResult::Failed(message) => {
                vendor_failure("Apple Pay", &message, correlation_id)
            }
        }
    }
}
