//! Input of a tokenize flow.

use crate::{
    currency,
    error::{ErrorKind, PaysafeError, Result},
    models::{
        BillingDetails, CardDetails, MerchantDescriptor, PaymentType, Profile, ReturnLink,
        ShippingDetails, TransactionType,
    },
    threeds::ThreeDsOptions,
    wallet::{ApplePayAuthorization, PayPalOptions, VenmoOptions},
};

/// Instrument to tokenize.
#[derive(Debug, Clone)]
pub enum PaymentMethodOptions {
    /// Raw card, optionally with 3-D Secure.
    Card {
        /// Card data.
        card: CardDetails,
        /// Present to run 3-D Secure on this card.
        three_ds: Option<ThreeDsOptions>,
    },
    /// Apple Pay authorization from the payment sheet.
    ApplePay(ApplePayAuthorization),
    /// PayPal.
    PayPal(PayPalOptions),
    /// Venmo.
    Venmo(VenmoOptions),
}

impl PaymentMethodOptions {
    /// Payment type the merchant account must be configured for.
    #[must_use]
    pub const fn payment_type(&self) -> PaymentType {
        match self {
            Self::Card { .. } | Self::ApplePay(_) => PaymentType::Card,
            Self::PayPal(_) => PaymentType::Paypal,
            Self::Venmo(_) => PaymentType::Venmo,
        }
    }

    /// Short name used in logs and events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Card { .. } => "card",
            Self::ApplePay(_) => "apple_pay",
            Self::PayPal(_) => "paypal",
            Self::Venmo(_) => "venmo",
        }
    }
}

/// Everything a host provides to tokenize one instrument.
///
/// # Examples
///
/// ```
/// use paysafe_sdk::{
///     models::{CardDetails, CardExpiry},
///     tokenize::{PaymentMethodOptions, TokenizeOptions},
/// };
///
/// let options = TokenizeOptions::new(
///     1000,
///     "USD",
///     "order-42",
///     "1001456650",
///     PaymentMethodOptions::Card {
///         card: CardDetails {
///             card_num: "4111111111111111".to_owned(),
///             card_expiry: CardExpiry { month: 12, year: 2030 },
///             cvv: Some("123".to_owned()),
///             holder_name: None,
///         },
///         three_ds: None,
///     },
/// );
/// assert!(options.validate("corr-1").is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TokenizeOptions {
    /// Amount in minor units.
    pub amount: u64,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Merchant reference, unique per attempt.
    pub merchant_ref_num: String,
    /// Merchant account to tokenize on.
    pub account_id: String,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Billing address.
    pub billing_details: Option<BillingDetails>,
    /// Payer profile.
    pub profile: Option<Profile>,
    /// Shipping address.
    pub shipping_details: Option<ShippingDetails>,
    /// Statement descriptor.
    pub merchant_descriptor: Option<MerchantDescriptor>,
    /// Redirect targets for wallet flows.
    pub return_links: Vec<ReturnLink>,
    /// Instrument.
    pub payment_method: PaymentMethodOptions,
    /// Flow id. A UUID v4 is generated when absent.
    pub correlation_id: Option<String>,
}

impl TokenizeOptions {
    /// Creates options with the required fields and a `PAYMENT` transaction.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(
        amount: u64,
        currency_code: impl Into<String>,
        merchant_ref_num: impl Into<String>,
        account_id: impl Into<String>,
        payment_method: PaymentMethodOptions,
    ) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
            merchant_ref_num: merchant_ref_num.into(),
            account_id: account_id.into(),
            transaction_type: TransactionType::Payment,
            billing_details: None,
            profile: None,
            shipping_details: None,
            merchant_descriptor: None,
            return_links: Vec::new(),
            payment_method,
            correlation_id: None,
        }
    }

    /// Sets the billing address.
    #[must_use]
    pub fn with_billing_details(mut self, billing: BillingDetails) -> Self {
        self.billing_details = Some(billing);
        self
    }

    /// Sets the correlation id.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Client-side validation run before any request.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidAmount`] for a zero amount outside verification
    /// - [`ErrorKind::InvalidCurrencyCode`] for a malformed currency code
    /// - [`ErrorKind::InvalidCountry`] for a billing country that is not ISO 3166-1 alpha-2
    /// - [`ErrorKind::InvalidParameter`] for empty identifiers or invalid card data
    pub fn validate(&self, correlation_id: &str) -> Result<()> {
        let fail = |kind| Err(PaysafeError::new(kind, correlation_id));

        if self.amount == 0 && self.transaction_type != TransactionType::Verification {
            return fail(ErrorKind::InvalidAmount);
        }
        if currency::exponent(&self.currency_code).is_err() {
            return fail(ErrorKind::InvalidCurrencyCode);
        }
        if self.merchant_ref_num.trim().is_empty() {
            return fail(ErrorKind::InvalidParameter("merchantRefNum is empty".to_owned()));
        }
        if self.account_id.trim().is_empty() {
            return fail(ErrorKind::InvalidParameter("accountId is empty".to_owned()));
        }
        if let Some(billing) = &self.billing_details
            && !is_country_code(&billing.country)
        {
            return fail(ErrorKind::InvalidCountry);
        }

        match &self.payment_method {
            PaymentMethodOptions::Card { card, .. } => {
                if let Err(field) = card.validate() {
                    return fail(ErrorKind::InvalidParameter(format!("{field} is invalid")));
                }
            }
            PaymentMethodOptions::ApplePay(authorization) => {
                if authorization.payment_data.is_empty() {
                    return fail(ErrorKind::InvalidParameter(
                        "applePay.paymentData is empty".to_owned(),
                    ));
                }
            }
            PaymentMethodOptions::PayPal(_) | PaymentMethodOptions::Venmo(_) => {}
        }
        Ok(())
    }
}

fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}
