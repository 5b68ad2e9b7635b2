//! Gateway request and response models.
//!
//! Plain data-transfer objects mirroring the gateway's JSON schema. Field names
//! follow the wire format (`camelCase`), unknown response fields are ignored and
//! optional request fields are omitted when unset.

pub mod authentication;
pub mod billing;
pub mod card;
pub mod payment_handle;
pub mod payment_method;
pub mod wallet;

pub use authentication::{
    AuthenticationRequest, AuthenticationResponse, AuthenticationStatus,
    FinalizeAuthenticationRequest, JwtRequest, JwtResponse, SdkChallengePayload,
};
pub use billing::{BillingDetails, MerchantDescriptor, Profile, ShippingDetails};
pub use card::{CardDetails, CardExpiry};
pub use payment_handle::{
    GatewayResponse, Link, PaymentHandle, PaymentHandleRequest, PaymentHandleStatus,
    PaymentMethodRequest, ReturnLink, ReturnLinkRel, ThreeDsRequest, TransactionType,
};
pub use payment_method::{
    AccountConfiguration, PaymentMethod, PaymentMethodsResponse, PaymentType,
};
pub use wallet::{
    ApplePayPaymentToken, ApplePayRequest, PayPalRequest, PayPalShippingPreference, VenmoRequest,
};
