//! Tokenization orchestrator.
//!
//! Turns [`TokenizeOptions`] into a payment handle: client-side validation,
//! payment method resolution, handle creation and, for cards with
//! [`ThreeDsOptions`](crate::threeds::ThreeDsOptions), 3-D Secure
//! authentication. Every step is reported to an
//! [`EventSink`](crate::events::EventSink).

pub mod observer;
pub mod options;
pub mod orchestrator;

pub use observer::TokenizeObserver;
pub use options::{PaymentMethodOptions, TokenizeOptions};
pub use orchestrator::Tokenizer;
