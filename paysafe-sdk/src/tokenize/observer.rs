//! Result delivery for flows running in the background.

use crate::{error::Result, models::PaymentHandle};

/// Receives the result of a flow started with
/// [`Tokenizer::spawn_tokenize`](super::Tokenizer::spawn_tokenize).
///
/// The tokenizer only holds a `Weak` reference: once the host drops its last
/// `Arc`, results still in flight are discarded.
pub trait TokenizeObserver: Send + Sync {
    /// Called once with the final result.
    fn on_result(&self, result: Result<PaymentHandle>);
}
