//! 3-D Secure authentication.
//!
//! - [`AuthenticationEngine`]: the vendor engine contract
//! - [`ChallengeCompletion`]: single-fire result channel handed to the engine
//! - [`ThreeDsBridge`]: state machine over one attempt
//! - [`decode_challenge_payload`]: base64/JSON challenge payload decoding

pub mod bridge;
pub mod challenge;
pub mod engine;
pub mod options;

pub use bridge::{AuthenticationOutcome, AuthenticationResult, BridgeState, ThreeDsBridge};
pub use challenge::decode_challenge_payload;
pub use engine::{AuthenticationEngine, ChallengeCompletion, ChallengeOutcome, EngineError};
pub use options::{ChallengePreference, ResolvedThreeDsOptions, ThreeDsOptions};
