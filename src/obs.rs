//! Optional observability helpers for handshake attempts.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to run every attempt inside an `oauth2_handshake.attempt` span
//!   carrying the provider `host`, and to emit events for open failures, verdicts, and
//!   delivered outcomes.
//! - Enable `metrics` to increment the `oauth2_handshake_outcome_total` counter once per
//!   delivered outcome, labeled by `outcome` + `detector`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

/// Emits a `tracing` event when the feature is enabled; compiles to nothing otherwise.
macro_rules! event {
	($level:ident, $($arg:tt)+) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::$level!($($arg)+);
		}
	};
}
pub(crate) use event;
