// self
use crate::{_prelude::*, auth::ProviderHost};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedAttempt<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedAttempt<F> = F;

/// Span wrapping a single handshake attempt.
#[derive(Clone, Debug)]
pub struct AttemptSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl AttemptSpan {
	/// Creates a new span tagged with the targeted provider host.
	pub fn new(host: &ProviderHost) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_handshake.attempt", host = %host);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = host;

			Self {}
		}
	}

	/// Instruments the attempt without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedAttempt<Fut>
	where
		Fut: std::future::Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
