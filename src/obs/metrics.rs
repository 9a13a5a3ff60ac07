// self
use crate::handshake::{AuthorizationOutcome, Detector};

/// Records a delivered outcome via the global metrics recorder (when enabled).
pub fn record_handshake_outcome(outcome: AuthorizationOutcome, detector: Option<Detector>) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_handshake_outcome_total",
			"outcome" => outcome.as_str(),
			"detector" => detector.map_or("setup", Detector::as_str)
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (outcome, detector);
	}
}
