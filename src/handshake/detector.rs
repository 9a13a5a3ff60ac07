//! The two completion detectors raced by the controller.

// std
use std::sync::Weak;
// crates.io
use tokio::sync::mpsc::UnboundedSender;
// self
use crate::{
	_prelude::*,
	config::HandshakeConfig,
	handshake::{AuthorizationOutcome, Detector, FailureReason, session::HandshakeSession},
	message::{InboundMessage, MessageListener},
	obs::event,
	surface::{self, LocationRead, SurfaceHandle},
};

/// A terminal verdict reached by one detector.
#[derive(Clone)]
pub(super) struct Verdict {
	pub(super) outcome: AuthorizationOutcome,
	pub(super) detector: Detector,
	/// Surface that posted the success message, closed by the controller once it settles.
	pub(super) sender: Option<SurfaceHandle>,
}
impl Verdict {
	fn success(detector: Detector) -> Self {
		Self { outcome: AuthorizationOutcome::Success, detector, sender: None }
	}

	fn message(sender: Option<SurfaceHandle>) -> Self {
		Self { sender, ..Self::success(Detector::Message) }
	}

	fn failure(reason: FailureReason) -> Self {
		Self {
			outcome: AuthorizationOutcome::failure(reason),
			detector: Detector::Polling,
			sender: None,
		}
	}

	/// A success seen by polling leaves the surface on the return target for the caller.
	pub(super) fn closes_surface(&self) -> bool {
		!(self.outcome.is_success() && self.detector == Detector::Polling)
	}
}

/// Builds the message detector: a listener that reports the success sentinel.
///
/// The listener only holds a weak reference so an abandoned session can still be dropped
/// while the listener is registered. It never touches a surface itself; closing the sender is
/// left to the controller so a losing verdict has no side effects.
pub(super) fn message_listener(
	session: Weak<HandshakeSession>,
	config: &HandshakeConfig,
	verdicts: UnboundedSender<Verdict>,
) -> MessageListener {
	let sentinel = config.success_message.clone();
	let trusted_origin = config.trusted_origin.clone();

	Arc::new(move |message: &InboundMessage| {
		let Some(session) = session.upgrade() else {
			return;
		};

		if session.is_completed() || !message.is_text(&sentinel) {
			return;
		}
		if trusted_origin
			.as_deref()
			.is_some_and(|trusted| message.origin.as_deref() != Some(trusted))
		{
			event!(
				debug,
				origin = ?message.origin,
				"Ignoring success message from an untrusted origin."
			);

			return;
		}

		event!(debug, closable_sender = message.source.is_some(), "Success message received.");

		// The receiver is gone once the controller has settled.
		let _ = verdicts.send(Verdict::message(message.source.clone()));
	})
}

/// Runs the polling detector until it reaches a verdict or exhausts the poll ceiling.
pub(super) async fn poll_surface(session: &HandshakeSession, config: &HandshakeConfig) -> Verdict {
	let period = config.poll_period();

	while session.can_poll() {
		tokio::time::sleep(period).await;

		let poll = session.record_poll();

		match surface::probe(session.surface().as_ref()) {
			LocationRead::SurfaceClosed => return Verdict::failure(FailureReason::Closed),
			LocationRead::Inconclusive => {
				event!(trace, poll = poll, "Surface location is not readable yet.");
			},
			LocationRead::Decisive(location) => {
				if let Some(outcome) = classify_location(&location, config) {
					event!(debug, poll = poll, %location, %outcome, "Polled location is decisive.");

					return match outcome {
						AuthorizationOutcome::Success => Verdict::success(Detector::Polling),
						AuthorizationOutcome::Failure { reason } => Verdict::failure(reason),
					};
				}
			},
		}
	}

	Verdict::failure(FailureReason::Timeout)
}

/// Maps a readable location to an outcome; the success marker takes precedence.
pub(super) fn classify_location(
	location: &str,
	config: &HandshakeConfig,
) -> Option<AuthorizationOutcome> {
	if location.contains(&config.success_marker) {
		Some(AuthorizationOutcome::Success)
	} else if location.contains(&config.error_marker) {
		Some(AuthorizationOutcome::failure(FailureReason::Unknown))
	} else {
		None
	}
}
