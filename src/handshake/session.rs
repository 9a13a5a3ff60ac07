// self
use crate::{
	_prelude::*,
	message::{MessageBus, SubscriptionId},
	surface::SurfaceHandle,
};

/// Single-use state shared by the controller and both detectors of one attempt.
///
/// The `completed` flag gates delivery: only the first [`complete`](Self::complete) call wins.
/// The message subscription is released on completion and, for abandoned attempts, on drop.
pub(super) struct HandshakeSession {
	bus: Arc<dyn MessageBus>,
	surface: SurfaceHandle,
	subscription: Mutex<Option<SubscriptionId>>,
	polls: AtomicU32,
	max_polls: u32,
	completed: AtomicBool,
}
impl HandshakeSession {
	pub(super) fn new(
		bus: Arc<dyn MessageBus>,
		surface: SurfaceHandle,
		max_polls: u32,
	) -> Arc<Self> {
		Arc::new(Self {
			bus,
			surface,
			subscription: Mutex::new(None),
			polls: AtomicU32::new(0),
			max_polls,
			completed: AtomicBool::new(false),
		})
	}

	pub(super) fn surface(&self) -> &SurfaceHandle {
		&self.surface
	}

	pub(super) fn attach(&self, id: SubscriptionId) {
		*self.subscription.lock() = Some(id);
	}

	pub(super) fn is_completed(&self) -> bool {
		self.completed.load(Ordering::Acquire)
	}

	/// Returns true while the session is open and the poll ceiling is not reached.
	pub(super) fn can_poll(&self) -> bool {
		!self.is_completed() && self.polls() < self.max_polls
	}

	/// Counts a poll that is about to probe the surface; returns its 1-based number.
	pub(super) fn record_poll(&self) -> u32 {
		self.polls.fetch_add(1, Ordering::AcqRel) + 1
	}

	pub(super) fn polls(&self) -> u32 {
		self.polls.load(Ordering::Acquire)
	}

	/// Marks the session completed and releases the subscription; returns false if another
	/// caller already completed it.
	pub(super) fn complete(&self) -> bool {
		if self.completed.swap(true, Ordering::AcqRel) {
			return false;
		}

		self.release();

		true
	}

	fn release(&self) {
		if let Some(id) = self.subscription.lock().take() {
			self.bus.unsubscribe(id);
		}
	}
}
impl Drop for HandshakeSession {
	fn drop(&mut self) {
		self.release();
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		message::{InboundMessage, LocalMessageBus},
		surface::{ExternalSurface, SurfaceAccessError},
	};

	struct InertSurface;
	impl ExternalSurface for InertSurface {
		fn is_closed(&self) -> bool {
			false
		}

		fn location(&self) -> Result<String, SurfaceAccessError> {
			Err(SurfaceAccessError::CrossOrigin)
		}

		fn close(&self) {}
	}

	fn session(bus: &Arc<LocalMessageBus>, max_polls: u32) -> Arc<HandshakeSession> {
		let bus: Arc<dyn MessageBus> = bus.clone();

		HandshakeSession::new(bus, Arc::new(InertSurface), max_polls)
	}

	#[test]
	fn poll_slots_stop_at_the_ceiling() {
		let bus = Arc::new(LocalMessageBus::default());
		let session = session(&bus, 2);

		assert!(session.can_poll());
		assert_eq!(session.record_poll(), 1);
		assert_eq!(session.record_poll(), 2);
		assert!(!session.can_poll());
		assert_eq!(session.polls(), 2);
	}

	#[test]
	fn completion_is_first_wins_and_unsubscribes() {
		let bus = Arc::new(LocalMessageBus::default());
		let session = session(&bus, 5);

		session.attach(bus.subscribe(Arc::new(|_: &InboundMessage| {})));

		assert_eq!(bus.listener_count(), 1);
		assert!(session.complete());
		assert!(!session.complete(), "Second completion must lose.");
		assert_eq!(bus.listener_count(), 0);
		assert!(!session.can_poll(), "Completed sessions must not poll again.");
	}

	#[test]
	fn dropping_an_abandoned_session_unsubscribes() {
		let bus = Arc::new(LocalMessageBus::default());
		let session = session(&bus, 5);

		session.attach(bus.subscribe(Arc::new(|_: &InboundMessage| {})));
		drop(session);

		assert_eq!(bus.listener_count(), 0);
	}
}
