//! In-process [`MessageBus`] implementation for embedders and tests.

// self
use crate::{
	_prelude::*,
	message::{InboundMessage, MessageBus, MessageListener, SubscriptionId},
};

type ListenerMap = Arc<RwLock<BTreeMap<SubscriptionId, MessageListener>>>;

/// Thread-safe message bus that dispatches posted messages to every registered listener.
#[derive(Clone, Default)]
pub struct LocalMessageBus {
	listeners: ListenerMap,
	next_id: Arc<AtomicU64>,
}
impl LocalMessageBus {
	/// Delivers a message to every listener registered at the time of posting.
	///
	/// Listeners run outside the registry lock, so they may subscribe or unsubscribe freely.
	/// Returns the number of listeners invoked.
	pub fn post(&self, message: InboundMessage) -> usize {
		let snapshot = self.listeners.read().values().cloned().collect::<Vec<_>>();

		for listener in &snapshot {
			listener(&message);
		}

		snapshot.len()
	}

	/// Number of currently registered listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.read().len()
	}
}
impl MessageBus for LocalMessageBus {
	fn subscribe(&self, listener: MessageListener) -> SubscriptionId {
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));

		self.listeners.write().insert(id, listener);

		id
	}

	fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.listeners.write().remove(&id).is_some()
	}
}
impl Debug for LocalMessageBus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LocalMessageBus").field("listeners", &self.listener_count()).finish()
	}
}
