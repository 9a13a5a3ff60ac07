//! Cross-context messaging contracts used by the message detector.

pub mod local;

pub use local::LocalMessageBus;

// self
use crate::{_prelude::*, surface::SurfaceHandle};

/// Callback invoked synchronously for every message posted to a [`MessageBus`].
pub type MessageListener = Arc<dyn Fn(&InboundMessage) + Send + Sync>;

/// Process-wide channel carrying messages from other browsing contexts.
pub trait MessageBus
where
	Self: Send + Sync,
{
	/// Registers a listener and returns the handle needed to remove it again.
	fn subscribe(&self, listener: MessageListener) -> SubscriptionId;

	/// Removes a listener; returns false if it was not registered.
	fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Handle returned by [`MessageBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);
impl Display for SubscriptionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "subscription-{}", self.0)
	}
}

/// A message received from another browsing context.
#[derive(Clone)]
pub struct InboundMessage {
	/// Structured payload as posted by the sender.
	pub data: serde_json::Value,
	/// Origin of the sending context, when known.
	pub origin: Option<String>,
	/// Sending context, when the host exposes it.
	pub source: Option<SurfaceHandle>,
}
impl InboundMessage {
	/// Creates a message without origin or source information.
	pub fn new(data: impl Into<serde_json::Value>) -> Self {
		Self { data: data.into(), origin: None, source: None }
	}

	/// Attaches the sender's origin.
	pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
		self.origin = Some(origin.into());

		self
	}

	/// Attaches the sending context so a receiver can close it.
	pub fn with_source(mut self, source: SurfaceHandle) -> Self {
		self.source = Some(source);

		self
	}

	/// Returns true if the payload is exactly the provided string.
	pub fn is_text(&self, expected: &str) -> bool {
		self.data.as_str() == Some(expected)
	}
}
impl Debug for InboundMessage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("InboundMessage")
			.field("data", &self.data)
			.field("origin", &self.origin)
			.field("source_attached", &self.source.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn text_matching_is_exact() {
		assert!(InboundMessage::new("auth-success").is_text("auth-success"));
		assert!(!InboundMessage::new("auth-success ").is_text("auth-success"));
		let wrapped = InboundMessage::new(serde_json::json!({ "data": "auth-success" }));

		assert!(!wrapped.is_text("auth-success"));
		assert_eq!(SubscriptionId(7).to_string(), "subscription-7");
	}
}
