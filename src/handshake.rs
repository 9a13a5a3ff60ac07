//! The handshake controller: opens the authorization surface, races the message and polling
//! detectors, cleans up, and delivers exactly one terminal outcome per attempt.

pub mod outcome;

mod detector;
mod session;

pub use outcome::*;

// crates.io
use tokio::sync::mpsc;
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ProviderHost, ScopeList},
	config::{HandshakeConfig, HandshakeEndpoints},
	message::MessageBus,
	obs::{self, AttemptSpan, event},
	surface::SurfaceOpener,
};
use detector::Verdict;
use session::HandshakeSession;

type SuccessCallback = Box<dyn FnOnce() + Send>;
type ErrorCallback = Box<dyn FnOnce(FailureReason) + Send>;

/// What the caller wants authorized: a provider host plus the scopes to request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorizationRequest {
	/// Provider host, e.g. `github.com`.
	pub host: ProviderHost,
	/// Scopes passed through verbatim and comma-joined.
	pub scopes: ScopeList,
}
impl AuthorizationRequest {
	/// Creates a request for a validated host.
	pub fn new(host: ProviderHost, scopes: ScopeList) -> Self {
		Self { host, scopes }
	}

	/// Validates `host` and creates a request without scopes.
	pub fn for_host(host: &str) -> Result<Self, IdentifierError> {
		Ok(Self::new(ProviderHost::new(host)?, ScopeList::default()))
	}

	/// Replaces the requested scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = ScopeList::new(scopes);

		self
	}
}

/// Optional callbacks receiving the terminal outcome; at most one of them runs, once.
#[derive(Default)]
pub struct HandshakeCallbacks {
	on_success: Option<SuccessCallback>,
	on_error: Option<ErrorCallback>,
}
impl HandshakeCallbacks {
	/// Creates an empty callback set; outcomes are then only visible through the report.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the success callback.
	pub fn on_success(mut self, callback: impl 'static + Send + FnOnce()) -> Self {
		self.on_success = Some(Box::new(callback));

		self
	}

	/// Registers the failure callback.
	pub fn on_error(mut self, callback: impl 'static + Send + FnOnce(FailureReason)) -> Self {
		self.on_error = Some(Box::new(callback));

		self
	}

	fn deliver(self, outcome: AuthorizationOutcome) {
		match outcome {
			AuthorizationOutcome::Success =>
				if let Some(callback) = self.on_success {
					callback();
				},
			AuthorizationOutcome::Failure { reason } =>
				if let Some(callback) = self.on_error {
					callback(reason);
				},
		}
	}
}
impl Debug for HandshakeCallbacks {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HandshakeCallbacks")
			.field("on_success_set", &self.on_success.is_some())
			.field("on_error_set", &self.on_error.is_some())
			.finish()
	}
}

/// Summary of a settled attempt, returned alongside callback delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeReport {
	/// The delivered outcome.
	pub outcome: AuthorizationOutcome,
	/// Detector that won the race; `None` when the surface never opened.
	pub detector: Option<Detector>,
	/// Number of poll ticks that ran.
	pub polls: u32,
	/// Instant the attempt started.
	#[serde(with = "time::serde::rfc3339")]
	pub started_at: OffsetDateTime,
	/// Instant the outcome was delivered.
	#[serde(with = "time::serde::rfc3339")]
	pub finished_at: OffsetDateTime,
}
impl HandshakeReport {
	/// Wall-clock time spent on the attempt.
	pub fn elapsed(&self) -> Duration {
		self.finished_at - self.started_at
	}
}

/// Coordinates popup-style authorization attempts against one client application.
///
/// The controller owns no surface or listener between attempts. Each [`start`](Self::start)
/// call creates a fresh session that subscribes to the message bus, polls the opened surface,
/// and releases both as soon as the first detector settles.
#[derive(Clone)]
pub struct Handshake {
	/// Validated configuration shared by every attempt.
	pub config: Arc<HandshakeConfig>,
	/// Opener used to create (or reuse) the authorization surface.
	pub opener: Arc<dyn SurfaceOpener>,
	/// Process-wide message bus watched by the message detector.
	pub bus: Arc<dyn MessageBus>,
	endpoints: HandshakeEndpoints,
}
impl Handshake {
	/// Validates the configuration and creates a controller.
	pub fn new(
		config: HandshakeConfig,
		opener: Arc<dyn SurfaceOpener>,
		bus: Arc<dyn MessageBus>,
	) -> Result<Self> {
		let endpoints = config.validate()?;

		Ok(Self { config: Arc::new(config), opener, bus, endpoints })
	}

	/// Resolved authorization endpoint and return target.
	pub fn endpoints(&self) -> &HandshakeEndpoints {
		&self.endpoints
	}

	/// Builds the fully-qualified authorization address for a request.
	///
	/// The return target is URL-encoded; host and comma-joined scopes are written verbatim
	/// (`scopes=repo,user:email`, or `scopes=` when empty).
	pub fn authorize_url(&self, request: &AuthorizationRequest) -> Url {
		let mut url = self.endpoints.authorize.clone();
		let query = format!(
			"returnTo={}&host={}&override=true&scopes={}",
			urlencoding::encode(self.endpoints.return_to.as_str()),
			request.host,
			request.scopes.joined(),
		);

		url.set_query(Some(&query));

		url
	}

	/// Runs one attempt to completion.
	///
	/// Exactly one of the callbacks fires (if registered) and the same outcome is returned in
	/// the report. Failures are never returned as errors. Dropping the future abandons the
	/// attempt and removes its message listener.
	pub async fn start(
		&self,
		request: AuthorizationRequest,
		callbacks: HandshakeCallbacks,
	) -> HandshakeReport {
		let span = AttemptSpan::new(&request.host);

		span.instrument(self.run(request, callbacks)).await
	}

	async fn run(
		&self,
		request: AuthorizationRequest,
		callbacks: HandshakeCallbacks,
	) -> HandshakeReport {
		let started_at = OffsetDateTime::now_utc();
		let url = self.authorize_url(&request);
		let surface = match self.opener.open(&url, &self.config.window_name) {
			Ok(surface) => surface,
			Err(e) => {
				event!(
					warn,
					host = %request.host,
					error = %e,
					"Failed to open the authorization surface."
				);

				let outcome = AuthorizationOutcome::failure(FailureReason::Failed);

				return Self::settle(callbacks, outcome, None, 0, started_at);
			},
		};
		let (tx, mut rx) = mpsc::unbounded_channel();
		let session = HandshakeSession::new(self.bus.clone(), surface, self.config.max_polls);
		let listener = detector::message_listener(Arc::downgrade(&session), &self.config, tx);

		session.attach(self.bus.subscribe(listener));

		let mut verdict: Verdict = tokio::select! {
			biased;
			Some(verdict) = rx.recv() => verdict,
			verdict = detector::poll_surface(&session, &self.config) => verdict,
		};

		// A success message that landed while the poll tick ran still wins.
		if verdict.detector == Detector::Polling {
			verdict = rx.try_recv().unwrap_or(verdict);
		}

		event!(
			debug,
			detector = %verdict.detector,
			outcome = %verdict.outcome,
			"Detector settled the attempt."
		);

		let completed = session.complete();

		debug_assert!(completed, "The controller is the only completer of its session.");

		if let Some(sender) = verdict.sender.take() {
			event!(info, "Authorization succeeded; closing the sending surface.");

			sender.close();
		}
		if verdict.closes_surface() && !session.surface().is_closed() {
			session.surface().close();
		}

		let polls = session.polls();

		Self::settle(callbacks, verdict.outcome, Some(verdict.detector), polls, started_at)
	}

	fn settle(
		callbacks: HandshakeCallbacks,
		outcome: AuthorizationOutcome,
		detector: Option<Detector>,
		polls: u32,
		started_at: OffsetDateTime,
	) -> HandshakeReport {
		event!(info, %outcome, polls = polls, "Handshake attempt finished.");
		obs::record_handshake_outcome(outcome, detector);
		callbacks.deliver(outcome);

		Self::report(outcome, detector, polls, started_at)
	}

	fn report(
		outcome: AuthorizationOutcome,
		detector: Option<Detector>,
		polls: u32,
		started_at: OffsetDateTime,
	) -> HandshakeReport {
		HandshakeReport {
			outcome,
			detector,
			polls,
			started_at,
			finished_at: OffsetDateTime::now_utc(),
		}
	}
}
impl Debug for Handshake {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Handshake")
			.field("config", &self.config)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::WindowName,
		message::LocalMessageBus,
		surface::{SurfaceHandle, SurfaceOpenError},
	};

	struct BlockedOpener;
	impl SurfaceOpener for BlockedOpener {
		fn open(&self, _: &Url, _: &WindowName) -> Result<SurfaceHandle, SurfaceOpenError> {
			Err(SurfaceOpenError::Blocked)
		}
	}

	fn handshake(bus: Arc<LocalMessageBus>) -> Handshake {
		let config = HandshakeConfig::from_base_str("https://app.example.com")
			.expect("Base URL fixture should parse successfully.");

		Handshake::new(config, Arc::new(BlockedOpener), bus)
			.expect("Default configuration should build a controller.")
	}

	#[test]
	fn authorize_url_encodes_return_target_and_joins_scopes() {
		let handshake = handshake(Arc::new(LocalMessageBus::default()));
		let request = AuthorizationRequest::for_host("github.com")
			.expect("Host fixture should be valid.")
			.with_scopes(["repo", "user:email"]);
		let url = handshake.authorize_url(&request);

		assert_eq!(
			url.as_str(),
			"https://app.example.com/api/authorize?returnTo=https%3A%2F%2Fapp.example.com%2Flogin-success&host=github.com&override=true&scopes=repo,user:email"
		);

		let empty = handshake.authorize_url(&request.clone().with_scopes(Vec::<String>::new()));

		assert!(empty.as_str().ends_with("&override=true&scopes="));
	}

	#[tokio::test]
	async fn blocked_surface_fails_before_subscribing() {
		let bus = Arc::new(LocalMessageBus::default());
		let handshake = handshake(bus.clone());
		let reasons = Arc::new(Mutex::new(Vec::new()));
		let sink = reasons.clone();
		let report = handshake
			.start(
				AuthorizationRequest::for_host("gitlab.com")
					.expect("Host fixture should be valid."),
				HandshakeCallbacks::new()
					.on_success(|| {
						panic!("A blocked surface must never succeed.");
					})
					.on_error(move |reason| sink.lock().push(reason)),
			)
			.await;

		assert_eq!(report.outcome, AuthorizationOutcome::failure(FailureReason::Failed));
		assert_eq!(report.detector, None);
		assert_eq!(report.polls, 0);
		assert_eq!(*reasons.lock(), vec![FailureReason::Failed]);
		assert_eq!(bus.listener_count(), 0);
	}
}
