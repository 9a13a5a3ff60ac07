//! Drives a handshake against a simulated popup: the provider pages stay cross-origin for a
//! couple of seconds, then the popup posts the success message back to the opener.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::{Duration as StdDuration, Instant},
};
// crates.io
use color_eyre::Result;
use time::Duration;
// self
use oauth2_handshake::{
	auth::WindowName,
	config::HandshakeConfig,
	handshake::{AuthorizationRequest, Handshake, HandshakeCallbacks},
	message::{InboundMessage, LocalMessageBus},
	provider::simplify_provider_name,
	surface::{ExternalSurface, SurfaceAccessError, SurfaceHandle, SurfaceOpenError, SurfaceOpener},
	url::Url,
};

struct SimulatedPopup {
	opened_at: Instant,
	closed: AtomicBool,
}
impl ExternalSurface for SimulatedPopup {
	fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	fn location(&self) -> Result<String, SurfaceAccessError> {
		if self.opened_at.elapsed() < StdDuration::from_secs(3) {
			Err(SurfaceAccessError::CrossOrigin)
		} else {
			Ok("https://app.example.com/login-success".into())
		}
	}

	fn close(&self) {
		if !self.closed.swap(true, Ordering::SeqCst) {
			println!("Popup closed.");
		}
	}
}

#[derive(Default)]
struct SimulatedOpener {
	popup: parking_lot::Mutex<Option<Arc<SimulatedPopup>>>,
}
impl SimulatedOpener {
	fn current(&self) -> Option<Arc<SimulatedPopup>> {
		self.popup.lock().clone()
	}
}
impl SurfaceOpener for SimulatedOpener {
	fn open(&self, url: &Url, window_name: &WindowName) -> Result<SurfaceHandle, SurfaceOpenError> {
		println!("Opening `{window_name}` at {url}.");

		let popup =
			Arc::new(SimulatedPopup { opened_at: Instant::now(), closed: AtomicBool::new(false) });

		*self.popup.lock() = Some(popup.clone());

		Ok(popup)
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = HandshakeConfig::from_base_str("https://app.example.com")?
		.with_polling(Duration::milliseconds(500), 20);
	let opener = Arc::new(SimulatedOpener::default());
	let bus = Arc::new(LocalMessageBus::default());
	let handshake = Handshake::new(config, opener.clone(), bus.clone())?;
	let request = AuthorizationRequest::for_host("github.com")?.with_scopes(["repo", "user:email"]);
	let provider = simplify_provider_name(&request.host).to_owned();
	let attempt = tokio::spawn({
		let handshake = handshake.clone();

		async move {
			handshake
				.start(
					request,
					HandshakeCallbacks::new()
						.on_success(move || println!("Connected to {provider}."))
						.on_error(|reason| println!("Authorization failed: {reason}.")),
				)
				.await
		}
	});

	// The popup's return page posts the sentinel once the provider redirected back.
	tokio::time::sleep(StdDuration::from_secs(2)).await;

	if let Some(popup) = opener.current() {
		let source: SurfaceHandle = popup;

		bus.post(
			InboundMessage::new("auth-success")
				.with_origin("https://app.example.com")
				.with_source(source),
		);
	}

	let report = attempt.await?;

	println!("{}", serde_json::to_string_pretty(&report)?);

	Ok(())
}
