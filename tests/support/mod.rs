//! Scripted surface + opener doubles shared by the integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicU32, Ordering},
	},
};
// crates.io
use parking_lot::Mutex;
use time::Duration;
use url::Url;
// self
use oauth2_handshake::{
	auth::WindowName,
	config::HandshakeConfig,
	handshake::{FailureReason, Handshake, HandshakeCallbacks},
	message::LocalMessageBus,
	surface::{ExternalSurface, SurfaceAccessError, SurfaceHandle, SurfaceOpenError, SurfaceOpener},
};

pub const BASE_URL: &str = "https://app.example.com";
pub const SUCCESS_LOCATION: &str = "https://app.example.com/login-success";
pub const ERROR_LOCATION: &str = "https://app.example.com/login-error?reason=denied";

/// Surface whose location reads follow a script; the last entry repeats forever.
pub struct ScriptedSurface {
	closed: AtomicBool,
	close_requests: AtomicU32,
	reads: AtomicU32,
	script: Mutex<VecDeque<Result<String, SurfaceAccessError>>>,
	fallback: Mutex<Result<String, SurfaceAccessError>>,
}
impl ScriptedSurface {
	pub fn cross_origin() -> Arc<Self> {
		Self::scripted(Vec::<Option<&str>>::new())
	}

	/// `None` entries produce cross-origin read failures.
	pub fn scripted<'a>(steps: impl IntoIterator<Item = Option<&'a str>>) -> Arc<Self> {
		let script = steps
			.into_iter()
			.map(|step| step.map(str::to_owned).ok_or(SurfaceAccessError::CrossOrigin))
			.collect::<VecDeque<_>>();
		let fallback = script.back().cloned().unwrap_or(Err(SurfaceAccessError::CrossOrigin));

		Arc::new(Self {
			closed: AtomicBool::new(false),
			close_requests: AtomicU32::new(0),
			reads: AtomicU32::new(0),
			script: Mutex::new(script),
			fallback: Mutex::new(fallback),
		})
	}

	/// Simulates the user closing the window; not counted as a close request.
	pub fn close_by_user(&self) {
		self.closed.store(true, Ordering::SeqCst);
	}

	pub fn close_requests(&self) -> u32 {
		self.close_requests.load(Ordering::SeqCst)
	}

	pub fn reads(&self) -> u32 {
		self.reads.load(Ordering::SeqCst)
	}
}
impl ExternalSurface for ScriptedSurface {
	fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	fn location(&self) -> Result<String, SurfaceAccessError> {
		self.reads.fetch_add(1, Ordering::SeqCst);

		match self.script.lock().pop_front() {
			Some(step) => step,
			None => self.fallback.lock().clone(),
		}
	}

	fn close(&self) {
		self.close_requests.fetch_add(1, Ordering::SeqCst);
		self.closed.store(true, Ordering::SeqCst);
	}
}

/// Opener that hands out one scripted surface (or refuses) and records every request.
pub struct ScriptedOpener {
	surface: Option<Arc<ScriptedSurface>>,
	opened: Mutex<Vec<(Url, WindowName)>>,
}
impl ScriptedOpener {
	pub fn with_surface(surface: Arc<ScriptedSurface>) -> Arc<Self> {
		Arc::new(Self { surface: Some(surface), opened: Mutex::new(Vec::new()) })
	}

	pub fn blocked() -> Arc<Self> {
		Arc::new(Self { surface: None, opened: Mutex::new(Vec::new()) })
	}

	pub fn opened(&self) -> Vec<(Url, WindowName)> {
		self.opened.lock().clone()
	}
}
impl SurfaceOpener for ScriptedOpener {
	fn open(&self, url: &Url, window_name: &WindowName) -> Result<SurfaceHandle, SurfaceOpenError> {
		self.opened.lock().push((url.clone(), window_name.clone()));

		match &self.surface {
			Some(surface) => {
				let handle: SurfaceHandle = surface.clone();

				Ok(handle)
			},
			None => Err(SurfaceOpenError::Blocked),
		}
	}
}

/// Collects callback invocations as labels (`success`, `closed`, ...).
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<&'static str>>>);
impl Recorder {
	pub fn callbacks(&self) -> HandshakeCallbacks {
		let on_success = self.0.clone();
		let on_error = self.0.clone();

		HandshakeCallbacks::new()
			.on_success(move || on_success.lock().push("success"))
			.on_error(move |reason: FailureReason| on_error.lock().push(reason.as_str()))
	}

	pub fn calls(&self) -> Vec<&'static str> {
		self.0.lock().clone()
	}
}

pub fn config(max_polls: u32) -> HandshakeConfig {
	HandshakeConfig::from_base_str(BASE_URL)
		.expect("Base URL fixture should parse successfully.")
		.with_polling(Duration::SECOND, max_polls)
}

pub fn build_handshake(
	config: HandshakeConfig,
	opener: Arc<ScriptedOpener>,
	bus: Arc<LocalMessageBus>,
) -> Handshake {
	Handshake::new(config, opener, bus).expect("Test configuration should build a controller.")
}
