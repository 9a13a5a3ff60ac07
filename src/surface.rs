//! Contracts for the external browsing context that hosts the provider's authorization pages.
//!
//! The controller never owns the surface's content. It may only ask whether the surface is
//! still open, try to read its current location, and request that it close. Location reads
//! fail routinely while the surface shows the provider's pages (a different origin), so
//! [`probe`] folds every read into a tri-state [`LocationRead`] instead of an error.

// self
use crate::{_prelude::*, auth::WindowName};

/// Shared handle to an opened surface.
pub type SurfaceHandle = Arc<dyn ExternalSurface>;

/// Non-owned view of an externally opened browsing context.
///
/// Every method must be cheap and idempotent; both detectors call them without coordination.
pub trait ExternalSurface
where
	Self: Send + Sync,
{
	/// Returns true once the surface has been closed, by the user or by [`close`](Self::close).
	fn is_closed(&self) -> bool;

	/// Best-effort read of the surface's current address.
	fn location(&self) -> Result<String, SurfaceAccessError>;

	/// Requests that the surface close. Closing an already closed surface is a no-op.
	fn close(&self);
}

/// Opens surfaces for the controller (e.g. a popup window).
pub trait SurfaceOpener
where
	Self: Send + Sync,
{
	/// Opens `url` under `window_name`, reusing an existing surface with that name if any.
	fn open(&self, url: &Url, window_name: &WindowName) -> Result<SurfaceHandle, SurfaceOpenError>;
}

/// Reasons a surface could not be opened at all.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SurfaceOpenError {
	/// The host environment refused to open a new surface (e.g. a popup blocker).
	#[error("Opening the authorization surface was blocked.")]
	Blocked,
	/// The host environment cannot open surfaces right now.
	#[error("Authorization surface is unavailable: {message}.")]
	Unavailable {
		/// Human-readable reason supplied by the opener.
		message: String,
	},
}

/// Failures while reading a surface's location.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SurfaceAccessError {
	/// The surface currently shows a document from another origin.
	#[error("Location of a cross-origin surface cannot be read.")]
	CrossOrigin,
}

/// Result of a single location probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocationRead {
	/// The location was readable.
	Decisive(String),
	/// The location could not be read this time; the surface is presumably still on the
	/// provider's pages.
	Inconclusive,
	/// The surface has been closed.
	SurfaceClosed,
}

/// Reads a surface's state without ever failing.
pub fn probe(surface: &dyn ExternalSurface) -> LocationRead {
	if surface.is_closed() {
		return LocationRead::SurfaceClosed;
	}

	match surface.location() {
		Ok(location) => LocationRead::Decisive(location),
		Err(SurfaceAccessError::CrossOrigin) => LocationRead::Inconclusive,
	}
}
