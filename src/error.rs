//! Crate-level error types for local misuse detected before an attempt starts.
//!
//! Handshake outcomes (`failed`, `closed`, `unknown`, `timeout`) are never surfaced through
//! these types; they travel as [`AuthorizationOutcome`](crate::handshake::AuthorizationOutcome).

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public constructors.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Handshake configuration is unusable.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// An identifier (host, window name) failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
}

/// Configuration and validation failures raised while preparing a handshake.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base URL could not be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than HTTP(S).
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// A configured path could not be joined onto the base URL.
	#[error("The {field} path cannot be joined onto the base URL.")]
	InvalidPath {
		/// Which configuration field failed.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Marker or sentinel strings must not be empty.
	#[error("The {field} value cannot be empty.")]
	EmptyValue {
		/// Which configuration field failed.
		field: &'static str,
	},
	/// The return target would never be recognized by the polling detector.
	#[error("Return target `{return_to}` does not contain the success marker `{marker}`.")]
	ReturnTargetMissingMarker {
		/// Resolved return target.
		return_to: String,
		/// Configured success marker.
		marker: String,
	},
	/// Poll interval must be strictly positive.
	#[error("The poll interval must be positive.")]
	NonPositivePollInterval,
	/// At least one poll must be allowed.
	#[error("The poll ceiling must be at least one.")]
	ZeroMaxPolls,
	/// JSON configuration could not be parsed.
	#[error("Handshake configuration is malformed at `{}`.", .source.path())]
	Parse {
		/// Path-aware parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
