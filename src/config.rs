//! Handshake configuration: where the authorization surface lives, how its completion is
//! recognized, and how long the polling detector may run.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::Error as SerError};
// self
use crate::{_prelude::*, auth::WindowName, error::ConfigError};

/// Tunables shared by every attempt driven through a [`Handshake`](crate::handshake::Handshake).
///
/// Only `base_url` is required when deserializing; every other field falls back to the
/// defaults documented on the field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeConfig {
	/// Origin of the client application; both endpoints are resolved against it.
	pub base_url: Url,
	/// Path of the authorization entry point (defaults to `/api/authorize`).
	#[serde(default = "defaults::authorize_path")]
	pub authorize_path: String,
	/// Path the surface is redirected to on success (defaults to `login-success`).
	#[serde(default = "defaults::return_path")]
	pub return_path: String,
	/// Substring of a polled location that signals success (defaults to `login-success`).
	#[serde(default = "defaults::success_marker")]
	pub success_marker: String,
	/// Substring of a polled location that signals a provider error (defaults to `error`).
	#[serde(default = "defaults::error_marker")]
	pub error_marker: String,
	/// Message payload announcing success over the messaging channel (defaults to
	/// `auth-success`).
	#[serde(default = "defaults::success_message")]
	pub success_message: String,
	/// Stable window name so repeated attempts reuse one surface (defaults to `oauth2-connect`).
	#[serde(default = "defaults::window_name")]
	pub window_name: WindowName,
	/// Delay before each poll (defaults to one second).
	#[serde(rename = "poll_interval_ms", default = "defaults::poll_interval", with = "millis")]
	pub poll_interval: Duration,
	/// Poll ceiling; `poll_interval * max_polls` is the attempt's time budget (defaults to 600).
	#[serde(default = "defaults::max_polls")]
	pub max_polls: u32,
	/// When set, messages whose origin differs are ignored.
	#[serde(default)]
	pub trusted_origin: Option<String>,
}
impl HandshakeConfig {
	/// Creates a configuration with defaults for everything but the base URL.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			authorize_path: defaults::authorize_path(),
			return_path: defaults::return_path(),
			success_marker: defaults::success_marker(),
			error_marker: defaults::error_marker(),
			success_message: defaults::success_message(),
			window_name: defaults::window_name(),
			poll_interval: defaults::poll_interval(),
			max_polls: defaults::max_polls(),
			trusted_origin: None,
		}
	}

	/// Parses the base URL before delegating to [`HandshakeConfig::new`].
	pub fn from_base_str(base_url: &str) -> Result<Self, ConfigError> {
		let base_url =
			Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self::new(base_url))
	}

	/// Deserializes a JSON document and validates the result.
	pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(payload);
		let config: Self = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::Parse { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Overrides the authorization entry path.
	pub fn with_authorize_path(mut self, path: impl Into<String>) -> Self {
		self.authorize_path = path.into();

		self
	}

	/// Overrides the success redirect path.
	pub fn with_return_path(mut self, path: impl Into<String>) -> Self {
		self.return_path = path.into();

		self
	}

	/// Overrides the success and error location markers.
	pub fn with_markers(mut self, success: impl Into<String>, error: impl Into<String>) -> Self {
		self.success_marker = success.into();
		self.error_marker = error.into();

		self
	}

	/// Overrides the success message sentinel.
	pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
		self.success_message = message.into();

		self
	}

	/// Overrides the reusable window name.
	pub fn with_window_name(mut self, name: WindowName) -> Self {
		self.window_name = name;

		self
	}

	/// Overrides the poll cadence and ceiling.
	pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
		self.poll_interval = interval;
		self.max_polls = max_polls;

		self
	}

	/// Restricts the message detector to a single origin.
	pub fn with_trusted_origin(mut self, origin: impl Into<String>) -> Self {
		self.trusted_origin = Some(origin.into());

		self
	}

	/// Total wall-clock budget granted to the polling detector.
	pub fn time_budget(&self) -> Duration {
		self.poll_interval.saturating_mul(i32::try_from(self.max_polls).unwrap_or(i32::MAX))
	}

	/// Poll interval as a runtime timer duration.
	pub fn poll_period(&self) -> std::time::Duration {
		std::time::Duration::try_from(self.poll_interval).unwrap_or_default()
	}

	/// Resolves the authorization endpoint and return target against the base URL.
	pub fn endpoints(&self) -> Result<HandshakeEndpoints, ConfigError> {
		let authorize = self
			.base_url
			.join(&self.authorize_path)
			.map_err(|source| ConfigError::InvalidPath { field: "authorize_path", source })?;
		let return_to = self
			.base_url
			.join(&self.return_path)
			.map_err(|source| ConfigError::InvalidPath { field: "return_path", source })?;

		Ok(HandshakeEndpoints { authorize, return_to })
	}

	/// Checks every invariant and returns the resolved endpoints.
	pub fn validate(&self) -> Result<HandshakeEndpoints, ConfigError> {
		match self.base_url.scheme() {
			"http" | "https" => {},
			scheme => return Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }),
		}

		for (field, value) in [
			("success_marker", &self.success_marker),
			("error_marker", &self.error_marker),
			("success_message", &self.success_message),
		] {
			if value.is_empty() {
				return Err(ConfigError::EmptyValue { field });
			}
		}

		if !self.poll_interval.is_positive() {
			return Err(ConfigError::NonPositivePollInterval);
		}
		if self.max_polls == 0 {
			return Err(ConfigError::ZeroMaxPolls);
		}

		let endpoints = self.endpoints()?;

		if !endpoints.return_to.as_str().contains(&self.success_marker) {
			return Err(ConfigError::ReturnTargetMissingMarker {
				return_to: endpoints.return_to.to_string(),
				marker: self.success_marker.clone(),
			});
		}

		Ok(endpoints)
	}
}

/// Endpoints resolved from a validated [`HandshakeConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandshakeEndpoints {
	/// Authorization entry point, without query.
	pub authorize: Url,
	/// Address the surface navigates to once the provider grants access.
	pub return_to: Url,
}

mod defaults {
	// self
	use crate::{_prelude::*, auth::WindowName};

	pub(super) fn authorize_path() -> String {
		"/api/authorize".into()
	}

	pub(super) fn return_path() -> String {
		"login-success".into()
	}

	pub(super) fn success_marker() -> String {
		"login-success".into()
	}

	pub(super) fn error_marker() -> String {
		"error".into()
	}

	pub(super) fn success_message() -> String {
		"auth-success".into()
	}

	pub(super) fn window_name() -> WindowName {
		WindowName::default()
	}

	pub(super) fn poll_interval() -> Duration {
		Duration::SECOND
	}

	pub(super) fn max_polls() -> u32 {
		600
	}
}

mod millis {
	// self
	use super::*;

	pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let millis = i64::try_from(value.whole_milliseconds()).map_err(SerError::custom)?;

		serializer.serialize_i64(millis)
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		let millis = i64::deserialize(deserializer)?;

		if millis == i64::MIN {
			return Err(DeError::custom("poll interval is out of range"));
		}

		Ok(Duration::milliseconds(millis))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn base() -> HandshakeConfig {
		HandshakeConfig::from_base_str("https://app.example.com")
			.expect("Base URL fixture should parse successfully.")
	}

	#[test]
	fn defaults_resolve_endpoints() {
		let config = base();
		let endpoints = config.validate().expect("Default configuration should validate.");

		assert_eq!(endpoints.authorize.as_str(), "https://app.example.com/api/authorize");
		assert_eq!(endpoints.return_to.as_str(), "https://app.example.com/login-success");
		assert_eq!(config.time_budget(), Duration::minutes(10));
		assert_eq!(config.poll_period(), std::time::Duration::from_secs(1));
		assert_eq!(&*config.window_name, "oauth2-connect");
	}

	#[test]
	fn validation_rejects_broken_tunables() {
		assert!(matches!(
			base().with_polling(Duration::ZERO, 10).validate(),
			Err(ConfigError::NonPositivePollInterval)
		));
		assert!(matches!(
			base().with_polling(Duration::SECOND, 0).validate(),
			Err(ConfigError::ZeroMaxPolls)
		));
		assert!(matches!(
			base().with_markers("", "error").validate(),
			Err(ConfigError::EmptyValue { field: "success_marker" })
		));
		assert!(matches!(
			base().with_return_path("done").validate(),
			Err(ConfigError::ReturnTargetMissingMarker { .. })
		));
		assert!(matches!(
			HandshakeConfig::from_base_str("ftp://files.example.com")
				.expect("FTP URLs still parse.")
				.validate(),
			Err(ConfigError::UnsupportedScheme { .. })
		));
		assert!(matches!(
			HandshakeConfig::from_base_str("not a url"),
			Err(ConfigError::InvalidBaseUrl { .. })
		));
	}

	#[test]
	fn millis_round_trip_through_json() {
		let config = base().with_polling(Duration::milliseconds(250), 8);
		let payload = serde_json::to_value(&config).expect("Configuration should serialize.");

		assert_eq!(payload["poll_interval_ms"], 250);
		assert_eq!(payload["max_polls"], 8);

		let parsed = HandshakeConfig::from_json_str(&payload.to_string())
			.expect("Serialized configuration should parse back.");

		assert_eq!(parsed, config);
	}
}
