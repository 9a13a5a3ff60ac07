//! Terminal outcomes of a handshake attempt.

// self
use crate::_prelude::*;

/// Why an attempt ended without authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReason {
	/// The surface could not be opened at all.
	Failed,
	/// The user closed the surface before any completion signal.
	Closed,
	/// The surface navigated to the provider's error marker.
	Unknown,
	/// The poll ceiling was exhausted without a decisive signal.
	Timeout,
}
impl FailureReason {
	/// Returns the stable wire label (`failed`, `closed`, `unknown`, `timeout`).
	pub const fn as_str(self) -> &'static str {
		match self {
			FailureReason::Failed => "failed",
			FailureReason::Closed => "closed",
			FailureReason::Unknown => "unknown",
			FailureReason::Timeout => "timeout",
		}
	}
}
impl Display for FailureReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for FailureReason {
	type Err = UnknownFailureReason;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"failed" => Ok(FailureReason::Failed),
			"closed" => Ok(FailureReason::Closed),
			"unknown" => Ok(FailureReason::Unknown),
			"timeout" => Ok(FailureReason::Timeout),
			other => Err(UnknownFailureReason { label: other.to_owned() }),
		}
	}
}

/// Error returned when parsing a label outside the closed [`FailureReason`] set.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown failure reason `{label}`.")]
pub struct UnknownFailureReason {
	/// The rejected label.
	pub label: String,
}

/// The single terminal result delivered per attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthorizationOutcome {
	/// The provider granted access.
	Success,
	/// The attempt ended without authorization.
	Failure {
		/// Closed-set reason tag.
		reason: FailureReason,
	},
}
impl AuthorizationOutcome {
	/// Shorthand for [`AuthorizationOutcome::Failure`].
	pub const fn failure(reason: FailureReason) -> Self {
		Self::Failure { reason }
	}

	/// Returns true for [`AuthorizationOutcome::Success`].
	pub const fn is_success(self) -> bool {
		matches!(self, Self::Success)
	}

	/// Returns the failure reason, if any.
	pub const fn failure_reason(self) -> Option<FailureReason> {
		match self {
			Self::Success => None,
			Self::Failure { reason } => Some(reason),
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Failure { reason } => reason.as_str(),
		}
	}
}
impl Display for AuthorizationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Which detector produced the winning verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detector {
	/// The success sentinel arrived over the messaging channel.
	Message,
	/// The polling detector observed the surface.
	Polling,
}
impl Detector {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Detector::Message => "message",
			Detector::Polling => "polling",
		}
	}
}
impl Display for Detector {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
