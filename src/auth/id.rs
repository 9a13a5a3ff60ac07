//! Strongly typed identifiers validated before a handshake is attempted.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 255;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (host, window).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (host, window).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (host, window).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { ProviderHost, "Host of the external authorization provider, e.g. `github.com`.", "Host" }
def_id! { WindowName, "Stable name under which the external surface is opened.", "Window" }

impl Default for WindowName {
	fn default() -> Self {
		Self("oauth2-connect".into())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn hosts_reject_empty_and_whitespace() {
		assert_eq!(ProviderHost::new(""), Err(IdentifierError::Empty { kind: "Host" }));
		assert!(ProviderHost::new(" github.com").is_err(), "Leading whitespace must be rejected.");
		assert!(WindowName::new("oauth connect").is_err());

		let host = ProviderHost::new("github.com").expect("Host fixture should be valid.");

		assert_eq!(host.as_ref(), "github.com");
		assert_eq!(format!("{host:?}"), "Host(github.com)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let host: ProviderHost = serde_json::from_str("\"gitlab.com\"")
			.expect("Host should deserialize successfully.");

		assert_eq!(&*host, "gitlab.com");
		assert!(serde_json::from_str::<ProviderHost>("\"\"").is_err());
		assert!(serde_json::from_str::<WindowName>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		ProviderHost::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(
			ProviderHost::new(&too_long),
			Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN, .. })
		));
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<ProviderHost, u8> = HashMap::from_iter([(
			ProviderHost::new("bitbucket.org").expect("Host used for lookup should be valid."),
			3_u8,
		)]);

		assert_eq!(map.get("bitbucket.org"), Some(&3));
	}
}
