//! Display helpers for the closed set of well-known Git hosting providers.
//!
//! These lookups are pure tables; the handshake never consults them. UI collaborators use
//! them to label the provider a handshake is about to target.

// self
use crate::_prelude::*;

/// Git hosting providers with dedicated display assets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownProvider {
	/// `github.com`.
	GitHub,
	/// `gitlab.com`.
	GitLab,
	/// `bitbucket.org`.
	Bitbucket,
}
impl KnownProvider {
	/// All known providers in display order.
	pub const ALL: [KnownProvider; 3] =
		[KnownProvider::GitHub, KnownProvider::GitLab, KnownProvider::Bitbucket];

	/// Resolves a provider type label (`"GitHub"`, `"GitLab"`, `"Bitbucket"`).
	pub fn from_type(kind: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|provider| provider.display_name() == kind)
	}

	/// Resolves the public host of a provider (`"github.com"`, ...).
	pub fn from_host(host: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|provider| provider.host() == host)
	}

	/// Human-readable provider name, also used as its type label.
	pub const fn display_name(self) -> &'static str {
		match self {
			KnownProvider::GitHub => "GitHub",
			KnownProvider::GitLab => "GitLab",
			KnownProvider::Bitbucket => "Bitbucket",
		}
	}

	/// Public SaaS host of the provider.
	pub const fn host(self) -> &'static str {
		match self {
			KnownProvider::GitHub => "github.com",
			KnownProvider::GitLab => "gitlab.com",
			KnownProvider::Bitbucket => "bitbucket.org",
		}
	}

	/// Key of the icon asset bundled by the UI for this provider.
	pub const fn icon(self) -> &'static str {
		match self {
			KnownProvider::GitHub => "github",
			KnownProvider::GitLab => "gitlab",
			KnownProvider::Bitbucket => "bitbucket",
		}
	}
}
impl Display for KnownProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.display_name())
	}
}

/// Returns the icon asset key for a provider type label, if it is a known provider.
pub fn icon_for_provider_type(kind: &str) -> Option<&'static str> {
	KnownProvider::from_type(kind).map(KnownProvider::icon)
}

/// Maps well-known hosts to their short display name; other hosts pass through unchanged.
pub fn simplify_provider_name(host: &str) -> &str {
	KnownProvider::from_host(host).map_or(host, |provider| provider.display_name())
}
