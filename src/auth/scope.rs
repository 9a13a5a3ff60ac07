//! Ordered permission scope lists as requested from a provider.
//!
//! Unlike a normalized scope set, a [`ScopeList`] is passed through verbatim: order is kept,
//! duplicates survive, and entries are never validated. The provider decides what the strings
//! mean.

// std
use std::slice::Iter;
// self
use crate::_prelude::*;

const SCOPE_DELIMITER: char = ',';

/// Ordered, non-deduplicated list of opaque scope strings.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Creates a scope list from any iterator, preserving order.
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(scopes.into_iter().map(Into::into).collect())
	}

	/// Number of entries, duplicates included.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes were requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over the scopes in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Returns the comma-joined wire form (`repo,user:email`); empty lists yield `""`.
	pub fn joined(&self) -> String {
		self.0.join(",")
	}

	/// Returns the scopes from `self` that `granted` does not cover, in request order.
	///
	/// A non-empty result means the caller must run a new handshake that asks for the extra
	/// permissions.
	pub fn missing_from<'a, I>(&self, granted: I) -> ScopeList
	where
		I: IntoIterator<Item = &'a str>,
	{
		let granted = granted.into_iter().collect::<Vec<_>>();

		Self(self.0.iter().filter(|scope| !granted.contains(&scope.as_str())).cloned().collect())
	}

	/// Appends a scope to the end of the list.
	pub fn push(&mut self, scope: impl Into<String>) {
		self.0.push(scope.into());
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.joined())
	}
}
impl FromStr for ScopeList {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}

		Ok(Self::new(s.split(SCOPE_DELIMITER)))
	}
}
impl From<Vec<String>> for ScopeList {
	fn from(value: Vec<String>) -> Self {
		Self(value)
	}
}
impl<S> FromIterator<S> for ScopeList
where
	S: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self::new(iter)
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.0.iter() }
	}
}
