//! Popup-style OAuth handshake coordinator: open an external authorization surface, race a
//! cross-context success message against location polling, and resolve every attempt exactly
//! once.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handshake;
pub mod message;
pub mod obs;
pub mod provider;
pub mod surface;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::{
			Arc,
			atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
		},
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use color_eyre as _;
