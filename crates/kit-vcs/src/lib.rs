//! Version-control plumbing for kitsync
//!
//! Two external-facing concerns live here: the version-control client
//! (an external `git` process behind a capability interface) and the
//! remote revision resolver (a commits-listing metadata API).

pub mod client;
pub mod error;
pub mod remote;
pub mod revision;

pub use client::{GitCli, VcsClient};
pub use error::{Error, Result};
pub use remote::{CommitsApi, DEFAULT_API_BASE, RemoteError, RevisionSource};
pub use revision::RevisionId;
