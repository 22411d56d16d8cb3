//! The call directory: issues joined with contacts, and contact patches.
//!
//! Both are served through a [`RefreshingCache`] in front of a
//! [`RecordStore`]:
//!
//! ```ignore
//! let issues: IssueCache = RefreshingCache::builder(IssueSource::new(store.clone()))
//!   .name("issues")
//!   .refresh_interval(Duration::from_secs(300))
//!   .build()?;
//! let patches: PatchCache = RefreshingCache::new(PatchSource::new(store), Duration::from_secs(300))?;
//! ```

mod model;
mod records;
mod source;

pub use model::{Contact, Issue, Patch, PatchKind};
pub use records::{ContactFields, ContactRecord, IssueFields, IssueRecord, PatchFields, PatchRecord};
pub use source::{FetchError, IssueSource, PatchSource, RecordStore, Table};

use crate::RefreshingCache;

/// The issue list, refreshed in the background.
pub type IssueCache = RefreshingCache<Issue>;

/// The contact patch list, refreshed in the background.
pub type PatchCache = RefreshingCache<Patch>;
