use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use ahash::HashMap;
use thiserror::Error;

use super::model::{Contact, Issue, Patch, PatchKind};
use super::records::{ContactRecord, IssueRecord, PatchRecord};
use crate::source::Source;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Read access to the remote tables behind the directory.
///
/// Implementations wrap the transport (HTTP client, credentials, paging).
/// Each call returns every row of one table or fails; filtering, sorting and
/// joining happen in [`IssueSource`] and [`PatchSource`].
pub trait RecordStore: Send + Sync + 'static {
  type Error: std::error::Error + Send + Sync + 'static;

  fn list_contacts(&self) -> Result<Vec<ContactRecord>, Self::Error>;
  fn list_issues(&self) -> Result<Vec<IssueRecord>, Self::Error>;
  fn list_additions(&self) -> Result<Vec<PatchRecord>, Self::Error>;
  fn list_deletions(&self) -> Result<Vec<PatchRecord>, Self::Error>;
}

impl<S> RecordStore for Arc<S>
where
  S: RecordStore + ?Sized,
{
  type Error = S::Error;

  fn list_contacts(&self) -> Result<Vec<ContactRecord>, Self::Error> {
    (**self).list_contacts()
  }

  fn list_issues(&self) -> Result<Vec<IssueRecord>, Self::Error> {
    (**self).list_issues()
  }

  fn list_additions(&self) -> Result<Vec<PatchRecord>, Self::Error> {
    (**self).list_additions()
  }

  fn list_deletions(&self) -> Result<Vec<PatchRecord>, Self::Error> {
    (**self).list_deletions()
  }
}

/// The remote table a fetch was reading when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
  Contacts,
  Issues,
  Additions,
  Deletions,
}

impl fmt::Display for Table {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Table::Contacts => write!(f, "contacts"),
      Table::Issues => write!(f, "issues"),
      Table::Additions => write!(f, "additions"),
      Table::Deletions => write!(f, "deletions"),
    }
  }
}

/// A directory fetch failed while loading one of its tables.
#[derive(Debug, Error)]
#[error("unable to load {table}: {source}")]
pub struct FetchError {
  pub table: Table,
  #[source]
  pub source: BoxError,
}

impl FetchError {
  fn new(table: Table, source: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self {
      table,
      source: Box::new(source),
    }
  }
}

/// Produces the published issue list, each issue joined with its contacts.
///
/// A link to a contact that does not exist (or has no name) is dropped with a
/// warning; the issue itself is kept.
#[derive(Debug, Clone)]
pub struct IssueSource<S> {
  store: S,
}

impl<S: RecordStore> IssueSource<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }
}

impl<S: RecordStore> Source<Issue> for IssueSource<S> {
  type Error = FetchError;

  fn fetch_all(&self) -> Result<Vec<Issue>, FetchError> {
    // Contacts first, so the join below works from a complete index.
    let contacts = self
      .store
      .list_contacts()
      .map_err(|e| FetchError::new(Table::Contacts, e))?;
    let index: HashMap<&str, &ContactRecord> = contacts
      .iter()
      .filter(|c| !c.fields.name.is_empty())
      .map(|c| (c.id.as_str(), c))
      .collect();

    let mut issues: Vec<IssueRecord> = self
      .store
      .list_issues()
      .map_err(|e| FetchError::new(Table::Issues, e))?
      .into_iter()
      .filter(IssueRecord::is_listed)
      .collect();
    issues.sort_by(|a, b| compare_sort_keys(a.fields.sort, b.fields.sort));

    let mut dropped_links = 0usize;
    let joined = issues
      .into_iter()
      .map(|issue| {
        let linked: Vec<Contact> = issue
          .fields
          .contact_links
          .iter()
          .filter_map(|id| match index.get(id.as_str()) {
            Some(contact) => Some(contact.to_contact()),
            None => {
              dropped_links += 1;
              tracing::warn!(issue_id = %issue.id, contact_id = %id, "unable to find contact");
              None
            }
          })
          .collect();
        issue.into_issue(linked)
      })
      .collect::<Vec<_>>();

    if dropped_links > 0 {
      tracing::warn!(dropped_links, issues = joined.len(), "issue list built with unresolved contact links");
    }
    Ok(joined)
  }
}

// Ascending by sort key; rows without one go last, in their original order.
fn compare_sort_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => a.total_cmp(&b),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Produces the list of contact patches: every addition, then every deletion.
#[derive(Debug, Clone)]
pub struct PatchSource<S> {
  store: S,
}

impl<S: RecordStore> PatchSource<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }
}

impl<S: RecordStore> Source<Patch> for PatchSource<S> {
  type Error = FetchError;

  fn fetch_all(&self) -> Result<Vec<Patch>, FetchError> {
    let additions = self
      .store
      .list_additions()
      .map_err(|e| FetchError::new(Table::Additions, e))?;
    let deletions = self
      .store
      .list_deletions()
      .map_err(|e| FetchError::new(Table::Deletions, e))?;

    let patches = tag(additions, PatchKind::Add)
      .chain(tag(deletions, PatchKind::Delete))
      .inspect(|p| tracing::debug!(kind = %p.kind, name = %p.name, phone = %p.phone, state = %p.state, "found patch"))
      .collect();
    Ok(patches)
  }
}

fn tag(records: Vec<PatchRecord>, kind: PatchKind) -> impl Iterator<Item = Patch> {
  records
    .into_iter()
    .filter(|r| !r.fields.name.is_empty())
    .map(move |r| r.into_patch(kind))
}
