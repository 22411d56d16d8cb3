//! Raw rows as stored in the remote tables, before filtering and joining.
//!
//! Field names follow the column names of the upstream base, so records can
//! be deserialised straight from its JSON responses.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::model::{Contact, Issue, Patch, PatchKind};

/// A row of the contacts table.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactRecord {
  pub id: String,
  #[cfg_attr(feature = "serde", serde(default))]
  pub fields: ContactFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContactFields {
  #[cfg_attr(feature = "serde", serde(rename = "Name"))]
  pub name: String,
  #[cfg_attr(feature = "serde", serde(rename = "Phone"))]
  pub phone: String,
  #[cfg_attr(feature = "serde", serde(rename = "PhotoURL"))]
  pub photo_url: String,
  #[cfg_attr(feature = "serde", serde(rename = "Area"))]
  pub area: String,
  #[cfg_attr(feature = "serde", serde(rename = "Contact Reason"))]
  pub reason: String,
}

/// A row of the issues table. `contact_links` holds ids of contact rows.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IssueRecord {
  pub id: String,
  #[cfg_attr(feature = "serde", serde(default))]
  pub fields: IssueFields,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IssueFields {
  #[cfg_attr(feature = "serde", serde(rename = "Name"))]
  pub name: String,
  #[cfg_attr(feature = "serde", serde(rename = "Action requested"))]
  pub action: String,
  #[cfg_attr(feature = "serde", serde(rename = "Script"))]
  pub script: String,
  #[cfg_attr(feature = "serde", serde(rename = "Contact"))]
  pub contact_links: Vec<String>,
  #[cfg_attr(feature = "serde", serde(rename = "Inactive"))]
  pub inactive: bool,
  #[cfg_attr(feature = "serde", serde(rename = "Sort"))]
  pub sort: Option<f64>,
}

/// A row of the additions or deletions table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatchRecord {
  #[cfg_attr(feature = "serde", serde(default))]
  pub id: String,
  #[cfg_attr(feature = "serde", serde(default))]
  pub fields: PatchFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PatchFields {
  #[cfg_attr(feature = "serde", serde(rename = "Name"))]
  pub name: String,
  #[cfg_attr(feature = "serde", serde(rename = "Phone"))]
  pub phone: String,
  #[cfg_attr(feature = "serde", serde(rename = "Area"))]
  pub area: String,
  #[cfg_attr(feature = "serde", serde(rename = "State"))]
  pub state: String,
}

impl ContactRecord {
  pub(crate) fn to_contact(&self) -> Contact {
    Contact {
      id: self.id.clone(),
      name: self.fields.name.clone(),
      phone: self.fields.phone.clone(),
      photo_url: self.fields.photo_url.clone(),
      area: self.fields.area.clone(),
      reason: self.fields.reason.clone(),
    }
  }
}

impl IssueRecord {
  pub(crate) fn into_issue(self, contacts: Vec<Contact>) -> Issue {
    Issue {
      id: self.id,
      name: self.fields.name,
      reason: self.fields.action,
      script: self.fields.script,
      contacts,
    }
  }

  /// Inactive and unnamed rows are never published.
  pub(crate) fn is_listed(&self) -> bool {
    !self.fields.name.is_empty() && !self.fields.inactive
  }
}

impl PatchRecord {
  pub(crate) fn into_patch(self, kind: PatchKind) -> Patch {
    Patch {
      name: self.fields.name,
      phone: self.fields.phone,
      area: self.fields.area,
      state: self.fields.state,
      kind,
    }
  }
}
