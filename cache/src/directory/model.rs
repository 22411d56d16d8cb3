use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A person callers can be directed to, such as a representative's office.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contact {
  pub id: String,
  pub name: String,
  pub phone: String,
  #[cfg_attr(feature = "serde", serde(rename = "photoURL"))]
  pub photo_url: String,
  pub area: String,
  pub reason: String,
}

/// An issue with the call script and the contacts linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Issue {
  pub id: String,
  pub name: String,
  pub reason: String,
  pub script: String,
  pub contacts: Vec<Contact>,
}

/// Whether a patch adds a contact to, or removes one from, an upstream list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum PatchKind {
  Add,
  Delete,
}

impl fmt::Display for PatchKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PatchKind::Add => write!(f, "ADD"),
      PatchKind::Delete => write!(f, "DELETE"),
    }
  }
}

/// A manual correction to contact data supplied by an external directory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Patch {
  pub name: String,
  pub phone: String,
  pub area: String,
  pub state: String,
  #[cfg_attr(feature = "serde", serde(rename = "type"))]
  pub kind: PatchKind,
}
