//! Category record.
//!
//! # Invariants
//! - `name` is trimmed and non-blank.
//! - `color_hex` is either empty or uppercase `#RRGGBB`.

use super::validation::{normalize_color, require_non_blank, ValidationError};
use super::{new_record_key, RecordKey, StoreId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Event grouping with a display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: RecordKey,
    pub id: StoreId,
    pub name: String,
    pub color_hex: String,
}

/// User-supplied fields for creating or editing a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub color_hex: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, color_hex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color_hex: color_hex.into(),
        }
    }

    /// Returns the draft with normalized fields, or the first format error.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_non_blank("category name", &self.name)?,
            color_hex: normalize_color(&self.color_hex)?,
        })
    }
}

impl Category {
    /// Creates an unpersisted category from a normalized draft.
    pub fn from_draft(draft: CategoryDraft) -> Self {
        Self {
            key: new_record_key(),
            id: UNASSIGNED_ID,
            name: draft.name,
            color_hex: draft.color_hex,
        }
    }

    /// Overwrites editable fields, keeping identity.
    pub fn apply(&mut self, draft: CategoryDraft) {
        self.name = draft.name;
        self.color_hex = draft.color_hex;
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
