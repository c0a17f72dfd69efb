//! Import payload types.

use std::collections::HashSet;
use std::str::FromStr;

use crate::error::DomainError;
use crate::persistence::{ApiFolder, ApiSetting, Environment};

/// Source format of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportCategory {
    /// Postman collection export (`item: []`).
    Postman,
    /// Insomnia export (`resources: []`).
    Insomnia,
    /// Native entities read from a file.
    File,
    /// Native entities pasted as text.
    Text,
}

impl ImportCategory {
    /// Returns the wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postman => "postMan",
            Self::Insomnia => "insomnia",
            Self::File => "file",
            Self::Text => "text",
        }
    }
}

impl FromStr for ImportCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "postMan" | "postman" => Ok(Self::Postman),
            "insomnia" => Ok(Self::Insomnia),
            "file" => Ok(Self::File),
            "text" => Ok(Self::Text),
            other => Err(DomainError::UnsupportedCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for ImportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities produced by converting an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportData {
    /// Converted requests.
    pub settings: Vec<ApiSetting>,
    /// Converted folders.
    pub folders: Vec<ApiFolder>,
    /// Converted environment values.
    pub environments: Vec<Environment>,
}

impl ImportData {
    /// Returns true when nothing was converted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty() && self.folders.is_empty() && self.environments.is_empty()
    }

    /// Returns the ids not referenced as any folder's child.
    ///
    /// Folders come first, then settings; duplicates are dropped.
    #[must_use]
    pub fn top_level_ids(&self) -> Vec<String> {
        let children: HashSet<&str> = self.folders.iter().flat_map(ApiFolder::child_ids).collect();
        let mut seen = HashSet::new();
        self.folders
            .iter()
            .map(|f| f.id.as_str())
            .chain(self.settings.iter().map(|s| s.id.as_str()))
            .filter(|id| !children.contains(id) && seen.insert(*id))
            .map(str::to_string)
            .collect()
    }
}
