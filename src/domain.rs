use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PdbError;

/// Lowercased, validated PDB accession code. Every cache key and URL path
/// component derives from this form, so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PdbId(String);

impl PdbId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PdbId {
    type Err = PdbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        let is_valid =
            normalized.len() == 4 && normalized.chars().all(|ch| ch.is_ascii_alphanumeric());
        if !is_valid {
            return Err(PdbError::InvalidId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// Summary of one structure page. This is both the wire shape of the
/// `/pdb/{id}` route and the on-disk cache schema; the JSON keys follow the
/// `pypdb` cache format so existing caches stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRecord {
    #[serde(rename = "pdbid")]
    pub id: String,
    pub title: Option<String>,
    pub classification: Option<String>,
    pub organism: Option<String>,
    pub method: Option<String>,
    pub resolution: Option<String>,
    pub publication_title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub doi: Option<String>,
    pub related_structures: Option<Vec<String>>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(rename = "local_image")]
    pub local_image_path: Option<String>,
}

impl StructureRecord {
    /// Record with every extractable field absent.
    pub fn empty(id: &PdbId) -> Self {
        Self {
            id: id.as_str().to_string(),
            title: None,
            classification: None,
            organism: None,
            method: None,
            resolution: None,
            publication_title: None,
            authors: Vec::new(),
            doi: None,
            related_structures: None,
            abstract_text: None,
            local_image_path: None,
        }
    }
}
