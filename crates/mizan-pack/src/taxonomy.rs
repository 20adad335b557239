//! # Unified Control Taxonomy
//!
//! The closed, version-pinned registry of framework-agnostic control
//! categories every obligation is normalized onto. Controls are loaded
//! once with the catalogue and never created at runtime.
//!
//! Each control carries a keyword set; the mapper resolves keyword hints
//! through the inverted index built here.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use mizan_core::{ControlId, Domain};

use crate::error::{PackResult, TaxonomyError};
use crate::parser;

/// One control category in the unified taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedControl {
    /// Taxonomy identifier, e.g. `GOV.01`.
    pub id: ControlId,
    /// Human label.
    pub label: String,
    /// Domain this control belongs to.
    pub domain: Domain,
    /// Lowercase keywords obligations may use to reach this control.
    pub keywords: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    version: String,
    controls: Vec<UnifiedControl>,
}

/// Validated, immutable control taxonomy.
#[derive(Debug, Clone)]
pub struct ControlTaxonomy {
    version: String,
    controls: BTreeMap<ControlId, UnifiedControl>,
    keyword_index: BTreeMap<String, BTreeSet<ControlId>>,
}

impl ControlTaxonomy {
    /// Build a taxonomy, validating ids and keywords.
    pub fn new(
        version: impl Into<String>,
        controls: Vec<UnifiedControl>,
    ) -> Result<Self, TaxonomyError> {
        let mut by_id = BTreeMap::new();
        let mut keyword_index: BTreeMap<String, BTreeSet<ControlId>> = BTreeMap::new();

        for control in controls {
            if control.keywords.is_empty() {
                return Err(TaxonomyError::NoKeywords(control.id.to_string()));
            }
            for kw in &control.keywords {
                if kw.trim().is_empty() || kw.chars().any(|c| c.is_uppercase()) {
                    return Err(TaxonomyError::InvalidKeyword {
                        control: control.id.to_string(),
                        keyword: kw.clone(),
                    });
                }
                keyword_index
                    .entry(kw.clone())
                    .or_default()
                    .insert(control.id.clone());
            }
            if by_id.contains_key(&control.id) {
                return Err(TaxonomyError::DuplicateControl(control.id.to_string()));
            }
            by_id.insert(control.id.clone(), control);
        }

        Ok(Self {
            version: version.into(),
            controls: by_id,
            keyword_index,
        })
    }

    /// Parse and validate a taxonomy document.
    pub fn from_yaml_str(text: &str, origin: &Path) -> PackResult<Self> {
        let file: TaxonomyFile = parser::parse_yaml(text, origin)?;
        Ok(Self::new(file.version, file.controls)?)
    }

    /// Load and validate a taxonomy file.
    pub fn load(path: &Path) -> PackResult<Self> {
        let file: TaxonomyFile = parser::read_yaml_file(path)?;
        Ok(Self::new(file.version, file.controls)?)
    }

    /// Taxonomy version pin.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Look up a control.
    pub fn get(&self, id: &ControlId) -> Option<&UnifiedControl> {
        self.controls.get(id)
    }

    /// Whether `id` is part of the taxonomy.
    pub fn contains(&self, id: &ControlId) -> bool {
        self.controls.contains_key(id)
    }

    /// Controls whose keyword set contains `keyword` (already lowercase).
    pub fn by_keyword<'a>(&'a self, keyword: &str) -> impl Iterator<Item = &'a UnifiedControl> + 'a {
        self.keyword_index
            .get(keyword)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.controls.get(id))
    }

    /// All controls in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &UnifiedControl> {
        self.controls.values()
    }

    /// Number of controls.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether the taxonomy is empty.
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(id: &str, domain: Domain, keywords: &[&str]) -> UnifiedControl {
        UnifiedControl {
            id: ControlId::new(id).unwrap(),
            label: id.to_string(),
            domain,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn keyword_index_is_many_to_many() {
        let tax = ControlTaxonomy::new(
            "test",
            vec![
                control("GOV.01", Domain::Cyber, &["governance", "policy"]),
                control("DATA.GOV.01", Domain::Data, &["governance", "stewardship"]),
            ],
        )
        .unwrap();
        let hits: Vec<_> = tax.by_keyword("governance").map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["DATA.GOV.01", "GOV.01"]);
        assert_eq!(tax.by_keyword("unknown").count(), 0);
    }

    #[test]
    fn rejects_duplicates_and_bad_keywords() {
        let dup = ControlTaxonomy::new(
            "t",
            vec![
                control("GOV.01", Domain::Cyber, &["a"]),
                control("GOV.01", Domain::Cyber, &["b"]),
            ],
        );
        assert_eq!(dup.unwrap_err(), TaxonomyError::DuplicateControl("GOV.01".into()));

        let empty = ControlTaxonomy::new("t", vec![control("GOV.01", Domain::Cyber, &[])]);
        assert!(matches!(empty, Err(TaxonomyError::NoKeywords(_))));

        let upper = ControlTaxonomy::new("t", vec![control("GOV.01", Domain::Cyber, &["Policy"])]);
        assert!(matches!(upper, Err(TaxonomyError::InvalidKeyword { .. })));
    }

    #[test]
    fn parses_yaml() {
        let yaml = r#"
version: "T-1"
controls:
  - id: LOG.01
    label: Security logging
    domain: cyber
    keywords: [logging, monitoring]
"#;
        let tax = ControlTaxonomy::from_yaml_str(yaml, Path::new("inline")).unwrap();
        assert_eq!(tax.version(), "T-1");
        assert_eq!(tax.len(), 1);
        assert!(tax.contains(&ControlId::new("LOG.01").unwrap()));
    }
}
