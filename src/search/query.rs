//! Free-text search expressions: OR-alternatives of required substrings

use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, AssistantResult};
use crate::model::ItemView;

/// One OR-alternative: a conjunctive set of required substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermGroup {
    terms: Vec<String>,
}

impl TermGroup {
    /// Lowercased terms of this alternative
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Every term must appear in at least one of the fields.
    fn matches(&self, fields: &[String]) -> bool {
        self.terms
            .iter()
            .all(|term| fields.iter().any(|field| field.contains(term)))
    }
}

/// Parsed search expression: a disjunction of term-groups.
///
/// Parsing splits on the literal token `OR` (case-insensitive, whitespace
/// delimited) and then on whitespace within each alternative. There is no
/// quoting or escaping; that limitation is part of the query language, so
/// multi-word phrases cannot be matched as a unit.
///
/// Matching is pure and local: it runs over fields the caller already holds,
/// on top of whatever coarse pre-filter the backend's native search applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryExpression {
    raw: String,
    groups: Vec<TermGroup>,
}

impl QueryExpression {
    /// Parse a raw search string.
    ///
    /// Empty alternatives produced by dangling or doubled `OR` tokens are
    /// discarded; input that yields no alternative at all is rejected.
    pub fn parse(raw: &str) -> AssistantResult<Self> {
        if raw.trim().is_empty() {
            return Err(AssistantError::invalid_query("search term is empty"));
        }

        let mut groups = Vec::new();
        let mut current: Vec<String> = Vec::new();
        for token in raw.split_whitespace() {
            if token.eq_ignore_ascii_case("or") {
                if !current.is_empty() {
                    groups.push(TermGroup {
                        terms: std::mem::take(&mut current),
                    });
                }
            } else {
                current.push(token.to_lowercase());
            }
        }
        if !current.is_empty() {
            groups.push(TermGroup { terms: current });
        }

        if groups.is_empty() {
            return Err(AssistantError::invalid_query(
                "search term contains no words",
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            groups,
        })
    }

    /// The original string, for handing to the backend's native search as a
    /// coarse pre-filter.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn groups(&self) -> &[TermGroup] {
        &self.groups
    }

    /// Whether `item` satisfies at least one alternative, matched
    /// case-insensitively over the item's kind-specific field set.
    pub fn matches(&self, item: &ItemView) -> bool {
        let fields: Vec<String> = item
            .search_fields()
            .iter()
            .map(|field| field.to_lowercase())
            .collect();
        self.groups.iter().any(|group| group.matches(&fields))
    }
}
