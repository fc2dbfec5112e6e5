//! Filter criteria: a closed set of predicate kinds over nodes.

use lit_graph_core::NodeType;
use serde::{Deserialize, Serialize};

/// One entry in an ordered filter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    pub id: String,
    /// Disabled criteria always pass.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub kind: FilterKind,
}

fn enabled_by_default() -> bool {
    true
}

impl FilterCriterion {
    /// Create an enabled criterion.
    pub fn new(id: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            kind,
        }
    }

    /// Set the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Keep nodes whose type is one of `types`.
    pub fn node_types(id: impl Into<String>, types: impl IntoIterator<Item = NodeType>) -> Self {
        Self::new(
            id,
            FilterKind::NodeType {
                types: types.into_iter().collect(),
            },
        )
    }

    /// Keep nodes whose publication year satisfies `filter`.
    pub fn publication_year(id: impl Into<String>, filter: YearFilter) -> Self {
        Self::new(id, FilterKind::PublicationYear(filter))
    }

    /// Keep nodes by series membership.
    pub fn series<S: Into<String>>(
        id: impl Into<String>,
        mode: SeriesMode,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            FilterKind::Series {
                mode,
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Keep nodes whose description mentions the keywords.
    pub fn description<S: Into<String>>(
        id: impl Into<String>,
        keywords: impl IntoIterator<Item = S>,
        match_mode: KeywordMatch,
        case_sensitive: bool,
    ) -> Self {
        Self::new(
            id,
            FilterKind::Description {
                keywords: keywords.into_iter().map(Into::into).collect(),
                match_mode,
                case_sensitive,
            },
        )
    }
}

/// What a criterion tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "camelCase")]
pub enum FilterKind {
    /// Node type inclusion. An empty list passes every node.
    NodeType { types: Vec<NodeType> },

    /// Publication year test. Nodes without a year fail.
    PublicationYear(YearFilter),

    /// Series include/exclude, compared trimmed and case-insensitively.
    Series { mode: SeriesMode, values: Vec<String> },

    /// Keyword search over the description. Nodes without a description fail.
    #[serde(rename_all = "camelCase")]
    Description {
        keywords: Vec<String>,
        match_mode: KeywordMatch,
        #[serde(default)]
        case_sensitive: bool,
    },
}

impl FilterKind {
    /// Short name used in logs and listings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NodeType { .. } => "node-type",
            Self::PublicationYear(_) => "publication-year",
            Self::Series { .. } => "series",
            Self::Description { .. } => "description",
        }
    }
}

/// Year predicates. `Before` and `After` are strict; `Range` is inclusive and
/// either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YearFilter {
    Range { min: Option<i32>, max: Option<i32> },
    Before(i32),
    After(i32),
    Exact(i32),
}

impl YearFilter {
    pub fn matches(&self, year: i32) -> bool {
        match *self {
            Self::Range { min, max } => {
                min.map_or(true, |min| year >= min) && max.map_or(true, |max| year <= max)
            }
            Self::Before(limit) => year < limit,
            Self::After(limit) => year > limit,
            Self::Exact(target) => year == target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesMode {
    #[default]
    Include,
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeywordMatch {
    #[default]
    Any,
    All,
}
