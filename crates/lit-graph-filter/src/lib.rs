//! Node filtering for lit-graph.
//!
//! A filter is an ordered list of [`FilterCriterion`] values combined with
//! AND semantics: a node is visible iff it passes every enabled criterion.
//! Disabled criteria always pass, so an empty or fully disabled list keeps
//! every node. Evaluation never mutates the graph.
//!
//! Named presets are persisted through the [`KeyValueStore`] seam by
//! [`PresetManager`].

mod criteria;
mod engine;
mod error;
mod presets;
mod store;

pub use criteria::{FilterCriterion, FilterKind, KeywordMatch, SeriesMode, YearFilter};
pub use engine::{
    calculate_filtered_stats, evaluate, filter_graph, filter_nodes, matches, passes_all,
};
pub use error::{FilterError, FilterResult};
pub use presets::{FilterPreset, PresetManager, PresetUpdate, PRESETS_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
