//! Filter definitions and their preparation against a table.

pub mod definition;
pub mod pipeline;
pub mod sanitize;
pub mod tokens;

pub use definition::{load_definitions, read_definitions, write_definitions, FilterDefinition};
pub use pipeline::{FilterPipeline, PreparedFilter, PreparedFilters, RejectReason, RejectedFilter};
pub use sanitize::sanitize;
pub use tokens::{
    classify_missing, column_references, extract_referenced_columns, parse_crossover,
    standardize_name, CrossDirection, Crossover, MissingColumnKind,
};
