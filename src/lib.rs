//! gbfeatures is a library for GenBank feature locations and for selecting
//! and tabulating annotated features.

/// Location data model and canonical rendering.
pub mod location;

/// Parser for the GenBank location notation.
pub mod location_parser;

/// Shift and coordinate/strand replacement.
pub mod location_ops;

/// Position traits and loosely typed operation arguments.
pub mod position;

/// Static interval index for overlap queries.
pub mod interval;

/// Features, qualifiers and feature lists.
pub mod feature;

/// Filter spec tokenizer.
pub mod filter;

/// Selection of features by index, location, key and qualifiers.
pub mod select;

/// Projection spec columns and cells.
pub mod column;

/// Retrieval of feature tables.
pub mod report;

/// Reading and writing GenBank FEATURES blocks.
pub mod feature_table;

/// Output of features, tables and locations.
pub mod writer;


pub use feature::{Feature, FeatureList, Qualifiers, ShiftHook};
pub use location::{
    render_location, Compound, Location, LocationError, LocationSegment, Strand, Strands,
};
pub use location_ops::{replace_end, replace_start, replace_strand, shift};
pub use location_parser::parse_location;
pub use position::Value;
pub use report::{retrieve, Retrieved, Table};
pub use select::{select, Filter};
