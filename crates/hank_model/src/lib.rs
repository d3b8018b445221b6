//! Builder and writer for FastHenry-style inductance solver input decks.
//!
//! A model is grown one conductor segment at a time. Endpoint coordinates
//! are deduplicated into numbered spatial nodes as they arrive, nodes that
//! share a net name form electrical equivalence classes, and the writer
//! turns the finished model into a deterministic text deck.

pub mod error;
pub mod model;
pub mod nets;
pub mod node;
pub mod segment;
pub mod units;
pub mod writer;

pub use error::{ArgumentError, WriteError};
pub use model::{FrequencySweep, InputModel, Port};
pub use nets::NetGroup;
pub use node::{NodeId, Point3, SpatialNode, Terminal};
pub use segment::{Material, Segment, SegmentConfig, WidthVector};
pub use units::Unit;
