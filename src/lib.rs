//! Decoder for packaged level geometry: reads the vertex, seg, subsector and
//! node lumps of a level in any of their on-disk encodings and assembles the
//! binary space partition tree the renderer and collision code walk.
//!
//! The archive itself (lump lookup by name) lives outside this crate; callers
//! hand in raw byte regions via [`LevelLumps`] and get back an immutable
//! [`BspTree`].

mod cursor;
mod errors;
mod fixed;
mod level;
mod schema;
mod tree;
mod types;

pub use crate::cursor::ByteCursor;
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::fixed::{Fixed, FRACBITS};
pub use crate::level::{BspTree, LevelLumps};
pub use crate::schema::NodeSchema;
pub use crate::types::{BoundingBox, ChildRef, LinedefId, Node, NodeId, Seg, SegSide, Subsector,
                       SubsectorId, Vertex, VertexId};
