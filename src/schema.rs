use super::errors::{ErrorKind, Result};
use log::debug;

/// Full on-disk header of the long-index node format. Only the first four
/// bytes act as the signature; the trailing four must be NUL.
pub const EXTENDED_LONG_SIGNATURE: [u8; 8] = *b"xNd4\0\0\0\0";

/// Signature of the count-only subsector variant.
pub const EXTENDED_COMPRESSED_SIGNATURE: [u8; 4] = *b"XNOD";

/// Vertex records are 4 bytes in every schema.
pub const VERTEX_SIZE: usize = 4;

/// The on-disk encoding used by a level's node, seg and subsector lumps.
///
/// The three schemas describe the same logical structures with incompatible
/// bit layouts; the variant chosen here decides the record sizes and the
/// child-reference width for the whole level, and fields are never mixed
/// across schemas.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeSchema {
    Vanilla,
    ExtendedLong,
    ExtendedCompressed,
}

impl NodeSchema {
    /// Chooses the schema from the NODES lump alone: a recognized signature
    /// at the start selects an extended schema, anything else is vanilla.
    /// In either case the record area must be an exact multiple of the node
    /// record size; a remainder means a malformed lump, not a short read.
    pub fn detect(nodes: &[u8]) -> Result<NodeSchema> {
        let schema = if nodes.starts_with(&EXTENDED_LONG_SIGNATURE[..4]) {
            if nodes.len() < EXTENDED_LONG_SIGNATURE.len()
                || nodes[..EXTENDED_LONG_SIGNATURE.len()] != EXTENDED_LONG_SIGNATURE
            {
                return Err(ErrorKind::bad_signature(nodes).into());
            }
            NodeSchema::ExtendedLong
        } else if nodes.starts_with(&EXTENDED_COMPRESSED_SIGNATURE) {
            NodeSchema::ExtendedCompressed
        } else {
            NodeSchema::Vanilla
        };

        let record_bytes = nodes.len() - schema.signature_size();
        if record_bytes % schema.node_size() != 0 {
            return Err(ErrorKind::bad_lump_size("NODES", nodes.len(), schema.node_size()).into());
        }
        debug!(
            "Detected {:?} node schema, {} node record(s)",
            schema,
            record_bytes / schema.node_size()
        );
        Ok(schema)
    }

    /// Bytes to skip at the start of the NODES lump before the first record.
    pub fn signature_size(self) -> usize {
        match self {
            NodeSchema::Vanilla => 0,
            NodeSchema::ExtendedLong => EXTENDED_LONG_SIGNATURE.len(),
            NodeSchema::ExtendedCompressed => EXTENDED_COMPRESSED_SIGNATURE.len(),
        }
    }

    pub fn node_size(self) -> usize {
        match self {
            NodeSchema::Vanilla => 28,
            NodeSchema::ExtendedLong | NodeSchema::ExtendedCompressed => 32,
        }
    }

    pub fn seg_size(self) -> usize {
        match self {
            NodeSchema::Vanilla => 12,
            NodeSchema::ExtendedLong | NodeSchema::ExtendedCompressed => 11,
        }
    }

    pub fn subsector_size(self) -> usize {
        match self {
            NodeSchema::Vanilla | NodeSchema::ExtendedCompressed => 4,
            NodeSchema::ExtendedLong => 6,
        }
    }

    /// Width in bits of a raw child reference; the top bit of this width is
    /// the node-vs-subsector flag.
    pub fn child_width(self) -> u32 {
        match self {
            NodeSchema::Vanilla => 16,
            NodeSchema::ExtendedLong | NodeSchema::ExtendedCompressed => 32,
        }
    }
}
