use super::cursor::ByteCursor;
use super::errors::{ErrorKind, Result};
use super::fixed::Fixed;
use super::schema::{NodeSchema, VERTEX_SIZE};
use super::tree::{self, RawNode};
use super::types::{BoundingBox, ChildRef, Node, Seg, SegSide, Subsector, SubsectorId};
use super::types::{Vertex, VertexId};
use log::info;

/// The four raw byte regions a level load consumes. Looking them up by name
/// in the archive is the caller's job; this crate only sees bytes.
#[derive(Copy, Clone)]
pub struct LevelLumps<'a> {
    pub vertexes: &'a [u8],
    pub segs: &'a [u8],
    pub subsectors: &'a [u8],
    pub nodes: &'a [u8],
}

/// A fully decoded level: the flat geometry tables plus the resolved BSP
/// root. Built once per level load and immutable afterwards.
#[derive(Debug)]
pub struct BspTree {
    pub vertices: Vec<Vertex>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub root: ChildRef,
}

impl BspTree {
    /// Decodes all four lumps under the schema detected from the NODES lump
    /// and assembles the tree. Any malformed input fails the whole load; no
    /// partial tables are ever returned.
    pub fn from_lumps(lumps: &LevelLumps) -> Result<BspTree> {
        let schema = NodeSchema::detect(lumps.nodes)?;
        let vertices = decode_vertices(lumps.vertexes)?;
        let segs = decode_segs(lumps.segs, schema)?;
        let subsectors = decode_subsectors(lumps.subsectors, schema)?;
        let raw_nodes = decode_nodes(lumps.nodes, schema)?;
        let (nodes, root) = tree::assemble(schema, &raw_nodes, &vertices, &segs, &subsectors)?;

        info!("Loaded level geometry ({:?} schema):", schema);
        info!("    {:4} vertices", vertices.len());
        info!("    {:4} segs", segs.len());
        info!("    {:4} subsectors", subsectors.len());
        info!("    {:4} nodes", nodes.len());

        Ok(BspTree {
            vertices,
            segs,
            subsectors,
            nodes,
            root,
        })
    }

    pub fn vertex(&self, id: VertexId) -> Option<Vertex> {
        self.vertices.get(id as usize).copied()
    }

    pub fn subsector(&self, id: SubsectorId) -> Option<Subsector> {
        self.subsectors.get(id as usize).copied()
    }

    /// The contiguous run of segs making up a subsector.
    pub fn subsector_segs(&self, subsector: Subsector) -> Option<&[Seg]> {
        let start = subsector.first_seg as usize;
        let end = start.checked_add(subsector.seg_count as usize)?;
        if end <= self.segs.len() {
            Some(&self.segs[start..end])
        } else {
            None
        }
    }

    /// Descends from the root, picking a side at every partition line, until
    /// a leaf is reached. With no nodes at all the level is a single
    /// subsector and that subsector is the answer.
    pub fn point_in_subsector(&self, x: Fixed, y: Fixed) -> Option<SubsectorId> {
        let mut child = self.root;
        loop {
            match child {
                ChildRef::Subsector(id) => {
                    return if (id as usize) < self.subsectors.len() {
                        Some(id)
                    } else {
                        None
                    };
                }
                ChildRef::Node(id) => {
                    let node = self.nodes.get(id as usize)?;
                    child = node.children[node.point_on_side(x, y)];
                }
            }
        }
    }

    /// Optional defensive check that the node graph reachable from the root
    /// is a proper tree. Assembly only range-checks references, so a corrupt
    /// archive can still encode a cycle; run this before handing the tree to
    /// anything that recurses over it.
    pub fn validate_acyclic(&self) -> Result<()> {
        tree::validate_acyclic(&self.nodes, self.root)
    }
}

fn decode_vertices(lump: &[u8]) -> Result<Vec<Vertex>> {
    let mut cursor = ByteCursor::new(lump);
    let mut vertices = Vec::with_capacity(lump.len() / VERTEX_SIZE);
    while cursor.remaining() > 0 {
        let x = cursor.read_i16()?;
        let y = cursor.read_i16()?;
        vertices.push(Vertex {
            x: Fixed::from_short(x),
            y: Fixed::from_short(y),
        });
    }
    Ok(vertices)
}

fn decode_segs(lump: &[u8], schema: NodeSchema) -> Result<Vec<Seg>> {
    let mut cursor = ByteCursor::new(lump);
    let mut segs = Vec::with_capacity(lump.len() / schema.seg_size());
    while cursor.remaining() > 0 {
        let seg = match schema {
            NodeSchema::Vanilla => {
                // Vanilla vertex indices are *signed* shorts on disk, unlike
                // the unsigned 32-bit extended ones. The sign extension here
                // is the format, not an accident: vanilla levels stay below
                // 0x8000 vertices, and a negative value must surface as a
                // dangling reference rather than be reinterpreted.
                let start_vertex = cursor.read_i16()? as i32 as u32;
                let end_vertex = cursor.read_i16()? as i32 as u32;
                let angle = cursor.read_u16()?;
                let linedef = cursor.read_u16()?;
                let side = seg_side(cursor.read_u16()?, segs.len())?;
                let offset = cursor.read_i16()?;
                Seg {
                    start_vertex,
                    end_vertex,
                    linedef,
                    side,
                    angle: Some(angle),
                    offset: Some(offset),
                }
            }
            NodeSchema::ExtendedLong | NodeSchema::ExtendedCompressed => {
                let start_vertex = cursor.read_u32()?;
                let end_vertex = cursor.read_u32()?;
                let linedef = cursor.read_u16()?;
                let side = seg_side(u16::from(cursor.read_u8()?), segs.len())?;
                Seg {
                    start_vertex,
                    end_vertex,
                    linedef,
                    side,
                    angle: None,
                    offset: None,
                }
            }
        };
        segs.push(seg);
    }
    Ok(segs)
}

fn seg_side(raw: u16, seg_index: usize) -> Result<SegSide> {
    match raw {
        0 => Ok(SegSide::Front),
        1 => Ok(SegSide::Back),
        _ => Err(ErrorKind::bad_seg_side(seg_index, raw).into()),
    }
}

fn decode_subsectors(lump: &[u8], schema: NodeSchema) -> Result<Vec<Subsector>> {
    let mut cursor = ByteCursor::new(lump);
    let mut subsectors = Vec::with_capacity(lump.len() / schema.subsector_size());
    // Running placement for the count-only records. Depends on strict
    // on-disk order; reordering would change every derived first_seg.
    let mut next_seg: u32 = 0;
    while cursor.remaining() > 0 {
        let subsector = match schema {
            NodeSchema::Vanilla => Subsector {
                seg_count: u32::from(cursor.read_u16()?),
                first_seg: u32::from(cursor.read_u16()?),
            },
            NodeSchema::ExtendedLong => Subsector {
                seg_count: u32::from(cursor.read_u16()?),
                first_seg: cursor.read_u32()?,
            },
            NodeSchema::ExtendedCompressed => {
                let seg_count = cursor.read_u32()?;
                let first_seg = next_seg;
                next_seg = next_seg
                    .checked_add(seg_count)
                    .ok_or_else(|| ErrorKind::seg_count_overflow(subsectors.len()))?;
                Subsector {
                    seg_count,
                    first_seg,
                }
            }
        };
        subsectors.push(subsector);
    }
    Ok(subsectors)
}

fn decode_nodes(lump: &[u8], schema: NodeSchema) -> Result<Vec<RawNode>> {
    let mut cursor = ByteCursor::new(lump);
    cursor.seek(schema.signature_size())?;
    let mut nodes = Vec::with_capacity(cursor.remaining() / schema.node_size());
    while cursor.remaining() > 0 {
        let x = cursor.read_i16()?;
        let y = cursor.read_i16()?;
        let dx = cursor.read_i16()?;
        let dy = cursor.read_i16()?;
        let bbox = [read_bbox(&mut cursor)?, read_bbox(&mut cursor)?];
        let children = match schema {
            NodeSchema::Vanilla => [
                u32::from(cursor.read_u16()?),
                u32::from(cursor.read_u16()?),
            ],
            NodeSchema::ExtendedLong | NodeSchema::ExtendedCompressed => {
                [cursor.read_u32()?, cursor.read_u32()?]
            }
        };
        nodes.push(RawNode {
            x,
            y,
            dx,
            dy,
            bbox,
            children,
        });
    }
    Ok(nodes)
}

fn read_bbox(cursor: &mut ByteCursor) -> Result<BoundingBox> {
    Ok(BoundingBox {
        top: cursor.read_i16()?,
        bottom: cursor.read_i16()?,
        left: cursor.read_i16()?,
        right: cursor.read_i16()?,
    })
}
