use super::fixed::{Fixed, FRACBITS};

pub type VertexId = u32;
pub type NodeId = u32;
pub type SubsectorId = u32;
pub type LinedefId = u16;

/// A map vertex, promoted from the disk shorts to fixed point.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Vertex {
    pub x: Fixed,
    pub y: Fixed,
}

/// Axis-aligned child bounds, kept in the raw 16-bit map units they are
/// stored in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BoundingBox {
    pub top: i16,
    pub bottom: i16,
    pub left: i16,
    pub right: i16,
}

/// A resolved child of a partition node.
///
/// On disk this is a bare integer whose top bit (at the schema's child
/// width) flags a subsector leaf. It is decoded into this sum type once,
/// during assembly, so consumers index straight into the right table and
/// never repeat the bit test.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChildRef {
    Node(NodeId),
    Subsector(SubsectorId),
}

impl ChildRef {
    /// Splits a raw child value at `width` bits (16 or 32): flag bit set
    /// means subsector, with the low `width - 1` bits as the index.
    pub fn decode(raw: u32, width: u32) -> ChildRef {
        debug_assert!(width == 16 || width == 32);
        let flag = 1u32 << (width - 1);
        if raw & flag != 0 {
            ChildRef::Subsector(raw & (flag - 1))
        } else {
            ChildRef::Node(raw)
        }
    }

    pub fn encode(self, width: u32) -> u32 {
        debug_assert!(width == 16 || width == 32);
        match self {
            ChildRef::Node(index) => index,
            ChildRef::Subsector(index) => index | (1u32 << (width - 1)),
        }
    }
}

/// Which side of its linedef a seg runs along.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SegSide {
    Front,
    Back,
}

/// A line segment between two vertices, the renderable unit within a
/// subsector.
///
/// `angle` and `offset` exist only in the vanilla records; the extended
/// schemas leave recomputing them to the consumer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Seg {
    pub start_vertex: VertexId,
    pub end_vertex: VertexId,
    pub linedef: LinedefId,
    pub side: SegSide,
    pub angle: Option<u16>,
    pub offset: Option<i16>,
}

/// A leaf convex region, covering `seg_count` segs starting at `first_seg`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Subsector {
    pub seg_count: u32,
    pub first_seg: u32,
}

/// A partition node: a splitting line, per-child bounds and two resolved
/// children.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
    pub bbox: [BoundingBox; 2],
    pub children: [ChildRef; 2],
}

impl Node {
    /// Which side of the partition line the point falls on: 0 is front,
    /// 1 is back, usable directly as an index into `children`.
    pub fn point_on_side(&self, x: Fixed, y: Fixed) -> usize {
        let dx = self.dx.to_raw();
        let dy = self.dy.to_raw();

        if dx == 0 {
            return if x.to_raw() <= self.x.to_raw() {
                usize::from(dy > 0)
            } else {
                usize::from(dy < 0)
            };
        }
        if dy == 0 {
            return if y.to_raw() <= self.y.to_raw() {
                usize::from(dx < 0)
            } else {
                usize::from(dx > 0)
            };
        }

        let local_dx = i64::from((x - self.x).to_raw());
        let local_dy = i64::from((y - self.y).to_raw());
        let left = (i64::from(dy >> FRACBITS) * local_dx) >> FRACBITS;
        let right = (local_dy * i64::from(dx >> FRACBITS)) >> FRACBITS;
        usize::from(right >= left)
    }
}
