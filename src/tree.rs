use super::errors::{ErrorKind, Result};
use super::fixed::Fixed;
use super::schema::NodeSchema;
use super::types::{BoundingBox, ChildRef, Node, Seg, Subsector, Vertex};

/// A node as decoded from disk, before its child references are resolved.
/// Coordinates stay in disk shorts and children in the schema's raw integer.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RawNode {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    pub bbox: [BoundingBox; 2],
    pub children: [u32; 2],
}

/// Cross-checks the four decoded tables against each other, resolves every
/// raw child value into a `ChildRef` and picks the tree root.
///
/// All index validation lives here: a reference out of range for its target
/// table fails the whole load. The node ordering of well-formed lumps
/// guarantees a tree by construction, so no traversal happens at this stage;
/// `validate_acyclic` is the separate defensive pass.
pub(crate) fn assemble(
    schema: NodeSchema,
    raw_nodes: &[RawNode],
    vertices: &[Vertex],
    segs: &[Seg],
    subsectors: &[Subsector],
) -> Result<(Vec<Node>, ChildRef)> {
    check_seg_vertices(vertices, segs)?;
    check_subsectors(segs, subsectors)?;

    let width = schema.child_width();
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for raw in raw_nodes {
        let mut children = [ChildRef::Node(0); 2];
        for (slot, &raw_child) in children.iter_mut().zip(raw.children.iter()) {
            let child = ChildRef::decode(raw_child, width);
            match child {
                ChildRef::Node(index) => {
                    if index as usize >= raw_nodes.len() {
                        return Err(ErrorKind::dangling_node(index, raw_nodes.len()).into());
                    }
                }
                ChildRef::Subsector(index) => {
                    if index as usize >= subsectors.len() {
                        return Err(
                            ErrorKind::dangling_subsector(index, subsectors.len()).into()
                        );
                    }
                }
            }
            *slot = child;
        }
        nodes.push(Node {
            x: Fixed::from_short(raw.x),
            y: Fixed::from_short(raw.y),
            dx: Fixed::from_short(raw.dx),
            dy: Fixed::from_short(raw.dy),
            bbox: raw.bbox,
            children,
        });
    }

    // The last node record is the root by convention; a level with no nodes
    // at all is a single lone subsector.
    let root = if nodes.is_empty() {
        if subsectors.is_empty() {
            return Err(ErrorKind::empty_level().into());
        }
        ChildRef::Subsector(0)
    } else {
        ChildRef::Node((nodes.len() - 1) as u32)
    };
    Ok((nodes, root))
}

fn check_seg_vertices(vertices: &[Vertex], segs: &[Seg]) -> Result<()> {
    for (index, seg) in segs.iter().enumerate() {
        for &vertex in &[seg.start_vertex, seg.end_vertex] {
            if vertex as usize >= vertices.len() {
                return Err(ErrorKind::dangling_seg_vertex(index, vertex, vertices.len()).into());
            }
        }
    }
    Ok(())
}

fn check_subsectors(segs: &[Seg], subsectors: &[Subsector]) -> Result<()> {
    let total: u64 = subsectors.iter().map(|s| u64::from(s.seg_count)).sum();
    if total != segs.len() as u64 {
        return Err(ErrorKind::seg_count_mismatch(total, segs.len()).into());
    }
    for (index, subsector) in subsectors.iter().enumerate() {
        let end = u64::from(subsector.first_seg) + u64::from(subsector.seg_count);
        if end > segs.len() as u64 {
            return Err(ErrorKind::dangling_seg_range(
                index,
                subsector.first_seg,
                subsector.seg_count,
                segs.len(),
            )
            .into());
        }
    }
    Ok(())
}

/// Defensive pass over the node graph: every node must be reachable at most
/// once from the root, otherwise a corrupt archive could send consumers into
/// unbounded recursion.
pub(crate) fn validate_acyclic(nodes: &[Node], root: ChildRef) -> Result<()> {
    let start = match root {
        ChildRef::Node(index) => index,
        ChildRef::Subsector(_) => return Ok(()),
    };
    let mut visited = vec![false; nodes.len()];
    let mut pending = vec![start];
    while let Some(index) = pending.pop() {
        let seen = &mut visited[index as usize];
        if *seen {
            return Err(ErrorKind::tree_cycle(index).into());
        }
        *seen = true;
        for &child in &nodes[index as usize].children {
            if let ChildRef::Node(child_index) = child {
                pending.push(child_index);
            }
        }
    }
    Ok(())
}
