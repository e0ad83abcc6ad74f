use error_chain::error_chain;

error_chain! {
    foreign_links {}
    errors {
        TruncatedData(message: String) {
            description("Truncated lump data.")
            display("Truncated lump data: {}", message)
        }
        OutOfRange(message: String) {
            description("Cursor position out of range.")
            display("Cursor position out of range: {}", message)
        }
        MalformedLump(message: String) {
            description("Malformed lump.")
            display("Malformed lump: {}", message)
        }
        InconsistentGeometry(message: String) {
            description("Inconsistent level geometry.")
            display("Inconsistent level geometry: {}", message)
        }
        DanglingReference(message: String) {
            description("Dangling geometry reference.")
            display("Dangling geometry reference: {}", message)
        }
        CyclicTree(message: String) {
            description("Cycle in BSP node graph.")
            display("Cycle in BSP node graph: {}", message)
        }
    }
    links {}
}

impl ErrorKind {
    pub fn truncated_read(needed: usize, remaining: usize) -> ErrorKind {
        ErrorKind::TruncatedData(format!("needed {} byte(s), only {} left", needed, remaining))
    }

    pub fn seek_out_of_range(target: usize, len: usize) -> ErrorKind {
        ErrorKind::OutOfRange(format!("seek to {} in a {} byte region", target, len))
    }

    pub fn bad_lump_size(name: &str, total_size: usize, element_size: usize) -> ErrorKind {
        ErrorKind::MalformedLump(format!(
            "invalid lump size in `{}`: total={}, element={}, div={}, mod={}",
            name,
            total_size,
            element_size,
            total_size / element_size,
            total_size % element_size
        ))
    }

    pub fn bad_signature(bytes: &[u8]) -> ErrorKind {
        ErrorKind::MalformedLump(format!(
            "unrecognized nodes signature `{}`",
            String::from_utf8_lossy(bytes)
        ))
    }

    pub fn bad_seg_side(seg_index: usize, value: u16) -> ErrorKind {
        ErrorKind::MalformedLump(format!(
            "seg {} has side {}, expected 0 or 1",
            seg_index, value
        ))
    }

    pub fn empty_level() -> ErrorKind {
        ErrorKind::MalformedLump("level has no nodes and no subsectors".to_owned())
    }

    pub fn seg_count_mismatch(total: u64, num_segs: usize) -> ErrorKind {
        ErrorKind::InconsistentGeometry(format!(
            "subsector seg counts sum to {} but the seg table has {} entries",
            total, num_segs
        ))
    }

    pub fn seg_count_overflow(subsector_index: usize) -> ErrorKind {
        ErrorKind::InconsistentGeometry(format!(
            "subsector seg counts overflow at subsector {}",
            subsector_index
        ))
    }

    pub fn dangling_node(index: u32, num_nodes: usize) -> ErrorKind {
        ErrorKind::DanglingReference(format!(
            "child node {} out of range ({} nodes)",
            index, num_nodes
        ))
    }

    pub fn dangling_subsector(index: u32, num_subsectors: usize) -> ErrorKind {
        ErrorKind::DanglingReference(format!(
            "child subsector {} out of range ({} subsectors)",
            index, num_subsectors
        ))
    }

    pub fn dangling_seg_vertex(seg_index: usize, vertex: u32, num_vertices: usize) -> ErrorKind {
        ErrorKind::DanglingReference(format!(
            "seg {} references vertex {} out of range ({} vertices)",
            seg_index, vertex, num_vertices
        ))
    }

    pub fn dangling_seg_range(
        subsector_index: usize,
        first_seg: u32,
        seg_count: u32,
        num_segs: usize,
    ) -> ErrorKind {
        ErrorKind::DanglingReference(format!(
            "subsector {} covers segs {}..{} out of range ({} segs)",
            subsector_index,
            first_seg,
            u64::from(first_seg) + u64::from(seg_count),
            num_segs
        ))
    }

    pub fn tree_cycle(node_index: u32) -> ErrorKind {
        ErrorKind::CyclicTree(format!("node {} reachable twice from the root", node_index))
    }
}
