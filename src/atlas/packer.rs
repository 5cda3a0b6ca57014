use tracing::trace;

use crate::types::Tile;

/// Index of a node in the packer arena.
type NodeId = usize;

const ROOT: NodeId = 0;

/// A node of the packing tree: a leaf, or an internal node whose two
/// children partition its area.
#[derive(Debug, Clone)]
struct PackNode {
    rect: Tile,
    children: Option<[NodeId; 2]>,
    occupied: bool,
}

impl PackNode {
    fn leaf(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            rect: Tile::new(x, y, width, height),
            children: None,
            occupied: false,
        }
    }
}

/// Binary-tree rectangle packer (blackpawn lightmap packing).
///
/// Online and first-fit: each request is placed in the first free leaf that
/// can hold it, in depth-first order, and placed rectangles never move.
#[derive(Debug, Clone)]
pub struct RectanglePacker {
    nodes: Vec<PackNode>,
}

impl RectanglePacker {
    /// Create a packer spanning a `width x height` canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            nodes: vec![PackNode::leaf(0, 0, width, height)],
        }
    }

    /// Canvas size this packer covers.
    pub fn size(&self) -> (u32, u32) {
        self.nodes[ROOT].rect.dimensions()
    }

    /// Number of nodes allocated so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Place a `width x height` rectangle, or `None` if no free region fits.
    pub fn pack(&mut self, width: u32, height: u32) -> Option<Tile> {
        if width == 0 || height == 0 {
            return None;
        }

        // Depth-first, child 0 before child 1.
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            if let Some([first, second]) = self.nodes[id].children {
                stack.push(second);
                stack.push(first);
                continue;
            }
            if let Some(tile) = self.place_in_leaf(id, width, height) {
                return Some(tile);
            }
        }

        None
    }

    fn place_in_leaf(&mut self, id: NodeId, width: u32, height: u32) -> Option<Tile> {
        let node = &self.nodes[id];
        if node.occupied {
            return None;
        }

        let rect = node.rect;
        if width > rect.width || height > rect.height {
            return None;
        }

        if width == rect.width && height == rect.height {
            self.nodes[id].occupied = true;
            return Some(rect);
        }

        let dw = rect.width - width;
        let dh = rect.height - height;

        let (first, second) = if dw > dh {
            (
                PackNode::leaf(rect.x, rect.y, width, rect.height),
                PackNode::leaf(rect.x + width, rect.y, dw, rect.height),
            )
        } else {
            (
                PackNode::leaf(rect.x, rect.y, rect.width, height),
                PackNode::leaf(rect.x, rect.y + height, rect.width, dh),
            )
        };

        trace!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            vertical_cut = dw > dh,
            "Splitting packer node"
        );

        let first_id = self.nodes.len();
        self.nodes.push(first);
        self.nodes.push(second);
        self.nodes[id].children = Some([first_id, first_id + 1]);

        // The first child matches the request along the split axis, so this
        // recurses at most once more.
        self.place_in_leaf(first_id, width, height)
    }
}
