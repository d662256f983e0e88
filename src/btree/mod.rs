//! # B-Tree Nodes
//!
//! Node typing and the leaf-node page format. The layout anticipates a full
//! B-tree (the common header reserves a root flag and a parent page number),
//! but only the single-leaf-root shape is implemented: no splits, no
//! internal-node descent, no sibling chaining.

mod leaf;

pub use leaf::{LeafHeader, LeafNode, LeafNodeMut, SearchResult};

use eyre::{bail, ensure, Result};

/// Node type tag stored in the first byte of every page.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Internal = 0,
    Leaf = 1,
}

impl NodeType {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(NodeType::Internal),
            1 => Ok(NodeType::Leaf),
            other => bail!("invalid node type byte: {:#04x}", other),
        }
    }
}

/// Reads the node type of a page without committing to a leaf view.
pub fn node_type(page: &[u8]) -> Result<NodeType> {
    ensure!(!page.is_empty(), "empty page has no node header");
    NodeType::from_byte(page[0])
}

/// Stamps the node type byte of a page.
pub fn set_node_type(page: &mut [u8], node_type: NodeType) -> Result<()> {
    ensure!(!page.is_empty(), "empty page has no node header");
    page[0] = node_type as u8;
    Ok(())
}
