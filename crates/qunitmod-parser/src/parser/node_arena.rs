//! Arena storage: node allocation, flags, and the comment side table.

use qunitmod_common::comments::Comment;

use super::base::NodeIndex;
use super::node::{Node, NodeArena, NodeComments, NodeData, NodeKind, node_flags};

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            comments: Default::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node and return its index.
    pub fn add_node(&mut self, pos: u32, end: u32, flags: u16, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            pos,
            end,
            flags,
            data,
        });
        index
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get(index.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get_mut(index.0 as usize)
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|node| &node.data)
    }

    #[inline]
    pub fn data_mut(&mut self, index: NodeIndex) -> Option<&mut NodeData> {
        self.get_mut(index).map(|node| &mut node.data)
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<NodeKind> {
        self.get(index).map(Node::kind)
    }

    #[inline]
    pub fn is_kind(&self, index: NodeIndex, kind: NodeKind) -> bool {
        self.kind(index) == Some(kind)
    }

    // =========================================================================
    // Flags
    // =========================================================================

    pub fn has_blank_line_before(&self, index: NodeIndex) -> bool {
        self.get(index).is_some_and(Node::has_blank_line_before)
    }

    pub fn set_blank_line_before(&mut self, index: NodeIndex, value: bool) {
        if let Some(node) = self.get_mut(index) {
            if value {
                node.flags |= node_flags::BLANK_LINE_BEFORE;
            } else {
                node.flags &= !node_flags::BLANK_LINE_BEFORE;
            }
        }
    }

    // =========================================================================
    // Comments
    // =========================================================================

    pub fn comments(&self, index: NodeIndex) -> Option<&NodeComments> {
        self.comments.get(&index)
    }

    pub fn leading_comments(&self, index: NodeIndex) -> &[Comment] {
        self.comments
            .get(&index)
            .map_or(&[][..], |c| c.leading.as_slice())
    }

    pub fn trailing_comments(&self, index: NodeIndex) -> &[Comment] {
        self.comments
            .get(&index)
            .map_or(&[][..], |c| c.trailing.as_slice())
    }

    pub fn dangling_comments(&self, index: NodeIndex) -> &[Comment] {
        self.comments
            .get(&index)
            .map_or(&[][..], |c| c.dangling.as_slice())
    }

    pub fn add_leading_comments(&mut self, index: NodeIndex, comments: Vec<Comment>) {
        if comments.is_empty() || index.is_none() {
            return;
        }
        self.comments
            .entry(index)
            .or_default()
            .leading
            .extend(comments);
    }

    pub fn add_trailing_comments(&mut self, index: NodeIndex, comments: Vec<Comment>) {
        if comments.is_empty() || index.is_none() {
            return;
        }
        self.comments
            .entry(index)
            .or_default()
            .trailing
            .extend(comments);
    }

    pub fn add_dangling_comments(&mut self, index: NodeIndex, comments: Vec<Comment>) {
        if comments.is_empty() || index.is_none() {
            return;
        }
        self.comments
            .entry(index)
            .or_default()
            .dangling
            .extend(comments);
    }

    /// Remove and return every comment attached to `index`.
    pub fn take_comments(&mut self, index: NodeIndex) -> NodeComments {
        self.comments.remove(&index).unwrap_or_default()
    }

    /// Move leading and trailing comments from one node to another.
    /// Comments already on `to` are kept; moved leading comments go first.
    pub fn move_comments(&mut self, from: NodeIndex, to: NodeIndex) {
        if from == to || to.is_none() {
            return;
        }
        let moved = self.take_comments(from);
        if moved.is_empty() {
            return;
        }
        let target = self.comments.entry(to).or_default();
        let mut leading = moved.leading;
        leading.append(&mut target.leading);
        target.leading = leading;
        target.trailing.extend(moved.trailing);
        target.dangling.extend(moved.dangling);
    }

    /// Copy leading and trailing comments without removing them from `from`.
    pub fn copy_comments(&mut self, from: NodeIndex, to: NodeIndex) {
        if from == to || to.is_none() {
            return;
        }
        let Some(source) = self.comments.get(&from).cloned() else {
            return;
        };
        let target = self.comments.entry(to).or_default();
        target.leading.extend(source.leading);
        target.trailing.extend(source.trailing);
    }
}
