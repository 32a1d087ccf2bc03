use std::fmt;

pub mod markup;

/// Handle into a [`Dom`] arena. Stable for the lifetime of the tree; the
/// arena only grows, so detached nodes keep their ids and become unreachable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Body,
    Div,
    P,
    H1,
    H2,
    H3,
    Blockquote,
    Pre,
    Ul,
    Ol,
    Li,
    Table,
    Tr,
    Td,
    Br,
    Hr,
    Img,
    A,
    B,
    I,
    U,
    Code,
    Span,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Body => "body",
            Tag::Div => "div",
            Tag::P => "p",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::Blockquote => "blockquote",
            Tag::Pre => "pre",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Table => "table",
            Tag::Tr => "tr",
            Tag::Td => "td",
            Tag::Br => "br",
            Tag::Hr => "hr",
            Tag::Img => "img",
            Tag::A => "a",
            Tag::B => "b",
            Tag::I => "i",
            Tag::U => "u",
            Tag::Code => "code",
            Tag::Span => "span",
        }
    }

    pub fn from_name(name: &str) -> Option<Tag> {
        let tag = match name {
            "body" => Tag::Body,
            "div" => Tag::Div,
            "p" => Tag::P,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "blockquote" => Tag::Blockquote,
            "pre" => Tag::Pre,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "table" => Tag::Table,
            "tr" => Tag::Tr,
            "td" => Tag::Td,
            "br" => Tag::Br,
            "hr" => Tag::Hr,
            "img" => Tag::Img,
            "a" => Tag::A,
            "b" => Tag::B,
            "i" => Tag::I,
            "u" => Tag::U,
            "code" => Tag::Code,
            "span" => Tag::Span,
            _ => return None,
        };
        Some(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-injected rendering predicates. The core never decides on its own
/// which tags lay out as blocks or carry no content; the tree's owner does.
#[derive(Clone, Copy, Debug)]
pub struct Schema {
    pub is_block: fn(Tag) -> bool,
    pub is_void: fn(Tag) -> bool,
}

impl Schema {
    pub fn html() -> Self {
        Schema {
            is_block: html_block,
            is_void: html_void,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::html()
    }
}

fn html_block(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::Body
            | Tag::Div
            | Tag::P
            | Tag::H1
            | Tag::H2
            | Tag::H3
            | Tag::Blockquote
            | Tag::Pre
            | Tag::Ul
            | Tag::Ol
            | Tag::Li
            | Tag::Table
            | Tag::Tr
            | Tag::Td
    )
}

fn html_void(tag: Tag) -> bool {
    matches!(tag, Tag::Br | Tag::Hr | Tag::Img)
}

#[derive(Clone, Debug)]
enum NodeData {
    Element {
        tag: Tag,
        attrs: Vec<(String, String)>,
        children: Vec<NodeId>,
        hidden: bool,
    },
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

/// The host-owned content tree: an element/text-node arena with a fixed
/// `body` root. Text offsets everywhere in this crate are char offsets.
#[derive(Clone, Debug)]
pub struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
    schema: Schema,
}

impl Dom {
    pub fn new() -> Self {
        Self::with_schema(Schema::html())
    }

    pub fn with_schema(schema: Schema) -> Self {
        let root = Node {
            parent: None,
            data: NodeData::Element {
                tag: Tag::Body,
                attrs: Vec::new(),
                children: Vec::new(),
                hidden: false,
            },
        };
        Dom {
            nodes: vec![root],
            root: NodeId(0),
            schema,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ==================== building ====================

    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        self.push(Node {
            parent: None,
            data: NodeData::Element {
                tag,
                attrs: Vec::new(),
                children: Vec::new(),
                hidden: false,
            },
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node {
            parent: None,
            data: NodeData::Text(text.to_string()),
        })
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let at = self.children(parent).len();
        self.insert_child(parent, at, child)
    }

    /// Attach `child` under `parent` at `index` (clamped). Moves the node if
    /// it is attached elsewhere. Refuses text parents, the root as child and
    /// anything that would create a cycle.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> bool {
        if !self.is_element(parent) || child == self.root || self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        let index = index.min(self.children(parent).len());
        if let NodeData::Element { children, .. } = &mut self.nodes[parent.index()].data {
            children.insert(index, child);
        }
        self.nodes[child.index()].parent = Some(parent);
        true
    }

    /// Unlink a node from its parent. The node keeps its subtree and its id
    /// but is no longer reachable from the root.
    pub fn detach(&mut self, node: NodeId) -> bool {
        if node == self.root {
            return false;
        }
        let Some(parent) = self.parent(node) else {
            return false;
        };
        let Some(at) = self.child_index(node) else {
            return false;
        };
        if let NodeData::Element { children, .. } = &mut self.nodes[parent.index()].data {
            children.remove(at);
        }
        self.nodes[node.index()].parent = None;
        true
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        match &mut self.nodes[node.index()].data {
            NodeData::Text(value) => {
                *value = text.to_string();
                true
            }
            NodeData::Element { .. } => false,
        }
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        match &mut self.nodes[node.index()].data {
            NodeData::Element { attrs, .. } => {
                if let Some(entry) = attrs.iter_mut().find(|(n, _)| n == name) {
                    entry.1 = value.to_string();
                } else {
                    attrs.push((name.to_string(), value.to_string()));
                }
                true
            }
            NodeData::Text(_) => false,
        }
    }

    /// Marks an element as computed-invisible. Hidden subtrees are skipped
    /// by leaf navigation.
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) -> bool {
        match &mut self.nodes[node.index()].data {
            NodeData::Element { hidden: flag, .. } => {
                *flag = hidden;
                true
            }
            NodeData::Text(_) => false,
        }
    }

    /// Split a text node at a char offset (clamped). The original keeps the
    /// left part; the right part becomes a new node inserted as the next
    /// sibling, and its id is returned.
    pub fn split_text(&mut self, node: NodeId, char_offset: usize) -> Option<NodeId> {
        let text = self.text(node)?.to_string();
        let at = char_to_byte_idx(&text, char_offset);
        let right = text[at..].to_string();
        if let NodeData::Text(value) = &mut self.nodes[node.index()].data {
            value.truncate(at);
        }
        let parent = self.nodes[node.index()].parent;
        let new_id = self.push(Node {
            parent,
            data: NodeData::Text(right),
        });
        if let Some(parent) = parent
            && let Some(at) = self.child_index(node)
            && let NodeData::Element { children, .. } = &mut self.nodes[parent.index()].data
        {
            children.insert(at + 1, new_id);
        }
        Some(new_id)
    }

    /// Insert a new element between `node` and its parent, taking the node's
    /// place in the child list. Returns the wrapper's id.
    pub fn wrap(&mut self, node: NodeId, tag: Tag) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let at = self.child_index(node)?;
        let wrapper = self.push(Node {
            parent: Some(parent),
            data: NodeData::Element {
                tag,
                attrs: Vec::new(),
                children: vec![node],
                hidden: false,
            },
        });
        if let NodeData::Element { children, .. } = &mut self.nodes[parent.index()].data {
            children[at] = wrapper;
        }
        self.nodes[node.index()].parent = Some(wrapper);
        Some(wrapper)
    }

    // ==================== reading ====================

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match &self.nodes[node.index()].data {
            NodeData::Element { children, .. } => children,
            NodeData::Text(_) => &[],
        }
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).last().copied()
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let at = self.child_index(node)?;
        self.children(parent).get(at + 1).copied()
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let at = self.child_index(node)?;
        at.checked_sub(1).map(|i| self.children(parent)[i])
    }

    pub fn tag(&self, node: NodeId) -> Option<Tag> {
        match &self.nodes[node.index()].data {
            NodeData::Element { tag, .. } => Some(*tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.index()].data {
            NodeData::Text(value) => Some(value),
            NodeData::Element { .. } => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attrs(node)
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self, node: NodeId) -> &[(String, String)] {
        match &self.nodes[node.index()].data {
            NodeData::Element { attrs, .. } => attrs,
            NodeData::Text(_) => &[],
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.index()].data, NodeData::Text(_))
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.index()].data, NodeData::Element { .. })
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        matches!(
            self.nodes[node.index()].data,
            NodeData::Element { hidden: true, .. }
        )
    }

    pub fn is_void(&self, node: NodeId) -> bool {
        self.tag(node).is_some_and(self.schema.is_void)
    }

    pub fn is_block_node(&self, node: NodeId) -> bool {
        self.tag(node).is_some_and(self.schema.is_block)
    }

    /// Child count for elements, char count for text nodes. This is the
    /// upper bound for a [`crate::Position`] offset on the node.
    pub fn node_len(&self, node: NodeId) -> usize {
        match &self.nodes[node.index()].data {
            NodeData::Element { children, .. } => children.len(),
            NodeData::Text(value) => value.chars().count(),
        }
    }

    pub fn child_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|c| *c == node)
    }

    /// Inclusive containment: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Intrinsic document order: pre-order over the tree, so an ancestor
    /// comes before its descendants. False for equal or unattached nodes.
    pub fn is_node_after(&self, node: NodeId, other: NodeId) -> bool {
        if node == other {
            return false;
        }
        match (self.path_from_root(node), self.path_from_root(other)) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    fn path_from_root(&self, node: NodeId) -> Option<Vec<usize>> {
        let mut steps = Vec::new();
        let mut cur = node;
        while cur != self.root {
            steps.push(self.child_index(cur)?);
            cur = self.parent(cur)?;
        }
        steps.reverse();
        Some(steps)
    }

    pub(crate) fn nearest_element(&self, node: NodeId) -> NodeId {
        if self.is_element(node) {
            node
        } else {
            self.parent(node).unwrap_or(node)
        }
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.index()].data {
            NodeData::Text(value) => out.push_str(value),
            NodeData::Element { children, .. } => {
                for child in children {
                    self.collect_text(*child, out);
                }
            }
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Dom::new()
    }
}

pub(crate) fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

#[cfg(test)]
#[path = "dom_tests.rs"]
mod dom_tests;
