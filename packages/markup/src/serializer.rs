use braid_model::{Node, NodeDictionary, NodePayload, SchemaSet};

/// Serialize a node dictionary to text lines.
///
/// Pre-order, 2-space indent per depth. The layout rules are shared with the
/// position mapper through the helpers below, so positions never drift from
/// the emitted text.
pub fn serialize(dict: &NodeDictionary, schemas: &SchemaSet) -> Vec<String> {
    Serializer::new().serialize(dict, schemas)
}

/// How an element renders
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Layout {
    /// No children: `<p />` on one line
    SelfClosed,
    /// Only text children: `<p>hello</p>` on one line
    Inline,
    /// Element children: open line, indented children, close line
    Block,
}

pub(crate) fn layout(node: &Node, dict: &NodeDictionary) -> Layout {
    if node.children.is_empty() {
        Layout::SelfClosed
    } else if dict
        .children_of(&node.id)
        .all(|c| matches!(c.payload, NodePayload::Text { .. }))
    {
        Layout::Inline
    } else {
        Layout::Block
    }
}

/// Render the open tag `<name attr="value"…>`. Attributes declared by the
/// schema come first in declaration order; the rest follow alphabetically.
pub(crate) fn open_tag(node: &Node, schemas: &SchemaSet) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(&node.type_name);

    if let NodePayload::Element { attributes } = &node.payload {
        let declared: &[String] = schemas
            .get(&node.type_name)
            .map(|s| s.attributes.as_slice())
            .unwrap_or(&[]);

        let mut ordered: Vec<(&String, &String)> = Vec::with_capacity(attributes.len());
        for name in declared {
            if let Some(value) = attributes.get(name) {
                ordered.push((name, value));
            }
        }
        for (name, value) in attributes {
            if !declared.contains(name) {
                ordered.push((name, value));
            }
        }

        for (name, value) in ordered {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
    }

    out.push('>');
    out
}

pub struct Serializer {
    indent_string: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_string: "  ".to_string(), // 2 spaces
        }
    }

    pub fn serialize(&self, dict: &NodeDictionary, schemas: &SchemaSet) -> Vec<String> {
        let mut lines = Vec::new();
        self.write_node(dict.root(), dict, schemas, 0, &mut lines);
        lines
    }

    fn write_node(
        &self,
        node: &Node,
        dict: &NodeDictionary,
        schemas: &SchemaSet,
        depth: usize,
        lines: &mut Vec<String>,
    ) {
        let indent = self.indent_string.repeat(depth);

        match &node.payload {
            NodePayload::Text { value } => {
                lines.push(format!("{}{}", indent, value));
            }
            NodePayload::Element { .. } => match layout(node, dict) {
                Layout::SelfClosed => {
                    let open = open_tag(node, schemas);
                    // `<p attrs>` renders as `<p attrs />`
                    lines.push(format!("{}{} />", indent, &open[..open.len() - 1]));
                }
                Layout::Inline => {
                    let mut line = format!("{}{}", indent, open_tag(node, schemas));
                    for child in dict.children_of(&node.id) {
                        if let NodePayload::Text { value } = &child.payload {
                            line.push_str(value);
                        }
                    }
                    line.push_str("</");
                    line.push_str(&node.type_name);
                    line.push('>');
                    lines.push(line);
                }
                Layout::Block => {
                    lines.push(format!("{}{}", indent, open_tag(node, schemas)));
                    for child in dict.children_of(&node.id) {
                        self.write_node(child, dict, schemas, depth + 1, lines);
                    }
                    lines.push(format!("{}</{}>", indent, node.type_name));
                }
            },
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}
