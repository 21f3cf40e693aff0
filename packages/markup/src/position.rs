use crate::serializer::{layout, open_tag, Layout};
use braid_model::{DictionaryError, Node, NodeDictionary, NodePayload, SchemaSet};
use serde::{Deserialize, Serialize};

/// 1-based line/column position in the text snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Map a node id to the position where its content begins in the snapshot.
///
/// Works in two steps, neither of which re-parses the text:
///
/// 1. walk the serializer's traversal from the root down to the node,
///    accumulating the node's offset in the *flat* rendering (every line
///    stripped of leading whitespace and joined, exactly the form the
///    parser consumes). Cost is proportional to the node's depth plus the
///    size of preceding siblings.
/// 2. convert that flat offset back into line/column against the snapshot
///    actually on screen, whatever its line structure is.
pub fn position_of(
    id: &str,
    dict: &NodeDictionary,
    schemas: &SchemaSet,
    lines: &[String],
) -> Result<Position, DictionaryError> {
    let offset = flat_content_offset(id, dict, schemas)?;
    Ok(offset_to_position(offset, lines))
}

/// Length of a node's flat (indent-free, newline-free) rendering
fn flat_len(node: &Node, dict: &NodeDictionary, schemas: &SchemaSet) -> usize {
    match &node.payload {
        NodePayload::Text { value } => value.len(),
        NodePayload::Element { .. } => {
            let open = open_tag(node, schemas).len();
            match layout(node, dict) {
                // `<p attrs>` renders as `<p attrs />`
                Layout::SelfClosed => open + 2,
                Layout::Inline | Layout::Block => {
                    let children: usize = dict
                        .children_of(&node.id)
                        .map(|c| flat_len(c, dict, schemas))
                        .sum();
                    // open tag + children + `</name>`
                    open + children + node.type_name.len() + 3
                }
            }
        }
    }
}

/// Flat offset of the point where the node's content begins
fn flat_content_offset(
    id: &str,
    dict: &NodeDictionary,
    schemas: &SchemaSet,
) -> Result<usize, DictionaryError> {
    let target = dict.require(id)?;

    // Ancestor path, root first
    let mut path = vec![target.id.as_str()];
    let mut cursor = target;
    while let Some(parent_id) = cursor.parent.as_deref() {
        path.push(parent_id);
        cursor = dict.require(parent_id)?;
    }
    path.reverse();

    let mut offset = 0usize;
    let mut node = dict.root();
    for next_id in &path[1..] {
        // step inside this ancestor, then past the siblings before the target
        offset += open_tag(node, schemas).len();
        for sibling in dict.children_of(&node.id) {
            if sibling.id == *next_id {
                break;
            }
            offset += flat_len(sibling, dict, schemas);
        }
        node = dict.require(next_id)?;
    }

    Ok(match &node.payload {
        // a text node's content is the node itself
        NodePayload::Text { .. } => offset,
        // content begins after the open tag; for self-closed elements the
        // same length lands where content would be typed, before the `/>`
        NodePayload::Element { .. } => offset + open_tag(node, schemas).len(),
    })
}

/// Convert a flat offset into line/column against the on-screen lines.
/// Each line contributes its content without leading whitespace, matching
/// the normalization applied before parsing.
fn offset_to_position(offset: usize, lines: &[String]) -> Position {
    let mut consumed = 0usize;
    for (index, line) in lines.iter().enumerate() {
        let stripped = line.trim_start();
        if offset < consumed + stripped.len() {
            let indent = line.len() - stripped.len();
            return Position {
                line: index + 1,
                column: indent + (offset - consumed) + 1,
            };
        }
        consumed += stripped.len();
    }

    // past the end of the snapshot: clamp to the end of the last line
    match lines.last() {
        Some(last) => Position {
            line: lines.len(),
            column: last.len() + 1,
        },
        None => Position { line: 1, column: 1 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::serializer::serialize;
    use braid_model::{IdGenerator, Schema};

    fn schemas() -> SchemaSet {
        SchemaSet::new()
            .with("div", Schema::default())
            .with("p", Schema::default())
            .with("img", Schema::default())
    }

    fn fixture(source: &str) -> (NodeDictionary, Vec<String>) {
        let schemas = schemas();
        let dict = Parser::new(source, IdGenerator::new("/test.bd"), &schemas)
            .parse_document()
            .unwrap();
        let lines = serialize(&dict, &schemas);
        (dict, lines)
    }

    #[test]
    fn test_root_position() {
        let (dict, lines) = fixture("<p>hello</p>");
        let pos = position_of(dict.root_id(), &dict, &schemas(), &lines).unwrap();

        // content begins right after `<p>`
        assert_eq!(pos, Position { line: 1, column: 4 });
    }

    #[test]
    fn test_text_inside_inline_element() {
        let (dict, lines) = fixture("<p>hello</p>");
        let text_id = dict.root().children[0].clone();
        let pos = position_of(&text_id, &dict, &schemas(), &lines).unwrap();

        assert_eq!(pos, Position { line: 1, column: 4 });
        // the position indeed points at the text
        assert_eq!(&lines[0][pos.column - 1..pos.column + 4], "hello");
    }

    #[test]
    fn test_nested_block_positions() {
        let (dict, lines) = fixture("<div><p>a</p><div><p>b</p></div></div>");
        // lines: <div> / "  <p>a</p>" / "  <div>" / "    <p>b</p>" / "  </div>" / </div>

        let outer_p = dict.root().children[0].clone();
        let inner_div = dict.root().children[1].clone();
        let inner_p = dict.get(&inner_div).unwrap().children[0].clone();

        // content of the outer p is the `a` on line 2
        assert_eq!(
            position_of(&outer_p, &dict, &schemas(), &lines).unwrap(),
            Position { line: 2, column: 6 }
        );
        // the inner div's content begins at its first child's line
        assert_eq!(
            position_of(&inner_div, &dict, &schemas(), &lines).unwrap(),
            Position { line: 4, column: 5 }
        );
        assert_eq!(
            position_of(&inner_p, &dict, &schemas(), &lines).unwrap(),
            Position { line: 4, column: 8 }
        );
    }

    #[test]
    fn test_positions_against_unformatted_snapshot() {
        // the snapshot a local edit leaves behind is one raw line, not the
        // serializer's pretty-printed layout
        let source = "<div><p>a</p><div><p>b</p></div></div>";
        let schemas = schemas();
        let dict = Parser::new(source, IdGenerator::new("/test.bd"), &schemas)
            .parse_document()
            .unwrap();
        let lines = vec![source.to_string()];

        let outer_p = dict.root().children[0].clone();
        let pos = position_of(&outer_p, &dict, &schemas, &lines).unwrap();
        assert_eq!(pos, Position { line: 1, column: 9 });
        assert_eq!(&source[pos.column - 1..pos.column], "a");
    }

    #[test]
    fn test_every_id_maps_within_bounds() {
        let (dict, lines) =
            fixture("<div><p>hello</p><div><img /><p>world wide</p></div><p>tail</p></div>");
        let schemas = schemas();

        for id in dict.ids() {
            let pos = position_of(id, &dict, &schemas, &lines).unwrap();
            assert!(pos.line >= 1 && pos.line <= lines.len(), "line for {}", id);
            assert!(
                pos.column >= 1 && pos.column <= lines[pos.line - 1].len() + 1,
                "column for {}",
                id
            );
        }
    }

    #[test]
    fn test_unknown_id_fails() {
        let (dict, lines) = fixture("<p>hello</p>");
        let err = position_of("nonexistent", &dict, &schemas(), &lines).unwrap_err();
        assert_eq!(err, DictionaryError::UnknownId("nonexistent".to_string()));
    }
}
