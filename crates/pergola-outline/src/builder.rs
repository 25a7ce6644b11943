//! Outline construction from flat heading sequences.

use serde::Serialize;

/// A document heading as produced by the content pipeline.
///
/// Headings arrive in the order they appear in the source document, and
/// that order is never changed. Identifiers are assumed unique within a
/// document; nothing here verifies that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Anchor identifier
    pub id: String,

    /// Nesting rank; smaller values sit higher in the hierarchy
    pub level: u8,

    /// Display text
    pub text: String,
}

impl Heading {
    /// Create a heading record.
    pub fn new(id: impl Into<String>, level: u8, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            text: text.into(),
        }
    }
}

/// A node in the document outline tree.
///
/// Carries its source heading's fields verbatim plus the headings nested
/// beneath it, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    pub id: String,
    pub level: u8,
    pub text: String,
    pub children: Vec<OutlineNode>,
}

impl From<&Heading> for OutlineNode {
    fn from(heading: &Heading) -> Self {
        Self {
            id: heading.id.clone(),
            level: heading.level,
            text: heading.text.clone(),
            children: Vec::new(),
        }
    }
}

/// Build an outline forest from a flat, document-ordered heading list.
///
/// Each heading attaches under the nearest preceding heading with a
/// strictly smaller level; headings with no such predecessor become
/// roots. Equal levels are siblings, never parent and child, and level
/// gaps are preserved as-is: a level-3 heading with no intervening
/// level-2 still attaches under the closest level-1.
///
/// A single forward pass over a stack of currently-open ancestors. The
/// stack is strictly increasing in level from bottom to top, so a heading
/// closes every open node at its own level or deeper and then nests under
/// whatever remains. A pre-order walk of the result reproduces the input
/// exactly.
pub fn build(headings: &[Heading]) -> Vec<OutlineNode> {
    let mut roots = Vec::new();
    let mut open: Vec<OutlineNode> = Vec::new();

    for heading in headings {
        // Anything as deep as this heading can no longer gain children.
        while let Some(finished) = open.pop_if(|node| node.level >= heading.level) {
            attach(&mut open, &mut roots, finished);
        }
        open.push(OutlineNode::from(heading));
    }

    while let Some(finished) = open.pop() {
        attach(&mut open, &mut roots, finished);
    }

    roots
}

/// Hand a finished subtree to the node now on top of the stack, or to the
/// root list when nothing remains open. Subtrees finish in document
/// order, so plain pushes keep siblings ordered.
fn attach(open: &mut [OutlineNode], roots: &mut Vec<OutlineNode>, node: OutlineNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn heading(id: &str, level: u8) -> Heading {
        Heading::new(id, level, id.to_uppercase())
    }

    fn ids(nodes: &[OutlineNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn preorder<'a>(nodes: &'a [OutlineNode], out: &mut Vec<(&'a str, u8, &'a str)>) {
        for node in nodes {
            out.push((&node.id, node.level, &node.text));
            preorder(&node.children, out);
        }
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        assert_eq!(build(&[]), Vec::<OutlineNode>::new());
    }

    #[test]
    fn single_heading_is_a_root() {
        let forest = build(&[heading("intro", 2)]);

        assert_eq!(ids(&forest), vec!["intro"]);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn flat_run_of_equal_levels_stays_flat() {
        let forest = build(&[heading("a", 1), heading("b", 1), heading("c", 1)]);

        assert_eq!(ids(&forest), vec!["a", "b", "c"]);
        assert!(forest.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn deeper_headings_nest_under_the_previous_shallower_one() {
        let forest = build(&[heading("a", 1), heading("b", 2), heading("c", 2)]);

        assert_eq!(ids(&forest), vec!["a"]);
        assert_eq!(ids(&forest[0].children), vec!["b", "c"]);
    }

    #[test]
    fn level_gap_attaches_to_nearest_shallower_not_nearest_preceding() {
        // 1,3,2: the level-2 heading skips past the level-3 (3 is not
        // shallower than 2) and lands beside it under the level-1.
        let forest = build(&[heading("a", 1), heading("b", 3), heading("c", 2)]);

        assert_eq!(ids(&forest), vec!["a"]);
        assert_eq!(ids(&forest[0].children), vec!["b", "c"]);
        assert!(forest[0].children[0].children.is_empty());
    }

    #[test]
    fn returning_to_a_shallower_level_starts_a_new_root() {
        let forest = build(&[
            heading("a", 1),
            heading("b", 2),
            heading("c", 1),
            heading("d", 2),
        ]);

        assert_eq!(ids(&forest), vec!["a", "c"]);
        assert_eq!(ids(&forest[0].children), vec!["b"]);
        assert_eq!(ids(&forest[1].children), vec!["d"]);
    }

    #[test]
    fn document_starting_deep_still_roots_its_first_heading() {
        let forest = build(&[heading("a", 4), heading("b", 2), heading("c", 3)]);

        assert_eq!(ids(&forest), vec!["a", "b"]);
        assert!(forest[0].children.is_empty());
        assert_eq!(ids(&forest[1].children), vec!["c"]);
    }

    #[test]
    fn strictly_increasing_levels_build_a_linear_chain() {
        let headings: Vec<Heading> = (1..=6)
            .map(|level| heading(&format!("h{level}"), level))
            .collect();

        let forest = build(&headings);

        assert_eq!(forest.len(), 1);
        let mut depth = 0;
        let mut node = &forest[0];
        while let [child] = node.children.as_slice() {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, 5);
        assert!(node.children.is_empty());
    }

    #[test]
    fn preorder_walk_reproduces_the_input_sequence() {
        let headings = vec![
            heading("a", 1),
            heading("b", 3),
            heading("c", 2),
            heading("d", 5),
            heading("e", 5),
            heading("f", 2),
            heading("g", 1),
            heading("h", 4),
        ];

        let forest = build(&headings);

        let mut walked = Vec::new();
        preorder(&forest, &mut walked);
        let expected: Vec<(&str, u8, &str)> = headings
            .iter()
            .map(|h| (h.id.as_str(), h.level, h.text.as_str()))
            .collect();
        assert_eq!(walked, expected);
    }

    #[test]
    fn duplicate_ids_are_kept_as_given() {
        let forest = build(&[heading("dup", 1), heading("dup", 2), heading("dup", 2)]);

        assert_eq!(ids(&forest), vec!["dup"]);
        assert_eq!(ids(&forest[0].children), vec!["dup", "dup"]);
    }

    #[test]
    fn fields_are_copied_verbatim() {
        let forest = build(&[Heading::new("getting-started", 2, "Getting Started")]);

        assert_eq!(
            forest,
            vec![OutlineNode {
                id: "getting-started".to_string(),
                level: 2,
                text: "Getting Started".to_string(),
                children: vec![],
            }]
        );
    }
}
