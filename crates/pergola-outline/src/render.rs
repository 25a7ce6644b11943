//! Rendering an outline forest as nested navigation markup.

use crate::builder::OutlineNode;

/// Render an outline forest as nested ordered lists of anchor links.
///
/// Each node becomes a list item linking to `#<id>` with the node's text
/// as the label; nodes with children get a nested list built by the same
/// rule. An empty forest produces nothing at all, not even an empty
/// `<ol>`, so the host can decide whether to show any surrounding
/// container. Nesting depth follows the forest; there is no cap.
pub fn render(forest: &[OutlineNode]) -> String {
    let mut markup = String::new();
    render_list(forest, &mut markup);
    markup
}

fn render_list(nodes: &[OutlineNode], out: &mut String) {
    if nodes.is_empty() {
        return;
    }

    out.push_str("<ol>");
    for node in nodes {
        out.push_str("<li><a href=\"#");
        escape_into(&node.id, out);
        out.push_str("\">");
        escape_into(&node.text, out);
        out.push_str("</a>");
        render_list(&node.children, out);
        out.push_str("</li>");
    }
    out.push_str("</ol>");
}

// Covers both text and double-quoted attribute positions.
fn escape_into(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build, Heading};
    use pretty_assertions::assert_eq;

    fn heading(id: &str, level: u8, text: &str) -> Heading {
        Heading::new(id, level, text)
    }

    #[test]
    fn empty_forest_renders_nothing() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn flat_forest_renders_a_single_list() {
        let forest = build(&[
            heading("setup", 2, "Setup"),
            heading("usage", 2, "Usage"),
        ]);

        assert_eq!(
            render(&forest),
            "<ol>\
             <li><a href=\"#setup\">Setup</a></li>\
             <li><a href=\"#usage\">Usage</a></li>\
             </ol>"
        );
    }

    #[test]
    fn children_render_as_a_nested_list_inside_their_parent_item() {
        let forest = build(&[
            heading("intro", 1, "Intro"),
            heading("details", 2, "Details"),
        ]);

        assert_eq!(
            render(&forest),
            "<ol><li><a href=\"#intro\">Intro</a>\
             <ol><li><a href=\"#details\">Details</a></li></ol>\
             </li></ol>"
        );
    }

    #[test]
    fn leaf_items_carry_no_empty_nested_list() {
        let forest = build(&[heading("only", 1, "Only")]);

        let markup = render(&forest);
        assert_eq!(markup.matches("<ol>").count(), 1);
    }

    #[test]
    fn nesting_depth_follows_the_deepest_chain() {
        let headings: Vec<Heading> = (1..=5)
            .map(|level| heading(&format!("h{level}"), level, "deep"))
            .collect();

        let markup = render(&build(&headings));

        assert_eq!(markup.matches("<ol>").count(), 5);
        assert_eq!(markup.matches("</ol>").count(), 5);
    }

    #[test]
    fn rendering_is_idempotent() {
        let forest = build(&[
            heading("a", 1, "A"),
            heading("b", 2, "B"),
            heading("c", 1, "C"),
        ]);

        assert_eq!(render(&forest), render(&forest));
    }

    #[test]
    fn text_and_ids_are_escaped() {
        let forest = build(&[heading("a\"b", 1, "Tips & <Tricks>")]);

        assert_eq!(
            render(&forest),
            "<ol><li><a href=\"#a&quot;b\">Tips &amp; &lt;Tricks&gt;</a></li></ol>"
        );
    }
}
