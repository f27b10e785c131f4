use scraper::{ElementRef, Node};

/// Elements whose text is never rendered.
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "rt", "rp"];

/// Trim every line, drop blank ones, join with `\n`.
pub fn normalize(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalized text of every visible text node under `root`, in document order.
pub fn visible_text(root: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(root, &mut parts);
    normalize(&parts.join("\n"))
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push(text),
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            // comments, doctype, processing instructions
            _ => {}
        }
    }
}

// ── Tests ──
