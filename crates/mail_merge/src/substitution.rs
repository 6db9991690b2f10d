//! Placeholder substitution inside DOCX documents
//!
//! Tokens are replaced paragraph by paragraph over the concatenated text of
//! the runs, so a token split across several runs (Word does this whenever
//! spelling marks or revision ids change mid-word) is still found. The whole
//! replaced paragraph text is written into the first run and the following
//! runs are emptied, so the paragraph takes the first run's formatting.
//!
//! After the paragraph passes a raw walk over the body catches text-bearing
//! elements that are not direct runs of body or cell paragraphs: text boxes,
//! shapes and runs nested in hyperlinks or content controls.

use store::docx::namespaces::W;
use store::docx::{set_leaf_text, Document, Paragraph, Story, XmlElement};

/// Token for a column: `{COLUMN}`
pub fn placeholder(column: &str) -> String {
    format!("{{{}}}", column)
}

/// Replace `search` in a paragraph regardless of how its text is split into
/// runs. Returns whether the paragraph changed.
pub fn replace_text_in_paragraph(paragraph: &mut Paragraph<'_>, search: &str, replace: &str) -> bool {
    if search.is_empty() {
        return false;
    }

    let text = paragraph.text();
    if !text.contains(search) {
        return false;
    }
    let new_text = text.replace(search, replace);

    if paragraph.run_count() == 0 {
        paragraph.add_run(&new_text);
        return true;
    }

    for (index, mut run) in paragraph.runs().into_iter().enumerate() {
        if index == 0 {
            run.set_text(new_text.as_str());
        } else {
            run.set_text("");
        }
    }
    true
}

/// Replace in every paragraph of a story and of every cell of its tables,
/// nested tables included. Returns the number of paragraphs changed.
pub fn replace_text_in_story(story: &mut Story<'_>, search: &str, replace: &str) -> usize {
    let mut changed = 0;

    for mut paragraph in story.paragraphs() {
        if replace_text_in_paragraph(&mut paragraph, search, replace) {
            changed += 1;
        }
    }

    for mut table in story.tables() {
        for mut row in table.rows() {
            for mut cell in row.cells() {
                changed += replace_text_in_story(&mut cell, search, replace);
            }
        }
    }

    changed
}

/// Replace in the content of every text leaf under `root`
///
/// A text leaf is `w:t` or any namespaced element named `t` (DrawingML
/// `a:t` for instance). Returns the number of leaves changed.
pub fn replace_text_in_xml(root: &mut XmlElement, search: &str, replace: &str) -> usize {
    if search.is_empty() {
        return 0;
    }

    let mut changed = 0;
    root.walk_mut(&mut |element| {
        if is_text_leaf(element) && replace_in_leaf(element, search, replace) {
            changed += 1;
        }
    });
    changed
}

/// Replace every occurrence of `search` in the visible text of a document:
/// body, tables, headers and footers of every section, and text boxes or
/// shapes in the body.
///
/// Returns the number of paragraphs and text leaves changed.
pub fn replace_text(document: &mut Document, search: &str, replace: &str) -> usize {
    if search.is_empty() {
        return 0;
    }

    let mut changed = 0;

    if let Some(mut body) = document.body_story() {
        changed += replace_text_in_story(&mut body, search, replace);
    }

    for part in document.header_footer_parts() {
        if let Some(mut story) = document.part_story(&part) {
            changed += replace_text_in_story(&mut story, search, replace);
        }
    }

    if let Some(body) = document.body_mut() {
        changed += replace_uncovered(body, Level::Story, search, replace);
    }

    changed
}

/// Apply `(token, replacement)` pairs in order; each pair sees the text
/// produced by the previous ones
pub fn replace_all<I, K, V>(document: &mut Document, pairs: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (token, replacement) in pairs {
        let token = token.as_ref();
        let changed = replace_text(document, token, replacement.as_ref());
        if changed == 0 {
            tracing::debug!("Token {} not found in template", token);
        } else {
            tracing::debug!("Replaced {} in {} place(s)", token, changed);
        }
    }
}

fn is_text_leaf(element: &XmlElement) -> bool {
    element.is(W, "t") || (element.namespace.is_some() && element.local_name() == "t")
}

fn replace_in_leaf(element: &mut XmlElement, search: &str, replace: &str) -> bool {
    let text = element.text();
    if !text.contains(search) {
        return false;
    }
    set_leaf_text(element, &text.replace(search, replace));
    true
}

/// Where the raw walk is relative to the structure the paragraph passes
/// already handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Story,
    Table,
    Row,
    Paragraph,
    Run,
    Other,
}

/// Raw replacement restricted to text leaves the paragraph passes did not
/// reach, so a replacement that contains its own token is not applied twice
fn replace_uncovered(element: &mut XmlElement, level: Level, search: &str, replace: &str) -> usize {
    let mut changed = 0;

    if level == Level::Other && is_text_leaf(element) && replace_in_leaf(element, search, replace) {
        changed += 1;
    }

    for child in element.child_elements_mut() {
        let child_level = match level {
            Level::Story if child.is(W, "p") => Level::Paragraph,
            Level::Story if child.is(W, "tbl") => Level::Table,
            Level::Table if child.is(W, "tr") => Level::Row,
            Level::Row if child.is(W, "tc") => Level::Story,
            Level::Paragraph if child.is(W, "r") => Level::Run,
            Level::Run if child.is(W, "t") => continue,
            _ => Level::Other,
        };
        changed += replace_uncovered(child, child_level, search, replace);
    }

    changed
}
