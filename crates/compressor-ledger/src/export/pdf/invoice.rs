//! Invoice PDF, laid out from the invoice markup.
//!
//! The markup is line oriented:
//!
//! | line           | rendering                                   |
//! |----------------|---------------------------------------------|
//! | `# text`       | large bold heading                          |
//! | `## text`      | bold section heading                        |
//! | `---`          | horizontal rule                             |
//! | `\| a \| b \|` | bordered table row, bold if first in a run  |
//! | empty          | small vertical gap                          |
//! | anything else  | body text, word wrapped                     |

use crate::error::Result;
use crate::export::Artifact;

use super::{fit_text, wrap_text, Canvas, Face, Orientation};

const TITLE: &str = "Invoice";
const MARGIN: f32 = 20.0;
const HEADING_SIZE: f32 = 18.0;
const SUBHEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LINE: f32 = 5.5;
const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block<'a> {
    Heading(&'a str),
    Subheading(&'a str),
    Rule,
    Row(Vec<&'a str>),
    Blank,
    Text(&'a str),
}

fn parse_line(line: &str) -> Block<'_> {
    let line = line.trim_end();
    if let Some(text) = line.strip_prefix("## ") {
        Block::Subheading(text)
    } else if let Some(text) = line.strip_prefix("# ") {
        Block::Heading(text)
    } else if line == "---" {
        Block::Rule
    } else if line.starts_with('|') {
        let inner = line.trim_start_matches('|');
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        Block::Row(inner.split('|').map(str::trim).collect())
    } else if line.trim().is_empty() {
        Block::Blank
    } else {
        Block::Text(line)
    }
}

/// Lay out `markup` and offer it as `file_name`.
///
/// # Errors
///
/// Returns an error if the PDF cannot be encoded.
pub fn export(markup: &str, file_name: impl Into<String>) -> Result<Artifact> {
    let canvas = render(markup)?;
    Ok(Artifact::pdf(file_name, canvas.finish()?))
}

struct Cursor {
    canvas: Canvas,
    top: f32,
}

impl Cursor {
    /// Make room for `height` millimetres, starting a new page if needed.
    fn reserve(&mut self, height: f32) -> f32 {
        if self.top + height > self.canvas.height() - MARGIN {
            self.canvas.new_page();
            self.top = MARGIN;
        }
        let top = self.top;
        self.top += height;
        top
    }
}

fn render(markup: &str) -> Result<Canvas> {
    let canvas = Canvas::new(TITLE, Orientation::Portrait)?;
    let content_width = canvas.width() - 2.0 * MARGIN;
    let mut cursor = Cursor {
        canvas,
        top: MARGIN,
    };
    let mut in_table = false;

    for line in markup.lines() {
        let block = parse_line(line);
        let starts_table = matches!(block, Block::Row(_)) && !in_table;
        in_table = matches!(block, Block::Row(_));

        match block {
            Block::Heading(text) => {
                let top = cursor.reserve(10.0);
                cursor
                    .canvas
                    .text(text, HEADING_SIZE, Face::Bold, MARGIN, top + 7.0);
            }
            Block::Subheading(text) => {
                let top = cursor.reserve(7.0);
                cursor
                    .canvas
                    .text(text, SUBHEADING_SIZE, Face::Bold, MARGIN, top + 5.0);
            }
            Block::Rule => {
                let top = cursor.reserve(5.0);
                cursor
                    .canvas
                    .hline(MARGIN, MARGIN + content_width, top + 2.0);
            }
            Block::Row(cells) => {
                let top = cursor.reserve(ROW_HEIGHT);
                #[allow(clippy::cast_precision_loss)]
                let width = content_width / cells.len().max(1) as f32;
                let face = if starts_table { Face::Bold } else { Face::Regular };
                let mut x = MARGIN;
                for cell in cells {
                    cursor.canvas.rect(x, top, width, ROW_HEIGHT);
                    let text = fit_text(cell, BODY_SIZE, width - 2.0 * CELL_PADDING);
                    cursor
                        .canvas
                        .text(&text, BODY_SIZE, face, x + CELL_PADDING, top + 5.5);
                    x += width;
                }
            }
            Block::Blank => {
                cursor.reserve(3.0);
            }
            Block::Text(text) => {
                for wrapped in wrap_text(text, BODY_SIZE, content_width) {
                    let top = cursor.reserve(BODY_LINE);
                    cursor
                        .canvas
                        .text(&wrapped, BODY_SIZE, Face::Regular, MARGIN, top + 4.0);
                }
            }
        }
    }

    Ok(cursor.canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headings() {
        assert_eq!(parse_line("# CareLab"), Block::Heading("CareLab"));
        assert_eq!(parse_line("## Terms"), Block::Subheading("Terms"));
        assert_eq!(parse_line("#hashtag"), Block::Text("#hashtag"));
    }

    #[test]
    fn test_parse_rule_and_blank() {
        assert_eq!(parse_line("---"), Block::Rule);
        assert_eq!(parse_line(""), Block::Blank);
        assert_eq!(parse_line("   "), Block::Blank);
    }

    #[test]
    fn test_parse_row() {
        assert_eq!(
            parse_line("| 1 | X200 | 1 | 25.5 | 25.5 |"),
            Block::Row(vec!["1", "X200", "1", "25.5", "25.5"])
        );
        assert_eq!(parse_line("| a |  | c |"), Block::Row(vec!["a", "", "c"]));
    }

    #[test]
    fn test_render_single_page() {
        let markup = "# Company\nTagline\n---\n| A | B |\n| 1 | 2 |\n\n## Total: 3.0\n";
        assert_eq!(render(markup).unwrap().pages(), 1);
    }

    #[test]
    fn test_render_breaks_pages() {
        let markup = "Body line\n".repeat(120);
        assert!(render(&markup).unwrap().pages() > 1);
    }

    #[test]
    fn test_export() {
        let artifact = export("# Invoice\nINV-1\n", "Invoice_1.pdf").unwrap();
        assert_eq!(artifact.file_name, "Invoice_1.pdf");
        assert_eq!(artifact.content_type, "application/pdf");
        assert!(!artifact.bytes.is_empty());
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }
}
