//! PDF exports.
//!
//! All layouts draw onto a [`Canvas`], a thin wrapper around printpdf that
//! works in millimetres from the top-left corner and handles page breaks.

pub mod bill;
pub mod invoice;
pub mod table;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::error::{Error, Result};

/// Millimetres per typographic point.
pub(crate) const MM_PER_PT: f32 = 0.352_778;

/// Average Helvetica glyph advance, as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.55;

const LAYER_NAME: &str = "Layer 1";

/// Paper orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// 210 x 297 mm.
    Portrait,
    /// 297 x 210 mm.
    Landscape,
}

impl Orientation {
    /// Page width and height in millimetres for A4 paper.
    #[must_use]
    pub fn a4(self) -> (f32, f32) {
        match self {
            Self::Portrait => (210.0, 297.0),
            Self::Landscape => (297.0, 210.0),
        }
    }
}

/// Built-in font faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Face {
    Regular,
    Bold,
}

/// Drawing surface for a multi-page document.
pub(crate) struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    width: f32,
    height: f32,
    pages: usize,
}

impl Canvas {
    /// Start a document with one blank A4 page.
    pub(crate) fn new(title: &str, orientation: Orientation) -> Result<Self> {
        let (width, height) = orientation.a4();
        let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), LAYER_NAME);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        layer.set_outline_thickness(0.3);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            width,
            height,
            pages: 1,
        })
    }

    pub(crate) fn width(&self) -> f32 {
        self.width
    }

    pub(crate) fn height(&self) -> f32 {
        self.height
    }

    pub(crate) fn pages(&self) -> usize {
        self.pages
    }

    /// Continue on a fresh page of the same size.
    pub(crate) fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(self.width), Mm(self.height), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.layer.set_outline_thickness(0.3);
        self.pages += 1;
    }

    /// Draw `text` with its baseline at `baseline` mm below the top edge.
    pub(crate) fn text(&self, text: &str, size: f32, face: Face, x: f32, baseline: f32) {
        let font = match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        };
        self.layer
            .use_text(text, size, Mm(x), Mm(self.height - baseline), font);
    }

    /// Outline a rectangle whose top-left corner is `top` mm below the top edge.
    pub(crate) fn rect(&self, x: f32, top: f32, width: f32, height: f32) {
        let y_top = self.height - top;
        let y_bottom = y_top - height;
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x), Mm(y_top)), false),
                (Point::new(Mm(x + width), Mm(y_top)), false),
                (Point::new(Mm(x + width), Mm(y_bottom)), false),
                (Point::new(Mm(x), Mm(y_bottom)), false),
            ],
            is_closed: true,
        });
    }

    /// Horizontal rule from `x1` to `x2`.
    pub(crate) fn hline(&self, x1: f32, x2: f32, top: f32) {
        let y = self.height - top;
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y)), false),
                (Point::new(Mm(x2), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    /// Encode the document.
    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(err: printpdf::Error) -> Error {
    Error::export("pdf", err.to_string())
}

/// Estimated rendered width of `text` in millimetres.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM * MM_PER_PT
}

/// Truncate `text` with `...` so that it fits in `max_width` millimetres.
pub(crate) fn fit_text(text: &str, size: f32, max_width: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }

    let mut fitted: String = text.chars().collect();
    while !fitted.is_empty() && text_width(&format!("{fitted}..."), size) > max_width {
        fitted.pop();
    }
    if fitted.is_empty() {
        String::new()
    } else {
        format!("{fitted}...")
    }
}

/// Break `text` into lines no wider than `max_width` millimetres.
///
/// Words longer than a whole line are truncated rather than split.
pub(crate) fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = fit_text(word, size, max_width);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
