use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Pt,
};

use tracing::warn;

use super::RenderError;
use super::canvas::{Canvas, FontWeight, Rgb};

/// [`Canvas`] writing to a one-page PDF document.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Characters in 0x80..=0x9F of WinAnsiEncoding.
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Whether the builtin fonts can show every character of `text`.
pub fn is_win_ansi(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}') || WIN_ANSI_EXTRAS.contains(c)
    })
}

fn point(x: f32, y: f32) -> Point {
    Point::new(Mm::from(Pt(x)), Mm::from(Pt(y)))
}

impl PdfCanvas {
    pub fn new(title: &str, width_pt: f32, height_pt: f32) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm::from(Pt(width_pt)),
            Mm::from(Pt(height_pt)),
            "Log sheet",
        );
        let layer = doc.get_page(page).get_layer(layer);

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Backend(format!("loading Helvetica: {e:?}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Backend(format!("loading Helvetica-Bold: {e:?}")))?;

        Ok(PdfCanvas {
            doc,
            layer,
            regular,
            bold,
        })
    }

    /// Serializes the document.
    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        let PdfCanvas { doc, layer, .. } = self;
        drop(layer);
        doc.save_to_bytes()
            .map_err(|e| RenderError::Backend(format!("serializing document: {e:?}")))
    }
}

impl Canvas for PdfCanvas {
    fn text(&mut self, text: &str, size: f32, weight: FontWeight, x: f32, y: f32) {
        let font = match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        };
        if !is_win_ansi(text) {
            warn!(text, "Text has characters outside WinAnsi; the builtin font will drop them.");
        }
        self.layer
            .use_text(text, size, Mm::from(Pt(x)), Mm::from(Pt(y)), font);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.layer.add_line(Line {
            points: vec![(point(from.0, from.1), false), (point(to.0, to.1), false)],
            is_closed: false,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.layer.add_line(Line {
            points: vec![
                (point(x, y), false),
                (point(x + width, y), false),
                (point(x + width, y + height), false),
                (point(x, y + height), false),
            ],
            is_closed: true,
        });
    }

    fn set_stroke(&mut self, width: f32, color: Rgb) {
        self.layer.set_outline_thickness(width);
        self.layer
            .set_outline_color(Color::Rgb(printpdf::Rgb::new(color.r, color.g, color.b, None)));
    }

    fn save_state(&mut self) {
        self.layer.save_graphics_state();
    }

    fn restore_state(&mut self) {
        self.layer.restore_graphics_state();
    }
}
