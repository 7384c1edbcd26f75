use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};
use tracing::warn;

use super::layout::{Align, DrawOp, Font, PAGE_HEIGHT, PAGE_WIDTH};

const LOGO_DPI: f32 = 300.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width, in ems.
const AVG_GLYPH_EM: f32 = 0.5;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
        }
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM * PT_TO_MM
}

/// Page coordinates grow downwards; PDF coordinates grow upwards.
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

fn draw_logo(layer: &PdfLayerReference, png: &[u8], x: f32, y: f32, width: f32, height: f32) {
    let decoder = match PngDecoder::new(Cursor::new(png)) {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, "Receipt logo is not a readable PNG, skipping");
            return;
        }
    };
    let image = match Image::try_from(decoder) {
        Ok(img) => img,
        Err(e) => {
            warn!(error = %e, "Failed to decode receipt logo, skipping");
            return;
        }
    };

    let px_w = image.image.width.0.max(1) as f32;
    let px_h = image.image.height.0.max(1) as f32;
    let natural_w = px_w / LOGO_DPI * 25.4;
    let natural_h = px_h / LOGO_DPI * 25.4;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(flip(y + height)),
            scale_x: Some(width / natural_w),
            scale_y: Some(height / natural_h),
            dpi: Some(LOGO_DPI),
            ..Default::default()
        },
    );
}

/// Renders the draw operations to a single-page A4 PDF.
///
/// `logo` is PNG bytes; when absent or unreadable the logo is left out.
pub fn render(title: &str, ops: &[DrawOp], logo: Option<&[u8]>) -> Result<Vec<u8>, printpdf::Error> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Recibo");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };
    let layer = doc.get_page(page).get_layer(layer);

    for op in ops {
        match op {
            DrawOp::Logo { x, y, width, height } => match logo {
                Some(png) => draw_logo(&layer, png, *x, *y, *width, *height),
                None => warn!("Receipt logo unavailable, skipping"),
            },
            DrawOp::Text {
                text,
                x,
                y,
                size,
                font,
                align,
            } => {
                if text.is_empty() {
                    continue;
                }
                let x = match align {
                    Align::Left => *x,
                    Align::Center => *x - text_width(text, *size) / 2.0,
                };
                layer.use_text(text.as_str(), *size, Mm(x), flip(*y), fonts.get(*font));
            }
            DrawOp::Line { x1, x2, y, thickness } => {
                layer.set_outline_thickness(*thickness);
                layer.add_line(Line {
                    points: vec![(Point::new(Mm(*x1), flip(*y)), false), (Point::new(Mm(*x2), flip(*y)), false)],
                    is_closed: false,
                });
            }
        }
    }

    doc.save_to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ops() -> Vec<DrawOp> {
        vec![
            DrawOp::Logo {
                x: 18.0,
                y: 20.0,
                width: 30.0,
                height: 12.0,
            },
            DrawOp::Text {
                text: "DEMONSTRATIVO DE PAGAMENTO".into(),
                x: 105.0,
                y: 35.0,
                size: 13.0,
                font: Font::Bold,
                align: Align::Center,
            },
            DrawOp::Line {
                x1: 18.0,
                x2: 143.0,
                y: 40.0,
                thickness: 0.2,
            },
        ]
    }

    #[test]
    fn renders_a_pdf_without_logo() {
        let bytes = render("Recibo", &sample_ops(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn unreadable_logo_is_skipped() {
        let bytes = render("Recibo", &sample_ops(), Some(b"not a png")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn centered_text_is_shifted_left() {
        assert!(text_width("ABCD", 10.0) > text_width("AB", 10.0));
        assert_eq!(text_width("", 10.0), 0.0);
    }
}
