use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use printpdf::image_crate::codecs::jpeg::JpegDecoder;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex,
};

use crate::extract::digest_analysis;
use crate::layout::{parse_markdown, wrap, Block};
use crate::ReportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 19.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const CAPTION_SIZE: f32 = 9.0;

const IMAGE_WIDTH_MM: f32 = 150.0;
const IMAGE_MAX_HEIGHT_MM: f32 = 180.0;

/// One uploaded image with its analysis text, appended after the report
/// body.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub bytes: Vec<u8>,
    pub analysis: String,
}

/// Markdown-subset to paginated A4 translator.
pub struct ReportPdf {
    title: String,
}

impl Default for ReportPdf {
    fn default() -> Self {
        Self {
            title: "Comprehensive Medical Report".to_string(),
        }
    }
}

impl ReportPdf {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn render(
        &self,
        markdown: &str,
        attachments: &[ImageAttachment],
        out_path: &Path,
    ) -> Result<(), ReportError> {
        let (doc, page, layer) = PdfDocument::new(
            self.title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = builtin(&doc, BuiltinFont::Helvetica)?;
        let bold = builtin(&doc, BuiltinFont::HelveticaBold)?;
        let oblique = builtin(&doc, BuiltinFont::HelveticaOblique)?;

        {
            let mut cursor = PageCursor {
                doc: &doc,
                page,
                layer,
                y: PAGE_HEIGHT_MM - MARGIN_MM,
            };

            cursor.line(&self.title, TITLE_SIZE, &bold);
            cursor.space(8.0);

            for block in parse_markdown(markdown) {
                match block {
                    Block::Heading(text) => {
                        cursor.space(3.0);
                        cursor.line(&text, HEADING_SIZE, &bold);
                        cursor.space(1.5);
                    }
                    Block::Bullet(text) => {
                        cursor.wrapped(&format!("\u{2022} {text}"), BODY_SIZE, &regular);
                    }
                    Block::Paragraph(text) => {
                        cursor.wrapped(&text, BODY_SIZE, &regular);
                        cursor.space(1.5);
                    }
                }
            }

            if !attachments.is_empty() {
                cursor.new_page();
                cursor.line("Medical Images & Analysis", HEADING_SIZE, &bold);
                cursor.wrapped(
                    "The following images were analyzed to generate this report:",
                    BODY_SIZE,
                    &regular,
                );
                cursor.space(4.0);

                for (i, attachment) in attachments.iter().enumerate() {
                    let digest = digest_analysis(&attachment.analysis);
                    cursor.space(4.0);
                    cursor.line(
                        &format!("Document {}: {}", i + 1, digest.document_type),
                        BODY_SIZE,
                        &bold,
                    );
                    cursor.line(
                        &format!("Patient: {}", digest.patient),
                        CAPTION_SIZE,
                        &oblique,
                    );
                    cursor.wrapped(
                        &format!("Key Findings: {}", digest.key_findings),
                        BODY_SIZE,
                        &regular,
                    );
                    cursor.space(2.0);

                    match decode_image(&attachment.bytes) {
                        Ok(image) => place_image(&mut cursor, image),
                        Err(e) => {
                            tracing::warn!(index = i + 1, error = %e, "image not embedded");
                            cursor.line(
                                &format!("Error displaying image {}: {}", i + 1, e),
                                CAPTION_SIZE,
                                &oblique,
                            );
                        }
                    }
                    cursor.space(6.0);
                }
            }
        }

        let file = File::create(out_path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| ReportError::Render(e.to_string()))?;
        Ok(())
    }
}

fn builtin(
    doc: &PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, ReportError> {
    doc.add_builtin_font(font)
        .map_err(|e| ReportError::Render(e.to_string()))
}

struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    /// Baseline of the next line, measured from the page bottom.
    y: f32,
}

impl PageCursor<'_> {
    fn layer_ref(&self) -> PdfLayerReference {
        self.doc.get_page(self.page).get_layer(self.layer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.page = page;
        self.layer = layer;
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn ensure(&mut self, needed_mm: f32) {
        if self.y - needed_mm < MARGIN_MM {
            self.new_page();
        }
    }

    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        let height = line_height_mm(size);
        self.ensure(height);
        self.y -= height;
        self.layer_ref()
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
    }

    fn wrapped(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        for line in wrap(text, chars_per_line(size)) {
            self.line(&line, size, font);
        }
    }

    fn space(&mut self, mm: f32) {
        self.y -= mm;
    }
}

fn line_height_mm(font_size_pt: f32) -> f32 {
    // 1 pt = 0.3528 mm, plus conventional leading.
    font_size_pt * 0.3528 * 1.45
}

fn chars_per_line(font_size_pt: f32) -> usize {
    // Helvetica averages about half an em per glyph.
    let usable_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let char_mm = font_size_pt * 0.5 * 0.3528;
    (usable_mm / char_mm) as usize
}

fn decode_image(bytes: &[u8]) -> Result<Image, String> {
    if bytes.starts_with(&[0xFF, 0xD8]) {
        let decoder = JpegDecoder::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
        Image::try_from(decoder).map_err(|e| e.to_string())
    } else if bytes.starts_with(b"\x89PNG") {
        let decoder = PngDecoder::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
        Image::try_from(decoder).map_err(|e| e.to_string())
    } else {
        Err("unsupported image format (expected JPEG or PNG)".to_string())
    }
}

fn place_image(cursor: &mut PageCursor<'_>, image: Image) {
    let px_w = image.image.width.0.max(1) as f32;
    let px_h = image.image.height.0.max(1) as f32;

    let mut width_mm = IMAGE_WIDTH_MM;
    let mut height_mm = width_mm * px_h / px_w;
    if height_mm > IMAGE_MAX_HEIGHT_MM {
        height_mm = IMAGE_MAX_HEIGHT_MM;
        width_mm = height_mm * px_w / px_h;
    }
    // Setting the dpi fixes the rendered width; the aspect ratio follows.
    let dpi = px_w * 25.4 / width_mm;

    cursor.ensure(height_mm + 2.0);
    cursor.y -= height_mm;
    image.add_to_layer(
        cursor.layer_ref(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_MM)),
            translate_y: Some(Mm(cursor.y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    cursor.space(2.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "### Patient Information\n**Name:** Jane Doe\n\n\
### Overall Synthesis & Impression\n* stable\n* follow up in two weeks\n\n\
Long paragraph follows. The quick brown fox jumps over the lazy dog, repeatedly, \
until the line wraps onto the next baseline and the next page when needed.";

    #[test]
    fn renders_pdf_file_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        ReportPdf::default().render(REPORT, &[], &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn undecodable_image_degrades_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let attachments = vec![ImageAttachment {
            bytes: vec![0u8; 16],
            analysis: "2. **Key Findings**\nOpacity in left lower lobe.\n\n3. done".into(),
        }];
        ReportPdf::default()
            .render(REPORT, &attachments, &path)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn long_reports_paginate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let mut body = String::new();
        for i in 0..120 {
            body.push_str(&format!("Paragraph number {i} with enough words to occupy a line.\n\n"));
        }
        ReportPdf::with_title("Pagination Check")
            .render(&body, &[], &path)
            .unwrap();
        assert!(std::fs::read(&path).unwrap().len() > 1_000);
    }

    #[test]
    fn garbage_bytes_are_not_an_image() {
        assert!(decode_image(&[1, 2, 3, 4]).is_err());
    }
}
