//! Minimal A4 page layout on top of lopdf: text lines, wrapped paragraphs,
//! grid tables with repeated headers and embedded RGB images.

use anyhow::Result;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Approximate Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
            Self::Italic => "F3",
        }
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// PDF text is written with the standard Helvetica encoding; anything outside
/// printable ASCII is replaced.
fn pdf_text(text: &str) -> Object {
    let ascii: String = text
        .chars()
        .map(|ch| if ch.is_ascii() && !ch.is_ascii_control() { ch } else { '?' })
        .collect();
    Object::string_literal(ascii)
}

/// Characters of `font_size` text that fit into `width` points.
pub fn fitting_chars(width: f32, font_size: f32) -> usize {
    (width / (font_size * GLYPH_WIDTH)).floor().max(1.0) as usize
}

/// Greedy word wrap to at most `max_chars` per line.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}~")
    }
}

/// Accumulates pages for one document.
pub struct PageWriter {
    doc: Document,
    pages_id: ObjectId,
    fonts: Dictionary,
    pages: Vec<ObjectId>,
    operations: Vec<Operation>,
    images: Dictionary,
    image_count: usize,
    cursor: f32,
}

impl Default for PageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut fonts = Dictionary::new();
        for (font, base) in [
            (Font::Regular, "Helvetica"),
            (Font::Bold, "Helvetica-Bold"),
            (Font::Italic, "Helvetica-Oblique"),
        ] {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base,
            });
            fonts.set(font.resource(), id);
        }
        Self {
            doc,
            pages_id,
            fonts,
            pages: Vec::new(),
            operations: Vec::new(),
            images: Dictionary::new(),
            image_count: 0,
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Starts a new page when fewer than `height` points remain.
    pub fn ensure_space(&mut self, height: f32) -> Result<bool> {
        if self.cursor - height < MARGIN && self.cursor < PAGE_HEIGHT - MARGIN {
            self.new_page()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn new_page(&mut self) -> Result<()> {
        let operations = std::mem::take(&mut self.operations);
        let images = std::mem::take(&mut self.images);
        let content = Content { operations }.encode()?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => self.fonts.clone(),
                "XObject" => images,
            },
        });
        self.pages.push(page_id);
        self.cursor = PAGE_HEIGHT - MARGIN;
        Ok(())
    }

    pub fn space(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn draw_text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new("Tj", vec![pdf_text(text)]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// One line of text at the left margin.
    pub fn line(&mut self, font: Font, size: f32, text: &str) -> Result<()> {
        let height = size * 1.3;
        self.ensure_space(height)?;
        self.cursor -= height;
        self.draw_text(font, size, MARGIN, self.cursor + size * 0.3, text);
        Ok(())
    }

    /// Word-wrapped text across the content width.
    pub fn paragraph(&mut self, font: Font, size: f32, text: &str) -> Result<()> {
        for line in wrap(text, fitting_chars(CONTENT_WIDTH, size)) {
            self.line(font, size, &line)?;
        }
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, gray: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("g", vec![real(gray)]),
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![real(0.25)]),
            Operation::new("G", vec![real(0.5)]),
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn table_row(&mut self, cells: &[String], widths: &[f32], size: f32, header: bool) {
        let height = size * 1.8;
        let y = self.cursor - height;
        let mut x = MARGIN;
        for (cell, width) in cells.iter().zip(widths) {
            if header {
                self.fill_rect(x, y, *width, height, 0.83);
            }
            self.stroke_rect(x, y, *width, height);
            let text = clip(cell, fitting_chars(width - 4.0, size));
            let font = if header { Font::Bold } else { Font::Regular };
            self.draw_text(font, size, x + 2.0, y + size * 0.55, &text);
            x += width;
        }
        self.cursor = y;
    }

    /// Grid table; the header row is repeated at the top of every page.
    pub fn table(&mut self, header: &[String], rows: &[Vec<String>], widths: &[f32], size: f32) -> Result<()> {
        let height = size * 1.8;
        self.ensure_space(height * 2.0)?;
        self.table_row(header, widths, size, true);
        for row in rows {
            if self.ensure_space(height)? {
                self.table_row(header, widths, size, true);
            }
            self.table_row(row, widths, size, false);
        }
        Ok(())
    }

    /// Embeds an RGB image scaled to `width` points, keeping its aspect ratio.
    pub fn image(&mut self, image: &RgbImage, width: f32) -> Result<()> {
        let (px_width, px_height) = image.dimensions();
        let height = width * px_height as f32 / px_width.max(1) as f32;
        self.ensure_space(height)?;
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(px_width),
                "Height" => i64::from(px_height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            image.as_raw().clone(),
        );
        let id = self.doc.add_object(stream);
        self.images.set(name.as_str(), id);
        self.cursor -= height;
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![real(width), real(0.0), real(0.0), real(height), real(MARGIN), real(self.cursor)],
            ),
            Operation::new("Do", vec![name.as_str().into()]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    /// Closes the last page and assembles the page tree.
    pub fn finish(mut self, title: &str) -> Result<Document> {
        self.new_page()?;
        let kids: Vec<Object> = self.pages.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Title" => pdf_text(title),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);
        self.doc.compress();
        Ok(self.doc)
    }
}
