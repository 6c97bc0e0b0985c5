//! PDF renderer
//!
//! Writes an A4 document with the standard Type1 Helvetica faces, so no font
//! is embedded. Text is WinAnsi-encoded and wrapped using the Helvetica
//! advance widths below.

use crate::model::SummaryArtifact;
use crate::winansi;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 28;

const TITLE_SIZE: i64 = 18;
const TITLE_LEADING: i64 = 20;
const TITLE_GAP: i64 = 5;

const BODY_SIZE: i64 = 11;
const BODY_LEADING: i64 = 14;
const BULLET_INDENT: i64 = 14;
const BULLET_GAP: i64 = 6;

/// WinAnsi code for `•`
const BULLET: u8 = 0x95;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Face::Regular => REGULAR,
            Face::Bold => BOLD,
        }
    }

    fn glyph_width(self, byte: u8) -> u32 {
        let table = match self {
            Face::Regular => &HELVETICA_WIDTHS,
            Face::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        match byte {
            0x20..=0x7E => u32::from(table[usize::from(byte - 0x20)]),
            BULLET => 350,
            _ => 556,
        }
    }

    /// Width of encoded text in thousandths of a point
    fn text_width(self, text: &[u8], size: i64) -> i64 {
        let units: u32 = text.iter().map(|b| self.glyph_width(*b)).sum();
        i64::from(units) * size
    }
}

/// Greedy word wrap of WinAnsi bytes. Words wider than a line are split.
fn wrap(text: &[u8], face: Face, size: i64, max_width: i64) -> Vec<Vec<u8>> {
    let limit = max_width * 1000;
    let space = face.text_width(b" ", size);
    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut current_width = 0;

    for word in text.split(|b| b.is_ascii_whitespace()).filter(|w| !w.is_empty()) {
        let word_width = face.text_width(word, size);

        if !current.is_empty() && current_width + space + word_width <= limit {
            current.push(b' ');
            current.extend_from_slice(word);
            current_width += space + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= limit {
            current.extend_from_slice(word);
            current_width = word_width;
            continue;
        }

        // Hard-break an overlong word
        for &byte in word {
            let w = face.text_width(&[byte], size);
            if !current.is_empty() && current_width + w > limit {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(byte);
            current_width += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Accumulates positioned text into pages
struct Layout {
    pages: Vec<Vec<Operation>>,
    cursor: i64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn at_page_top(&self) -> bool {
        self.cursor == PAGE_HEIGHT - MARGIN
    }

    fn remaining(&self) -> i64 {
        self.cursor - MARGIN
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page unless `height` still fits on this one
    fn reserve(&mut self, height: i64) {
        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
    }

    fn text(&mut self, face: Face, size: i64, x: i64, baseline: i64, bytes: Vec<u8>) {
        if let Some(ops) = self.pages.last_mut() {
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec![face.resource().into(), size.into()]));
            ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
            ops.push(Operation::new("Tj", vec![Object::string_literal(bytes)]));
            ops.push(Operation::new("ET", vec![]));
        }
    }

    /// Place one line and advance; lines that do not fit go to a new page
    fn line(&mut self, face: Face, size: i64, leading: i64, x: i64, bytes: Vec<u8>) {
        if leading > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
        let baseline = self.cursor - size;
        self.text(face, size, x, baseline, bytes);
        self.cursor -= leading;
    }

    fn gap(&mut self, height: i64) {
        self.cursor -= height;
    }
}

fn layout(artifact: &SummaryArtifact) -> Vec<Vec<Operation>> {
    let width = PAGE_WIDTH - 2 * MARGIN;
    let mut page = Layout::new();

    let title = winansi::encode_lossy(&artifact.title);
    let title_lines = wrap(&title, Face::Bold, TITLE_SIZE, width);
    page.reserve(title_lines.len() as i64 * TITLE_LEADING);
    for line in title_lines {
        page.line(Face::Bold, TITLE_SIZE, TITLE_LEADING, MARGIN, line);
    }
    page.gap(TITLE_GAP);

    for point in &artifact.bullet_points {
        let text = winansi::encode_lossy(point);
        let lines = wrap(&text, Face::Regular, BODY_SIZE, width - BULLET_INDENT);
        if lines.is_empty() {
            continue;
        }

        page.reserve(lines.len() as i64 * BODY_LEADING);
        for (index, line) in lines.into_iter().enumerate() {
            page.line(Face::Regular, BODY_SIZE, BODY_LEADING, MARGIN + BULLET_INDENT, line);
            if index == 0 {
                let baseline = page.cursor + BODY_LEADING - BODY_SIZE;
                page.text(Face::Regular, BODY_SIZE, MARGIN, baseline, vec![BULLET]);
            }
        }
        page.gap(BULLET_GAP);
    }

    page.pages
}

fn font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

pub(super) fn render(artifact: &SummaryArtifact) -> Result<Vec<u8>, String> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = font(&mut doc, "Helvetica");
    let bold_id = font(&mut doc, "Helvetica-Bold");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in layout(artifact) {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| format!("Failed to encode page content: {}", e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| format!("Failed to write PDF: {}", e))?;

    tracing::debug!("[Exporter] PDF has {} page(s)", page_count);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::artifact;

    /// Every string shown with `Tj`, page by page
    fn shown_text(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| op.operands.first())
                    .filter_map(|operand| operand.as_str().ok())
                    .map(winansi::decode)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_single_page_contents() {
        let bytes = render(&artifact("Demo", &["Alpha", "Beta"])).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let pages = shown_text(&bytes);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0], vec!["Demo", "Alpha", "\u{2022}", "Beta", "\u{2022}"]);
    }

    #[test]
    fn test_overflow_starts_new_page() {
        let points: Vec<String> = (0..80).map(|i| format!("Point number {}", i)).collect();
        let refs: Vec<&str> = points.iter().map(String::as_str).collect();
        let bytes = render(&artifact("Long", &refs)).unwrap();

        let pages = shown_text(&bytes);
        assert!(pages.len() >= 2);

        // Every bullet appears exactly once, in order
        let shown: Vec<String> = pages
            .into_iter()
            .flatten()
            .filter(|s| s.starts_with("Point"))
            .collect();
        assert_eq!(shown, points);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = winansi::encode_lossy(&"lorem ipsum dolor sit amet ".repeat(20));
        let lines = wrap(&text, Face::Regular, BODY_SIZE, 200);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(Face::Regular.text_width(line, BODY_SIZE) <= 200 * 1000);
        }
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let text = vec![b'W'; 100];
        let lines = wrap(&text, Face::Bold, TITLE_SIZE, 100);
        assert!(lines.len() > 1);
        assert_eq!(lines.iter().map(Vec::len).sum::<usize>(), 100);
    }

    #[test]
    fn test_non_latin_text_degrades() {
        let bytes = render(&artifact("Résumé", &["naïve café", "日本語"])).unwrap();
        let pages = shown_text(&bytes);
        assert_eq!(pages[0][0], "Résumé");
        assert!(pages[0].contains(&"naïve café".to_string()));
        assert!(pages[0].contains(&"???".to_string()));
    }
}
