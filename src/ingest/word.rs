//! Word-processor extraction for both container generations.
//!
//! The container is identified by magic bytes, not by the declared media type:
//! browsers routinely label .docx uploads `application/msword` and vice versa.

use super::legacy_doc;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

pub(super) fn extract(bytes: &[u8]) -> Result<String, String> {
    if bytes.starts_with(ZIP_MAGIC) {
        extract_docx(bytes)
    } else if bytes.starts_with(&legacy_doc::OLE_MAGIC) {
        legacy_doc::extract(bytes)
    } else {
        Err("not a Word container (neither OOXML nor OLE2)".to_string())
    }
}

/// Extract body text from DOCX using docx-rs.
///
/// Only the document body is walked; headers, footers and embedded objects
/// live in separate parts and are skipped.
fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let doc = docx_rs::read_docx(bytes).map_err(|e| format!("Failed to parse DOCX: {}", e))?;

    let mut all_text = String::new();
    for child in &doc.document.children {
        extract_docx_content(child, &mut all_text);
    }

    Ok(all_text)
}

/// Recursively extract text from DOCX document elements
fn extract_docx_content(element: &docx_rs::DocumentChild, output: &mut String) {
    match element {
        docx_rs::DocumentChild::Paragraph(para) => {
            push_paragraph(para, output);
            output.push('\n');
        }
        docx_rs::DocumentChild::Table(table) => {
            for row in &table.rows {
                let docx_rs::TableChild::TableRow(tr) = row;
                let mut cells = Vec::new();
                for cell in &tr.cells {
                    let docx_rs::TableRowChild::TableCell(tc) = cell;
                    let mut cell_text = String::new();
                    for child in &tc.children {
                        if let docx_rs::TableCellContent::Paragraph(para) = child {
                            push_paragraph(para, &mut cell_text);
                        }
                    }
                    cells.push(cell_text);
                }
                output.push_str(&cells.join(" | "));
                output.push('\n');
            }
        }
        _ => {}
    }
}

fn push_paragraph(para: &docx_rs::Paragraph, output: &mut String) {
    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run(run, output),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for run in &link.children {
                    if let docx_rs::ParagraphChild::Run(r) = run {
                        push_run(r, output);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(run: &docx_rs::Run, output: &mut String) {
    for run_child in &run.children {
        match run_child {
            docx_rs::RunChild::Text(text) => output.push_str(&text.text),
            docx_rs::RunChild::Tab(_) => output.push('\t'),
            docx_rs::RunChild::Break(_) => output.push('\n'),
            _ => {}
        }
    }
}
