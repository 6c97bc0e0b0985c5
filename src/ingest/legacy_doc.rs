//! Legacy Word (.doc, Word 97-2003) text extraction.
//!
//! A .doc file is an OLE2 compound file. The `WordDocument` stream starts
//! with the FIB, which names the table stream (`0Table` or `1Table`) and the
//! location of the CLX inside it. The CLX holds the piece table mapping
//! character positions to byte ranges of `WordDocument`, each piece either
//! cp1252 ("compressed") or UTF-16LE.
//!
//! Only the main-document range `[0, ccpText)` is read, which leaves out
//! headers, footers, footnotes and text boxes.

use crate::winansi;
use std::io::{Cursor, Read};

pub(super) const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const FIB_IDENT: u16 = 0xA5EC;
const FIB_FLAGS: usize = 0x000A;
const FIB_CCP_TEXT: usize = 0x004C;
const FIB_FC_CLX: usize = 0x01A2;
const FIB_LCB_CLX: usize = 0x01A6;
const FIB_MIN_LEN: usize = FIB_LCB_CLX + 4;

const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TABLE: u16 = 0x0200;

const CLX_PRC: u8 = 0x01;
const CLX_PCDT: u8 = 0x02;
const PCD_SIZE: usize = 8;
const FC_COMPRESSED: u32 = 0x4000_0000;

const FIELD_BEGIN: char = '\u{13}';
const FIELD_SEPARATOR: char = '\u{14}';
const FIELD_END: char = '\u{15}';

/// File Information Block fields needed for text extraction
#[derive(Debug)]
struct Fib {
    use_1table: bool,
    ccp_text: u32,
    fc_clx: u32,
    lcb_clx: u32,
}

impl Fib {
    fn parse(word: &[u8]) -> Result<Self, String> {
        if word.len() < FIB_MIN_LEN {
            return Err("WordDocument stream too short for a FIB".to_string());
        }
        if read_u16(word, 0) != Some(FIB_IDENT) {
            return Err("WordDocument stream has no Word FIB signature".to_string());
        }

        let flags = read_u16(word, FIB_FLAGS).unwrap_or_default();
        if flags & FLAG_ENCRYPTED != 0 {
            return Err("document is encrypted".to_string());
        }

        Ok(Self {
            use_1table: flags & FLAG_WHICH_TABLE != 0,
            ccp_text: read_u32(word, FIB_CCP_TEXT).unwrap_or_default(),
            fc_clx: read_u32(word, FIB_FC_CLX).unwrap_or_default(),
            lcb_clx: read_u32(word, FIB_LCB_CLX).unwrap_or_default(),
        })
    }
}

/// One piece-table entry: character range and where its bytes live
#[derive(Debug, Clone, Copy)]
struct Piece {
    cp_start: u32,
    cp_end: u32,
    fc: u32,
}

impl Piece {
    fn is_compressed(&self) -> bool {
        self.fc & FC_COMPRESSED != 0
    }

    /// Decode `[cp_start, cp_end)` clipped to `limit` characters
    fn decode(&self, word: &[u8], limit: u32) -> Result<String, String> {
        let end = self.cp_end.min(limit);
        if end <= self.cp_start {
            return Ok(String::new());
        }
        let chars = (end - self.cp_start) as usize;
        let offset = self.fc & !FC_COMPRESSED;

        if self.is_compressed() {
            let start = (offset / 2) as usize;
            let bytes = word
                .get(start..start + chars)
                .ok_or("compressed piece points outside WordDocument")?;
            Ok(winansi::decode(bytes))
        } else {
            let start = offset as usize;
            let bytes = word
                .get(start..start + chars * 2)
                .ok_or("unicode piece points outside WordDocument")?;
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            Ok(String::from_utf16_lossy(&units))
        }
    }
}

/// Extract main-document text from an OLE2 Word file
pub(super) fn extract(bytes: &[u8]) -> Result<String, String> {
    let mut file = cfb::CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| format!("not an OLE2 compound file: {}", e))?;

    let word = read_stream(&mut file, "/WordDocument")?;
    let fib = Fib::parse(&word)?;

    let table_name = if fib.use_1table { "/1Table" } else { "/0Table" };
    let table = read_stream(&mut file, table_name)?;

    let clx_start = fib.fc_clx as usize;
    let clx = table
        .get(clx_start..clx_start + fib.lcb_clx as usize)
        .ok_or("CLX lies outside the table stream")?;
    let pieces = parse_clx(clx)?;

    tracing::debug!(
        "[DocumentParser] Legacy Word: {} pieces, {} main-document chars",
        pieces.len(),
        fib.ccp_text
    );

    let mut raw = String::new();
    for piece in pieces.iter().filter(|p| p.cp_start < fib.ccp_text) {
        raw.push_str(&piece.decode(&word, fib.ccp_text)?);
    }

    Ok(strip_control(&raw))
}

fn read_stream<F: Read + std::io::Seek>(
    file: &mut cfb::CompoundFile<F>,
    path: &str,
) -> Result<Vec<u8>, String> {
    let mut stream = file
        .open_stream(path)
        .map_err(|e| format!("missing {} stream: {}", path, e))?;
    let mut buf = Vec::new();
    stream
        .read_to_end(&mut buf)
        .map_err(|e| format!("failed to read {} stream: {}", path, e))?;
    Ok(buf)
}

/// Skip the Prc (property) entries and decode the PlcPcd
fn parse_clx(clx: &[u8]) -> Result<Vec<Piece>, String> {
    let mut pos = 0;
    while pos < clx.len() {
        match clx[pos] {
            CLX_PRC => {
                let cb = read_u16(clx, pos + 1).ok_or("truncated Prc entry")? as usize;
                pos += 3 + cb;
            }
            CLX_PCDT => {
                let lcb = read_u32(clx, pos + 1).ok_or("truncated Pcdt header")? as usize;
                let plc = clx
                    .get(pos + 5..pos + 5 + lcb)
                    .ok_or("PlcPcd exceeds the CLX")?;
                return parse_plc_pcd(plc);
            }
            other => return Err(format!("unexpected CLX entry type 0x{:02X}", other)),
        }
    }
    Err("CLX has no piece table".to_string())
}

fn parse_plc_pcd(plc: &[u8]) -> Result<Vec<Piece>, String> {
    // (n + 1) CPs of 4 bytes followed by n PCDs of 8 bytes
    if plc.len() < 4 || (plc.len() - 4) % (4 + PCD_SIZE) != 0 {
        return Err(format!("malformed PlcPcd of {} bytes", plc.len()));
    }
    let count = (plc.len() - 4) / (4 + PCD_SIZE);
    let pcd_base = (count + 1) * 4;

    (0..count)
        .map(|i| -> Result<Piece, String> {
            let cp_start = read_u32(plc, i * 4).ok_or("truncated CP array")?;
            let cp_end = read_u32(plc, (i + 1) * 4).ok_or("truncated CP array")?;
            let fc = read_u32(plc, pcd_base + i * PCD_SIZE + 2).ok_or("truncated PCD")?;
            Ok(Piece {
                cp_start,
                cp_end,
                fc,
            })
        })
        .collect()
}

/// Drop field instructions (keep field results) and map Word marks to text
fn strip_control(raw: &str) -> String {
    // one entry per open field; true while still inside its instruction part
    let mut fields: Vec<bool> = Vec::new();
    let mut out = String::with_capacity(raw.len());

    for ch in raw.chars() {
        match ch {
            FIELD_BEGIN => fields.push(true),
            FIELD_SEPARATOR => {
                if let Some(in_instruction) = fields.last_mut() {
                    *in_instruction = false;
                }
            }
            FIELD_END => {
                fields.pop();
            }
            _ if fields.iter().any(|in_instruction| *in_instruction) => {}
            // paragraph end, vertical tab (line break), page/section break
            '\r' | '\u{0B}' | '\u{0C}' => out.push('\n'),
            // table cell / row mark
            '\u{07}' => out.push('\t'),
            '\u{1E}' => out.push('-'),
            '\u{1F}' => {}
            c if c.is_control() && c != '\t' && c != '\n' => {}
            c => out.push(c),
        }
    }

    out
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
