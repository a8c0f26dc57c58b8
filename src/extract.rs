//! Rich-document to plain-text conversion for OOXML containers and legacy
//! BIFF workbooks.
//!
//! The extractor segments documents by line, so boundaries matter here:
//! spreadsheet rows become lines, Word paragraphs and presentation slides are
//! separated by blank lines. Only text content is kept; styles, images and
//! numbers are dropped. Worksheets are read in workbook tab order.

use calamine::{Data, Reader as _, Xls};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read};

use crate::config::LimitsConfig;
use crate::error::ConversionError;
use crate::models::FileKind;

type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

/// Compound File Binary signature; `.xls` workbooks start with it.
const OLE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Converts `bytes` to plain UTF-8 text according to `kind`.
pub fn extract_text(
    bytes: &[u8],
    kind: FileKind,
    limits: &LimitsConfig,
) -> Result<String, ConversionError> {
    match kind {
        FileKind::Spreadsheet if bytes.starts_with(&OLE_SIGNATURE) => extract_xls(bytes, limits),
        FileKind::Spreadsheet => extract_xlsx(bytes, limits),
        FileKind::WordProcessor => extract_docx(bytes, limits),
        FileKind::Presentation => extract_pptx(bytes, limits),
    }
}

fn open_archive(bytes: &[u8]) -> Result<Archive<'_>, ConversionError> {
    zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ConversionError::Archive(e.to_string()))
}

fn read_zip_entry_bounded(
    archive: &mut Archive<'_>,
    name: &str,
    max_bytes: u64,
) -> Result<Vec<u8>, ConversionError> {
    let entry = archive.by_name(name).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => ConversionError::MissingPart(name.to_string()),
        other => ConversionError::Archive(other.to_string()),
    })?;
    let mut out = Vec::new();
    entry
        .take(max_bytes)
        .read_to_end(&mut out)
        .map_err(|e| ConversionError::Archive(e.to_string()))?;
    if out.len() as u64 >= max_bytes {
        return Err(ConversionError::EntryTooLarge {
            name: name.to_string(),
            limit: max_bytes,
        });
    }
    Ok(out)
}

/// Lists numbered parts such as `ppt/slides/slide3.xml` in numeric order.
fn numbered_parts(archive: &Archive<'_>, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with(prefix) && n.ends_with(".xml"))
        .map(|s| s.to_string())
        .collect();
    names.sort_by_key(|name| {
        name.trim_start_matches(prefix)
            .trim_end_matches(".xml")
            .parse::<u32>()
            .unwrap_or(u32::MAX)
    });
    names
}

fn extract_docx(bytes: &[u8], limits: &LimitsConfig) -> Result<String, ConversionError> {
    let mut archive = open_archive(bytes)?;
    let xml = read_zip_entry_bounded(&mut archive, "word/document.xml", limits.max_xml_entry_bytes)?;
    let paragraphs = collect_paragraphs(&xml)?;
    Ok(paragraphs.join("\n\n"))
}

fn extract_pptx(bytes: &[u8], limits: &LimitsConfig) -> Result<String, ConversionError> {
    let mut archive = open_archive(bytes)?;
    let slide_names = numbered_parts(&archive, "ppt/slides/slide");
    if slide_names.is_empty() {
        return Err(ConversionError::MissingPart("ppt/slides/slide*.xml".to_string()));
    }
    let mut slides = Vec::new();
    for name in slide_names {
        let xml = read_zip_entry_bounded(&mut archive, &name, limits.max_xml_entry_bytes)?;
        let paragraphs = collect_paragraphs(&xml)?;
        if !paragraphs.is_empty() {
            slides.push(paragraphs.join("\n"));
        }
    }
    Ok(slides.join("\n\n"))
}

/// Collects the text of every `<*:p>` paragraph (WordprocessingML `w:p` and
/// DrawingML `a:p` share the local name), concatenating its `<*:t>` runs.
/// Paragraphs nested in text boxes are emitted before the paragraph that
/// holds them. Empty paragraphs are dropped.
fn collect_paragraphs(xml: &[u8]) -> Result<Vec<String>, ConversionError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_t = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_t = true,
                b"p" => open.push(String::new()),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if let Some(current) = open.last_mut() {
                    match e.local_name().as_ref() {
                        b"tab" => current.push('\t'),
                        b"br" => current.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(te)) if in_t => {
                let text = te
                    .unescape()
                    .map_err(|e| ConversionError::Xml(e.to_string()))?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"p" => {
                    if let Some(done) = open.pop() {
                        let text = done.trim();
                        if !text.is_empty() {
                            paragraphs.push(text.to_string());
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConversionError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}

fn extract_xlsx(bytes: &[u8], limits: &LimitsConfig) -> Result<String, ConversionError> {
    let mut archive = open_archive(bytes)?;
    let shared_strings = read_shared_strings(&mut archive, limits)?;
    let sheet_parts = worksheet_parts(&mut archive, limits)?;
    if sheet_parts.is_empty() {
        return Err(ConversionError::MissingPart("xl/worksheets/sheet*.xml".to_string()));
    }
    let mut lines = Vec::new();
    for name in sheet_parts.into_iter().take(limits.xlsx_max_sheets) {
        let sheet_xml = read_zip_entry_bounded(&mut archive, &name, limits.max_xml_entry_bytes)?;
        let rows = extract_sheet_rows(&sheet_xml, &shared_strings, limits.xlsx_max_cells_per_sheet)?;
        tracing::debug!(sheet = %name, rows = rows.len(), "read worksheet");
        lines.extend(rows);
    }
    Ok(lines.join("\n"))
}

/// Worksheet part paths in tab order, resolved from `xl/workbook.xml`
/// through `xl/_rels/workbook.xml.rels`. Packages without a workbook part
/// fall back to numeric part order.
fn worksheet_parts(
    archive: &mut Archive<'_>,
    limits: &LimitsConfig,
) -> Result<Vec<String>, ConversionError> {
    let workbook = match read_zip_entry_bounded(archive, "xl/workbook.xml", limits.max_xml_entry_bytes) {
        Ok(xml) => xml,
        Err(ConversionError::MissingPart(_)) => {
            return Ok(numbered_parts(archive, "xl/worksheets/sheet"))
        }
        Err(e) => return Err(e),
    };
    let rels = match read_zip_entry_bounded(
        archive,
        "xl/_rels/workbook.xml.rels",
        limits.max_xml_entry_bytes,
    ) {
        Ok(xml) => xml,
        Err(ConversionError::MissingPart(_)) => {
            tracing::warn!("workbook has no relationships part, reading sheets in part order");
            return Ok(numbered_parts(archive, "xl/worksheets/sheet"));
        }
        Err(e) => return Err(e),
    };

    let targets = read_relationships(&rels)?;
    let mut parts = Vec::new();
    let mut reader = Reader::from_reader(workbook.as_slice());
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                let rel_id = attribute(&e, b"id")?;
                match rel_id.as_deref().and_then(|id| targets.get(id)) {
                    Some(target) => {
                        let path = resolve_part(target);
                        if archive.index_for_name(&path).is_some() {
                            parts.push(path);
                        } else {
                            tracing::warn!(part = %path, "worksheet part listed in workbook is missing");
                        }
                    }
                    None => tracing::warn!(?rel_id, "sheet without a resolvable relationship"),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConversionError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(parts)
}

/// `Id` to `Target` for every `<Relationship>` in a `.rels` part.
fn read_relationships(xml: &[u8]) -> Result<HashMap<String, String>, ConversionError> {
    let mut targets = HashMap::new();
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id")?, attribute(&e, b"Target")?) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConversionError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(targets)
}

/// Unescaped value of the attribute whose local name is `name`.
fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ConversionError> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| ConversionError::Xml(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Relationship targets are relative to `xl/` unless absolute.
fn resolve_part(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// Legacy `.xls` (BIFF8) workbooks, read with calamine. Same row rules as
/// the OOXML path: string cells only, one line per row.
fn extract_xls(bytes: &[u8], limits: &LimitsConfig) -> Result<String, ConversionError> {
    let mut workbook = Xls::new(Cursor::new(bytes))
        .map_err(|e| ConversionError::LegacyWorkbook(e.to_string()))?;
    let mut lines = Vec::new();
    for name in workbook.sheet_names().into_iter().take(limits.xlsx_max_sheets) {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ConversionError::LegacyWorkbook(e.to_string()))?;
        let mut rows = RowCollector::new(limits.xlsx_max_cells_per_sheet);
        'rows: for row in range.rows() {
            for cell in row {
                if rows.is_full() {
                    break 'rows;
                }
                match cell {
                    Data::String(text) => rows.push_cell(text),
                    Data::Empty => continue,
                    _ => rows.skip_cell(),
                }
            }
            rows.end_row();
        }
        let rows = rows.finish();
        tracing::debug!(sheet = %name, rows = rows.len(), "read legacy worksheet");
        lines.extend(rows);
    }
    Ok(lines.join("\n"))
}

/// Accumulates sheet rows under a per-sheet cell budget. Hitting the budget
/// keeps whatever the current row already holds.
struct RowCollector {
    rows: Vec<String>,
    cells: Vec<String>,
    seen: usize,
    max_cells: usize,
}

impl RowCollector {
    fn new(max_cells: usize) -> Self {
        Self {
            rows: Vec::new(),
            cells: Vec::new(),
            seen: 0,
            max_cells,
        }
    }

    fn is_full(&self) -> bool {
        self.seen >= self.max_cells
    }

    fn push_cell(&mut self, text: &str) {
        self.seen += 1;
        let text = text.trim();
        if !text.is_empty() {
            self.cells.push(text.to_string());
        }
    }

    fn skip_cell(&mut self) {
        self.seen += 1;
    }

    fn end_row(&mut self) {
        let line = self.cells.join(" ");
        if !line.trim().is_empty() {
            self.rows.push(line.trim().to_string());
        }
        self.cells.clear();
    }

    fn finish(mut self) -> Vec<String> {
        if self.is_full() {
            tracing::warn!(
                max_cells = self.max_cells,
                "worksheet cell limit reached, remaining cells ignored"
            );
        }
        self.end_row();
        self.rows
    }
}

/// Reads the shared string table. Workbooks with only inline strings have
/// none, which is not an error.
fn read_shared_strings(
    archive: &mut Archive<'_>,
    limits: &LimitsConfig,
) -> Result<Vec<String>, ConversionError> {
    let xml = match read_zip_entry_bounded(archive, "xl/sharedStrings.xml", limits.max_xml_entry_bytes)
    {
        Ok(xml) => xml,
        Err(ConversionError::MissingPart(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut strings = Vec::new();
    let mut reader = Reader::from_reader(xml.as_slice());
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Ok(Event::Text(te)) if in_t => {
                let text = te
                    .unescape()
                    .map_err(|e| ConversionError::Xml(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConversionError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// How a cell stores its value, from the `t` attribute of `<c>`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CellType {
    SharedString,
    InlineString,
    FormulaString,
    Other,
}

fn cell_type(e: &BytesStart<'_>) -> CellType {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"t" {
            return match attr.value.as_ref() {
                b"s" => CellType::SharedString,
                b"inlineStr" => CellType::InlineString,
                b"str" => CellType::FormulaString,
                _ => CellType::Other,
            };
        }
    }
    CellType::Other
}

/// Returns one line per row: string-typed cells joined by a single space.
/// Rows with no string content are skipped.
fn extract_sheet_rows(
    xml: &[u8],
    shared_strings: &[String],
    max_cells: usize,
) -> Result<Vec<String>, ConversionError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut rows = RowCollector::new(max_cells);
    let mut cell_kind = CellType::Other;
    let mut cell_text = String::new();
    let mut in_value = false;
    while !rows.is_full() {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"c" => {
                    cell_kind = cell_type(&e);
                    cell_text.clear();
                }
                b"v" => in_value = true,
                b"t" if cell_kind == CellType::InlineString => in_value = true,
                _ => {}
            },
            Ok(Event::Text(te)) if in_value => {
                let text = te
                    .unescape()
                    .map_err(|e| ConversionError::Xml(e.to_string()))?;
                cell_text.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    match resolve_cell(cell_kind, &cell_text, shared_strings) {
                        Some(text) => rows.push_cell(&text),
                        None => rows.skip_cell(),
                    }
                    cell_kind = CellType::Other;
                }
                b"row" => rows.end_row(),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConversionError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(rows.finish())
}

/// Maps a raw cell value to text. Numbers, booleans, dates and errors are not
/// string-typed and yield `None`; a bad shared-string index is skipped.
fn resolve_cell(kind: CellType, raw: &str, shared_strings: &[String]) -> Option<String> {
    match kind {
        CellType::SharedString => {
            let index = match raw.trim().parse::<usize>() {
                Ok(i) => i,
                Err(_) => {
                    tracing::warn!(value = raw, "skipping cell with non-numeric shared string index");
                    return None;
                }
            };
            match shared_strings.get(index) {
                Some(s) => Some(s.clone()),
                None => {
                    tracing::warn!(index, "skipping cell with out-of-range shared string index");
                    None
                }
            }
        }
        CellType::InlineString | CellType::FormulaString => Some(raw.to_string()),
        CellType::Other => None,
    }
}
