use crate::error::CourtTallyError;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::ledger::Table;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::{records_to_table, GridSource, SpreadsheetError};
use glob::Pattern;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use tracing::{debug, warn};
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_RELATIONSHIP: &[u8] = b"Relationship";       // Workbook relationship
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// Attendance grid stored in an Excel `.xlsx` workbook.
///
/// The first worksheet whose name matches the pattern (or the first worksheet when no
/// pattern is given) is read; its first occupied row is the header row.
pub struct XlsxGridSource<R: Read + Seek> {
    /// File name of the workbook
    name: String,
    /// ZIP archive containing the workbook parts
    zip: ZipArchive<R>,
    /// Worksheets as (name, zip_path) pairs in workbook order
    sheets: Vec<(String, String)>,
    /// Optional sheet name pattern
    pattern: Option<Pattern>,
}

impl XlsxGridSource<BufReader<File>> {
    /// Opens a workbook from disk.
    pub fn open(file_name: &str, sheet_pattern: Option<&str>) -> Result<Self, CourtTallyError> {
        let file = File::open(file_name)?;
        Self::from_reader(file_name, BufReader::new(file), sheet_pattern)
    }
}

impl<R: Read + Seek> XlsxGridSource<R> {
    /// Opens a workbook from any seekable reader.
    pub fn from_reader(name: &str, reader: R, sheet_pattern: Option<&str>) -> Result<Self, CourtTallyError> {
        let pattern = sheet_pattern.map(Pattern::new).transpose()?;
        let mut zip = ZipArchive::new(reader)?;
        let sheets = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?
        }
        Ok(XlsxGridSource {
            name: name.to_owned(),
            zip,
            sheets,
            pattern,
        })
    }

    /// Names of the worksheets in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Picks the worksheet to read.
    fn select_sheet(&self) -> Result<(String, String), CourtTallyError> {
        let selected = match &self.pattern {
            Some(pattern) => self.sheets.iter().find(|(name, _)| pattern.matches(name)),
            None => self.sheets.first(),
        };
        let pattern = self.pattern.as_ref().map(Pattern::as_str).unwrap_or("*");
        selected
            .cloned()
            .ok_or_else(|| SpreadsheetError::SheetNotFoundError(self.name.to_owned(), pattern.to_owned()).into())
    }

    /// Loads the whole shared string table.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, CourtTallyError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }

    /// Reads the cells of one worksheet.
    fn read_sheet(&mut self, sheet_name: &str, zip_path: &str) -> Result<Sheet, CourtTallyError> {
        let mut sheet = Sheet::new(sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut reader = self.zip.xml_reader(zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                row_count = row;
                col_count = col + 1;
                kind = event.get_attribute_value("t")?.map(|t| {
                    match t.as_ref() {
                        "inlineStr" | "str" | "d" => CellType::InlineString,
                        "s" => CellType::SharedString,
                        "b" => CellType::Boolean,
                        "e" => CellType::Error,
                        _ => CellType::Number,
                    }
                }).unwrap_or(CellType::Number);
                value.clear();
            }
            Event::Start(event) if event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if !value.is_empty() && event.name() == TAG_CELL => {
                let cell = Cell {
                    row,
                    col,
                    kind,
                    value: value.to_owned(),
                };
                if kind == CellType::Error {
                    Err(SpreadsheetError::CellValueError(
                        self.name.to_owned(),
                        sheet.name.to_owned(),
                        cell.reference(),
                        value.to_owned(),
                    ))?
                }
                if Sheet::within_limits(row, col) {
                    sheet.push(cell);
                } else {
                    warn!(file = %self.name, sheet = %sheet.name, cell = %cell.reference(), "cell outside the grid skipped");
                }
                value.clear();
            }
        });
        Ok(sheet)
    }
}

impl<R: Read + Seek> GridSource for XlsxGridSource<R> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn load(&mut self) -> Result<Table, CourtTallyError> {
        let (sheet_name, zip_path) = self.select_sheet()?;
        let shared_strings = self.load_shared_strings()?;
        let sheet = self.read_sheet(&sheet_name, &zip_path)?;
        debug!(file = %self.name, sheet = %sheet_name, cells = sheet.cells.len(), "worksheet read");
        Ok(records_to_table(sheet.records(&shared_strings)))
    }
}

/// Loads the worksheet list as (name, zip_path) pairs in workbook order.
fn load_workbook<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<Vec<(String, String)>, CourtTallyError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id.to_string()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Maps worksheet relationship ids to their zip paths.
fn load_relationships<R: Read + Seek>(zip: &mut ZipArchive<R>, path: &str) -> Result<HashMap<String, String>, CourtTallyError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheet relationships
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(&target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target to a path inside the archive.
fn to_zip_path(path: &str) -> String {
    if let Some(stripped) = path.strip_prefix('/') {
        stripped.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Reads a string value up to `end_tag`, skipping phonetic annotations.
fn read_string_value<B: BufRead>(
    reader: &mut XmlReader<B>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, CourtTallyError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ledger::REQUIRED_COLUMNS;
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Notes" sheetId="1" r:id="rId1"/><sheet name="Week 42" sheetId="2" r:id="rId2"/></sheets>
</workbook>"#;

    const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">
<si><t>Name</t></si><si><t>Ann &amp; co</t></si><si><r><t>l</t></r><rPh><t>x</t></rPh></si><si><t>game1</t></si>
</sst>"#;

    const NOTES_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>nothing here</t></is></c></row>
</sheetData></worksheet>"#;

    /// Header row with shared "Name" and "game1" labels, one player row holding tokens
    /// in E2 (shared) and F2 (inline), a number in D2 and a blank player in row 3.
    fn attendance_sheet(extra_cell: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>Time</t></is></c><c r="E1" t="s"><v>3</v></c><c r="X1" t="inlineStr"><is><t>game20</t></is></c></row>
<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" t="str"><v>18:00</v></c><c r="D2"><v>80.0</v></c><c r="E2" t="s"><v>2</v></c><c r="F2" t="inlineStr"><is><t>ll</t></is></c></row>
<row r="3"><c r="E3" t="s"><v>2</v></c>{extra_cell}</row>
</sheetData></worksheet>"#
        )
    }

    pub(crate) fn workbook(extra_cell: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let parts = [
            ("xl/_rels/workbook.xml.rels", RELATIONSHIPS.to_owned()),
            ("xl/workbook.xml", WORKBOOK.to_owned()),
            ("xl/sharedStrings.xml", SHARED_STRINGS.to_owned()),
            ("xl/worksheets/sheet1.xml", NOTES_SHEET.to_owned()),
            ("xl/worksheets/sheet2.xml", attendance_sheet(extra_cell)),
        ];
        for (path, content) in parts {
            writer.start_file(path, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn source(bytes: Vec<u8>, pattern: Option<&str>) -> XlsxGridSource<Cursor<Vec<u8>>> {
        XlsxGridSource::from_reader("test.xlsx", Cursor::new(bytes), pattern).unwrap()
    }

    #[test]
    fn lists_sheets() {
        let source = source(workbook(""), None);
        assert_eq!(source.sheet_names(), vec!["Notes", "Week 42"]);
    }

    #[test]
    fn reads_matching_sheet() {
        let table = source(workbook(""), Some("Week*")).load().unwrap();

        assert_eq!(table.width(), REQUIRED_COLUMNS);
        assert_eq!(table.columns[0], "Name");
        assert_eq!(table.columns[1], "Time");
        assert_eq!(table.columns[2], "");
        assert_eq!(table.columns[4], "game1");
        assert_eq!(table.rows.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.name, "Ann & co");
        assert_eq!(first.time, "18:00");
        assert_eq!(first.price.as_number(), Some(80.0));
        assert_eq!(first.games[0], "l");
        assert_eq!(first.games[1], "ll");

        assert!(!table.rows[1].is_active());
        assert_eq!(table.rows[1].games[0], "l");
    }

    #[test]
    fn first_sheet_by_default() {
        let table = source(workbook(""), None).load().unwrap();
        assert_eq!(table.columns, vec!["nothing here"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn missing_sheet() {
        let error = source(workbook(""), Some("Week 1")).load().unwrap_err();
        assert_eq!(error.to_string(), "Sheet matching 'Week 1' not found in 'test.xlsx'");
    }

    #[test]
    fn error_cells_are_rejected() {
        let bytes = workbook(r#"<c r="G3" t="e"><v>#REF!</v></c>"#);
        let error = source(bytes, Some("Week 42")).load().unwrap_err();
        assert_eq!(error.to_string(), "Invalid cell value in 'test.xlsx' sheet 'Week 42' at G3: '#REF!'");
    }

    #[test]
    fn far_away_cells_are_skipped() {
        let bytes = workbook(r#"<c r="XFD1048576"><v>1</v></c><c r="IW3" t="inlineStr"><is><t>l</t></is></c>"#);
        let table = source(bytes, Some("Week 42")).load().unwrap();
        assert_eq!(table.width(), REQUIRED_COLUMNS);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].games[0], "l");
    }

    #[test]
    fn zip_paths() {
        assert_eq!(to_zip_path("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path("/xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path("xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
    }
}
