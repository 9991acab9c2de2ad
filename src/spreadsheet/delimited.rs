use crate::error::CourtTallyError;
use crate::ledger::Table;
use crate::spreadsheet::{records_to_table, GridSource};
use csv::ReaderBuilder;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use tracing::debug;

/// Attendance grid stored as comma separated text, header row first.
pub struct CsvGridSource<R: Read> {
    name: String,
    reader: Option<R>,
}

impl CsvGridSource<File> {
    pub fn open(file_name: &str) -> Result<Self, CourtTallyError> {
        let file = File::open(file_name)?;
        Ok(Self::from_reader(file_name, file))
    }
}

impl<R: Read> CsvGridSource<R> {
    pub fn from_reader(name: &str, reader: R) -> Self {
        CsvGridSource {
            name: name.to_owned(),
            reader: Some(reader),
        }
    }
}

impl<R: Read> GridSource for CsvGridSource<R> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn load(&mut self) -> Result<Table, CourtTallyError> {
        let reader = self.reader.take().ok_or_else(|| {
            CourtTallyError::WithContextError(format!("'{}' was already loaded", self.name))
        })?;
        let mut csv = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = Vec::<Vec<String>>::new();
        for result in csv.records() {
            let record = result?;
            records.push(record.iter().map(str::to_owned).collect());
        }
        debug!(file = %self.name, records = records.len(), "csv read");
        Ok(records_to_table(records))
    }
}

/// Writes the table as CSV: the label row, then every row at full width.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), CourtTallyError> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(table.labels())?;
    for record in table.to_records() {
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{template, REQUIRED_COLUMNS};

    #[test]
    fn reads_header_and_rows() {
        let data = "Name,Time,Total /,Price,game1,game2\nAnn,18:00,,,l,ll\n,,,,l\nBo\n";
        let mut source = CsvGridSource::from_reader("inline.csv", data.as_bytes());
        let table = source.load().unwrap();

        assert_eq!(table.width(), 6);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].count_tokens('l'), 3);
        assert!(!table.rows[1].is_active());
        assert_eq!(table.rows[2].name, "Bo");
        assert!(source.load().is_err());
    }

    #[test]
    fn empty_input() {
        let table = CsvGridSource::from_reader("empty.csv", "".as_bytes()).load().unwrap();
        assert_eq!(table.width(), 0);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn writes_full_width() {
        let mut buffer = Vec::<u8>::new();
        write_csv(&template(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Name,Time,Total /,Price,game1,"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("is,18:00,,,l,"));
        assert_eq!(first.split(',').count(), REQUIRED_COLUMNS);
    }

    #[test]
    fn file_round_trip() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("sheet.csv");
        write_csv(&template(), File::create(&path).unwrap()).unwrap();

        let table = CsvGridSource::open(path.to_str().unwrap()).unwrap().load().unwrap();
        assert_eq!(table, template());
    }
}
