//! Decode spreadsheet bytes into the [`Workbook`] grid the transformer works on.

use crate::domain::model::{Cell, RawRow, Sheet, Workbook};
use crate::utils::error::Result;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::Date)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// calamine 的 Range 從第一個有資料的儲存格開始；補回左側空欄讓欄位索引維持絕對位置，
/// 並去掉列尾的空儲存格。
fn convert_range(range: &Range<Data>) -> Vec<RawRow> {
    let left_pad = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    range
        .rows()
        .map(|cells| {
            let mut row: RawRow = Vec::with_capacity(left_pad + cells.len());
            row.resize(left_pad, Cell::Empty);
            row.extend(cells.iter().map(convert_cell));
            while matches!(row.last(), Some(Cell::Empty)) {
                row.pop();
            }
            row
        })
        .collect()
}

/// Read every sheet, in workbook order. Supports xlsx, xlsm, xlsb, xls and ods.
pub fn read_workbook(bytes: Vec<u8>) -> Result<Workbook> {
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut workbook = Workbook::default();

    for name in sheets.sheet_names() {
        let range = sheets.worksheet_range(&name)?;
        let rows = convert_range(&range);
        tracing::debug!("Read sheet '{}' ({} rows)", name, rows.len());
        workbook.sheets.push(Sheet::new(name, rows));
    }

    Ok(workbook)
}

pub fn read_workbook_file<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let bytes = std::fs::read(path)?;
    read_workbook(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;

    fn sample_bytes() -> Vec<u8> {
        let mut book = XlsxWorkbook::new();

        let first = book.add_worksheet();
        first.set_name("Plates").unwrap();
        first.write_string(2, 1, "Size").unwrap();
        first.write_string(3, 1, "L#12").unwrap();
        first.write_number(3, 3, 44.5).unwrap();

        let second = book.add_worksheet();
        second.set_name("Bars").unwrap();
        second.write_string(0, 0, "Date").unwrap();

        book.save_to_buffer().unwrap()
    }

    #[test]
    fn test_sheet_order_and_absolute_columns() {
        let workbook = read_workbook(sample_bytes()).unwrap();
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Plates", "Bars"]);

        let plates = &workbook.sheets[0];
        let data_row = plates
            .rows
            .iter()
            .find(|row| row.get(1) == Some(&Cell::from("L#12")))
            .expect("data row present");
        assert_eq!(data_row.len(), 4);
        assert_eq!(data_row[0], Cell::Empty);
        assert_eq!(data_row[3], Cell::Number(44.5));
    }

    #[test]
    fn test_trailing_empty_cells_are_trimmed() {
        let workbook = read_workbook(sample_bytes()).unwrap();
        let header_row = workbook.sheets[0]
            .rows
            .iter()
            .find(|row| row.get(1) == Some(&Cell::from("Size")))
            .unwrap();
        assert_eq!(header_row.len(), 2);
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        assert!(read_workbook(b"not a workbook".to_vec()).is_err());
    }
}
