use crate::domain::model::{OutputRecord, OUTPUT_HEADERS};
use crate::utils::error::{EtlError, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use zip::write::{FileOptions, ZipWriter};

pub const SUPPORTED_FORMATS: [&str; 3] = ["xlsx", "csv", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    pub fn render(self, records: &[OutputRecord], sheet_name: &str) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Xlsx => to_xlsx(records, sheet_name),
            OutputFormat::Csv => to_csv(records),
            OutputFormat::Json => to_json(records),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(EtlError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    SUPPORTED_FORMATS.join(", ")
                ),
            }),
        }
    }
}

/// 已產生的輸出檔
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// 單一工作表：固定 11 欄標題，每筆記錄一列，None 留空
pub fn to_xlsx(records: &[OutputRecord], sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col, label) in OUTPUT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *label, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.values().iter().enumerate() {
            if let Some(value) = value {
                worksheet.write_number(row, col as u16, *value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn to_csv(records: &[OutputRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(OUTPUT_HEADERS)?;

    for record in records {
        writer.write_record(
            record
                .values()
                .iter()
                .map(|v| v.map(|n| n.to_string()).unwrap_or_default()),
        )?;
    }

    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })
}

pub fn to_json(records: &[OutputRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

pub fn bundle_zip(files: &[ExportFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for file in files {
        zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
        zip.write_all(&file.data)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::workbook_reader::read_workbook;
    use crate::domain::model::Cell;
    use std::io::Read;

    fn records() -> Vec<OutputRecord> {
        vec![
            OutputRecord {
                hardness: Some(44.2),
                yield_strength: 434.0,
                tensile_strength: 739.0,
                elongation_percent: 25.5,
                elastic_modulus: 210.0,
                thickness: Some(3.2),
                height: Some(30.5),
                size: 12,
                temperature_code: 0,
                test_type_code: 0,
                plasticine_height: Some(4.1),
            },
            OutputRecord {
                hardness: None,
                yield_strength: 434.0,
                tensile_strength: 739.0,
                elongation_percent: 25.5,
                elastic_modulus: 210.0,
                thickness: Some(2.8),
                height: None,
                size: 12,
                temperature_code: 0,
                test_type_code: 1,
                plasticine_height: Some(3.9),
            },
        ]
    }

    #[test]
    fn test_csv_header_and_blank_fields() {
        let csv = String::from_utf8(to_csv(&records()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Hardness (HRC),Yield Str (MPa),Tensile Str (MPa),Elongation(%),Elastic Mod (GPa),Thickness (mm),Height (mm),Size,Temperature,Test Type,Plasticine Height (mm)"
        );
        assert_eq!(lines[1], "44.2,434,739,25.5,210,3.2,30.5,12,0,0,4.1");
        assert_eq!(lines[2], ",434,739,25.5,210,2.8,,12,0,1,3.9");
    }

    #[test]
    fn test_xlsx_round_trips_through_reader() {
        let bytes = to_xlsx(&records(), "All Data").unwrap();
        let workbook = read_workbook(bytes).unwrap();
        assert_eq!(workbook.sheets.len(), 1);

        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.name, "All Data");
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0][0], Cell::from("Hardness (HRC)"));
        assert_eq!(sheet.rows[0][10], Cell::from("Plasticine Height (mm)"));
        assert_eq!(sheet.rows[1][0], Cell::Number(44.2));
        assert_eq!(sheet.rows[2][0], Cell::Empty);
        assert_eq!(sheet.rows[2][9], Cell::Number(1.0));
    }

    #[test]
    fn test_json_uses_null_for_absent() {
        let json: serde_json::Value = serde_json::from_slice(&to_json(&records()).unwrap()).unwrap();
        assert!(json[1]["hardness"].is_null());
        assert_eq!(json[0]["size"], 12);
    }

    #[test]
    fn test_bundle_zip_contains_all_files() {
        let files = vec![
            ExportFile {
                name: "a.csv".to_string(),
                data: b"x,y".to_vec(),
            },
            ExportFile {
                name: "b.json".to_string(),
                data: b"[]".to_vec(),
            },
        ];
        let bytes = bundle_zip(&files).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive.by_name("a.csv").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "x,y");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("XLSX".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!(" csv ".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}
