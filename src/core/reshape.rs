use crate::core::hardness::HardnessParser;
use crate::domain::model::{Cell, MaterialConstants, OutputRecord, RawRow, TestType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rows shorter than this are not test rows.
pub const MIN_ROW_LEN: usize = 10;

/// 欄位位置 (0-based)
pub mod cols {
    pub const SIZE: usize = 1;

    pub const CSA_THICKNESS: usize = 2;
    pub const CSA_HARDNESS: usize = 3;
    pub const CSA_HEIGHT: usize = 4;
    pub const CSA_PLASTICINE: usize = 5;
    pub const CSA_ORIGINAL_HEIGHT: usize = 6;

    pub const EN_THICKNESS: usize = 10;
    pub const EN_HARDNESS: usize = 11;
    pub const EN_HEIGHT: usize = 12;
    pub const EN_PLASTICINE: usize = 13;
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Which column supplies the CSA height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum HeightPolicy {
    /// Original height (col 6) when present, else measured height (col 4).
    #[default]
    PreferOriginal,
    /// Measured height (col 4) only.
    Measured,
}

impl fmt::Display for HeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightPolicy::PreferOriginal => write!(f, "prefer_original"),
            HeightPolicy::Measured => write!(f, "measured"),
        }
    }
}

impl FromStr for HeightPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "prefer_original" | "prefer-original" => Ok(HeightPolicy::PreferOriginal),
            "measured" => Ok(HeightPolicy::Measured),
            other => Err(format!("unknown height policy: {}", other)),
        }
    }
}

fn cell(row: &RawRow, index: usize) -> &Cell {
    row.get(index).unwrap_or(&EMPTY_CELL)
}

/// Optional numeric field: non-numeric, empty and zero all become `None`.
fn number(cell: &Cell) -> Option<f64> {
    cell.as_number().filter(|n| *n != 0.0)
}

fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// 解析尺寸欄：各去掉第一個 `L#` / `R#` 後取開頭整數，必須為正數
pub fn parse_size(cell: &Cell) -> Option<u32> {
    if !cell.is_truthy() || matches!(cell, Cell::Bool(_) | Cell::Date(_)) {
        return None;
    }
    let text = cell.to_text().replacen("L#", "", 1).replacen("R#", "", 1);
    let size = leading_integer(&text)?;
    u32::try_from(size).ok().filter(|s| *s > 0)
}

#[derive(Debug, Clone)]
pub struct RowReshaper {
    parser: HardnessParser,
    constants: MaterialConstants,
    height_policy: HeightPolicy,
}

impl RowReshaper {
    pub fn new(parser: HardnessParser, constants: MaterialConstants, height_policy: HeightPolicy) -> Self {
        Self {
            parser,
            constants,
            height_policy,
        }
    }

    /// 將一列原始資料轉為 0~2 筆記錄 (CSA 在前，EN 在後)
    pub fn reshape(&self, row: &RawRow) -> Vec<OutputRecord> {
        let mut records = Vec::with_capacity(2);

        if row.len() < MIN_ROW_LEN {
            return records;
        }

        let Some(size) = parse_size(cell(row, cols::SIZE)) else {
            tracing::trace!("skipping row without usable size: {:?}", cell(row, cols::SIZE));
            return records;
        };

        if let Some(record) = self.csa_record(row, size) {
            records.push(record);
        }
        if let Some(record) = self.en_record(row, size) {
            records.push(record);
        }

        records
    }

    fn csa_record(&self, row: &RawRow, size: u32) -> Option<OutputRecord> {
        let required = [cols::CSA_THICKNESS, cols::CSA_HEIGHT, cols::CSA_PLASTICINE];
        if !required.iter().all(|&i| cell(row, i).is_truthy()) {
            return None;
        }

        let original = cell(row, cols::CSA_ORIGINAL_HEIGHT);
        let height = match self.height_policy {
            HeightPolicy::PreferOriginal if original.is_truthy() => number(original),
            _ => number(cell(row, cols::CSA_HEIGHT)),
        };

        Some(self.record(
            TestType::Csa,
            self.parser.parse(cell(row, cols::CSA_HARDNESS)),
            number(cell(row, cols::CSA_THICKNESS)),
            height,
            size,
            number(cell(row, cols::CSA_PLASTICINE)),
        ))
    }

    fn en_record(&self, row: &RawRow, size: u32) -> Option<OutputRecord> {
        let required = [cols::EN_THICKNESS, cols::EN_HEIGHT, cols::EN_PLASTICINE];
        if !required.iter().all(|&i| cell(row, i).is_truthy()) {
            return None;
        }

        Some(self.record(
            TestType::En,
            self.parser.parse(cell(row, cols::EN_HARDNESS)),
            number(cell(row, cols::EN_THICKNESS)),
            number(cell(row, cols::EN_HEIGHT)),
            size,
            number(cell(row, cols::EN_PLASTICINE)),
        ))
    }

    fn record(
        &self,
        test_type: TestType,
        hardness: Option<f64>,
        thickness: Option<f64>,
        height: Option<f64>,
        size: u32,
        plasticine_height: Option<f64>,
    ) -> OutputRecord {
        OutputRecord {
            hardness,
            yield_strength: self.constants.yield_strength,
            tensile_strength: self.constants.tensile_strength,
            elongation_percent: self.constants.elongation_percent,
            elastic_modulus: self.constants.elastic_modulus,
            thickness,
            height,
            size,
            temperature_code: 0,
            test_type_code: test_type.code(),
            plasticine_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hardness::HardnessStrategy;

    fn reshaper(policy: HeightPolicy) -> RowReshaper {
        let parser = HardnessParser::new(HardnessStrategy::Extended).unwrap();
        RowReshaper::new(parser, MaterialConstants::default(), policy)
    }

    /// 14 欄的測試列，未指定的欄位為空
    fn row(cells: &[(usize, Cell)]) -> RawRow {
        let mut row = vec![Cell::Empty; 14];
        for (i, c) in cells {
            row[*i] = c.clone();
        }
        row
    }

    fn csa_cells() -> Vec<(usize, Cell)> {
        vec![
            (0, Cell::from("2024-03-01")),
            (1, Cell::from("L#12")),
            (2, Cell::Number(3.2)),
            (3, Cell::from("09 043.3\n10 045.1")),
            (4, Cell::Number(30.5)),
            (5, Cell::Number(4.1)),
        ]
    }

    fn en_cells() -> Vec<(usize, Cell)> {
        vec![
            (10, Cell::Number(2.8)),
            (11, Cell::from("47.47.46")),
            (12, Cell::Number(28.0)),
            (13, Cell::from("3.9")),
        ]
    }

    #[test]
    fn test_csa_only_row_emits_one_record() {
        let records = reshaper(HeightPolicy::PreferOriginal).reshape(&row(&csa_cells()));
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.test_type_code, 0);
        assert_eq!(r.temperature_code, 0);
        assert_eq!(r.size, 12);
        assert_eq!(r.hardness, Some(44.2));
        assert_eq!(r.thickness, Some(3.2));
        assert_eq!(r.height, Some(30.5));
        assert_eq!(r.plasticine_height, Some(4.1));
        assert_eq!(r.yield_strength, 434.0);
        assert_eq!(r.elongation_percent, 25.5);
    }

    #[test]
    fn test_both_groups_csa_first() {
        let mut cells = csa_cells();
        cells.extend(en_cells());
        let records = reshaper(HeightPolicy::PreferOriginal).reshape(&row(&cells));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].test_type_code, 0);
        assert_eq!(records[1].test_type_code, 1);
        assert_eq!(records[1].hardness, Some(46.7));
        assert_eq!(records[1].height, Some(28.0));
        assert_eq!(records[1].plasticine_height, Some(3.9));
        assert_eq!(records[1].size, 12);
    }

    #[test]
    fn test_en_only_row() {
        let mut cells = vec![(1, Cell::Number(8.0))];
        cells.extend(en_cells());
        let records = reshaper(HeightPolicy::PreferOriginal).reshape(&row(&cells));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].test_type_code, 1);
        assert_eq!(records[0].size, 8);
    }

    #[test]
    fn test_short_row_is_skipped() {
        let mut short = row(&csa_cells());
        short.truncate(9);
        assert!(reshaper(HeightPolicy::PreferOriginal).reshape(&short).is_empty());
    }

    #[test]
    fn test_bad_size_skips_whole_row() {
        let r = reshaper(HeightPolicy::PreferOriginal);
        for size in [Cell::Empty, Cell::from("R#0"), Cell::from("L#"), Cell::from("n/a"), Cell::Number(0.0)] {
            let mut cells = csa_cells();
            cells.extend(en_cells());
            cells[1] = (1, size.clone());
            assert!(r.reshape(&row(&cells)).is_empty(), "size {:?}", size);
        }
    }

    #[test]
    fn test_missing_required_column_drops_group() {
        let mut cells = csa_cells();
        cells[4] = (4, Cell::Empty);
        assert!(reshaper(HeightPolicy::PreferOriginal).reshape(&row(&cells)).is_empty());
    }

    #[test]
    fn test_height_prefers_original_column() {
        let mut cells = csa_cells();
        cells.push((6, Cell::Number(31.0)));
        let prefer = reshaper(HeightPolicy::PreferOriginal).reshape(&row(&cells));
        assert_eq!(prefer[0].height, Some(31.0));

        let measured = reshaper(HeightPolicy::Measured).reshape(&row(&cells));
        assert_eq!(measured[0].height, Some(30.5));
    }

    #[test]
    fn test_non_numeric_fields_become_absent() {
        let mut cells = csa_cells();
        cells[2] = (2, Cell::from("thin"));
        cells[3] = (3, Cell::from("see notes"));
        cells[5] = (5, Cell::from("-"));
        let records = reshaper(HeightPolicy::PreferOriginal).reshape(&row(&cells));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].thickness, None);
        assert_eq!(records[0].hardness, None);
        assert_eq!(records[0].plasticine_height, None);
        assert_eq!(records[0].size, 12);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size(&Cell::from("L#12")), Some(12));
        assert_eq!(parse_size(&Cell::from("R#7")), Some(7));
        assert_eq!(parse_size(&Cell::from(" 15 mm")), Some(15));
        assert_eq!(parse_size(&Cell::Number(10.0)), Some(10));
        assert_eq!(parse_size(&Cell::Number(10.9)), Some(10));
        assert_eq!(parse_size(&Cell::from("-4")), None);
        assert_eq!(parse_size(&Cell::from("L#R#")), None);
        assert_eq!(parse_size(&Cell::from("L#R#12")), Some(12));
        assert_eq!(parse_size(&Cell::from("L#L#12")), None);
        assert_eq!(parse_size(&Cell::Bool(true)), None);
    }

    #[test]
    fn test_height_policy_from_str() {
        assert_eq!("prefer-original".parse::<HeightPolicy>(), Ok(HeightPolicy::PreferOriginal));
        assert_eq!("measured".parse::<HeightPolicy>(), Ok(HeightPolicy::Measured));
        assert!("tallest".parse::<HeightPolicy>().is_err());
    }
}
