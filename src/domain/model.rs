use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 試算表中的單一儲存格 (未定型別)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDateTime),
}

impl Cell {
    /// Empty, "", 0, NaN and false count as unpopulated.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Text(s) => !s.is_empty(),
            Cell::Bool(b) => *b,
            Cell::Date(_) => true,
        }
    }

    /// 數值轉換；無法解析時回傳 None，不會失敗
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Empty | Cell::Bool(_) | Cell::Date(_) => None,
        };
        value.filter(|n| n.is_finite())
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Date(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// One source row; trailing empty cells are not part of it.
pub type RawRow = Vec<Cell>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// 工作簿：依宣告順序排列的工作表
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

/// 固定材料常數，每筆輸出記錄皆相同
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConstants {
    pub yield_strength: f64,
    pub tensile_strength: f64,
    pub elongation_percent: f64,
    pub elastic_modulus: f64,
}

impl Default for MaterialConstants {
    fn default() -> Self {
        Self {
            yield_strength: 434.0,
            tensile_strength: 739.0,
            elongation_percent: 25.5,
            elastic_modulus: 210.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    Csa,
    En,
}

impl TestType {
    pub fn code(self) -> u8 {
        match self {
            TestType::Csa => 0,
            TestType::En => 1,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::Csa => write!(f, "CSA"),
            TestType::En => write!(f, "EN"),
        }
    }
}

/// 正規化後的輸出記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub hardness: Option<f64>,
    pub yield_strength: f64,
    pub tensile_strength: f64,
    pub elongation_percent: f64,
    pub elastic_modulus: f64,
    pub thickness: Option<f64>,
    pub height: Option<f64>,
    pub size: u32,
    pub temperature_code: u8,
    pub test_type_code: u8,
    pub plasticine_height: Option<f64>,
}

/// Export header labels, in field order.
pub const OUTPUT_HEADERS: [&str; 11] = [
    "Hardness (HRC)",
    "Yield Str (MPa)",
    "Tensile Str (MPa)",
    "Elongation(%)",
    "Elastic Mod (GPa)",
    "Thickness (mm)",
    "Height (mm)",
    "Size",
    "Temperature",
    "Test Type",
    "Plasticine Height (mm)",
];

impl OutputRecord {
    /// 依匯出欄位順序展開；None 代表空白儲存格
    pub fn values(&self) -> [Option<f64>; 11] {
        [
            self.hardness,
            Some(self.yield_strength),
            Some(self.tensile_strength),
            Some(self.elongation_percent),
            Some(self.elastic_modulus),
            self.thickness,
            self.height,
            Some(f64::from(self.size)),
            Some(f64::from(self.temperature_code)),
            Some(f64::from(self.test_type_code)),
            self.plasticine_height,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub sheets: usize,
    pub rows_scanned: usize,
    pub rows_skipped: usize,
    pub csa_records: usize,
    pub en_records: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<OutputRecord>,
    pub stats: TransformStats,
}
