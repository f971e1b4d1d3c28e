use crate::domain::model::{Cell, RawRow};

/// Labels that mark the header row of a test sheet.
pub const HEADER_LABELS: [&str; 2] = ["Date", "Size"];

fn is_header_cell(cell: &Cell) -> bool {
    matches!(cell, Cell::Text(s) if HEADER_LABELS.contains(&s.as_str()))
}

/// 找出第一筆資料列的索引
///
/// 第一個含有 `"Date"` 或 `"Size"` (完全相同，不修剪、區分大小寫) 的列為標題列，
/// 資料從下一列開始；找不到時整張表都視為資料 (回傳 0)。
pub fn data_start_row(rows: &[RawRow]) -> usize {
    rows.iter()
        .position(|row| row.iter().any(is_header_cell))
        .map(|header| header + 1)
        .unwrap_or(0)
}
