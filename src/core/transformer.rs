use crate::core::hardness::{HardnessParser, HardnessStrategy};
use crate::core::header::data_start_row;
use crate::core::reshape::{HeightPolicy, RowReshaper};
use crate::domain::model::{MaterialConstants, Sheet, TestType, TransformResult, TransformStats, Workbook};
use crate::utils::error::Result;

/// 將整本工作簿轉為輸出記錄
#[derive(Debug, Clone)]
pub struct SheetTransformer {
    reshaper: RowReshaper,
}

impl SheetTransformer {
    pub fn new(reshaper: RowReshaper) -> Self {
        Self { reshaper }
    }

    pub fn with_settings(
        strategy: HardnessStrategy,
        constants: MaterialConstants,
        height_policy: HeightPolicy,
    ) -> Result<Self> {
        let parser = HardnessParser::new(strategy)?;
        Ok(Self::new(RowReshaper::new(parser, constants, height_policy)))
    }

    /// Sheets in workbook order, rows top to bottom, CSA before EN.
    pub fn transform(&self, workbook: &Workbook) -> TransformResult {
        let mut result = TransformResult::default();

        for sheet in &workbook.sheets {
            self.transform_sheet(sheet, &mut result);
        }

        tracing::debug!(
            "Transformed {} sheets: {} rows scanned, {} skipped, {} CSA + {} EN records",
            result.stats.sheets,
            result.stats.rows_scanned,
            result.stats.rows_skipped,
            result.stats.csa_records,
            result.stats.en_records
        );

        result
    }

    fn transform_sheet(&self, sheet: &Sheet, result: &mut TransformResult) {
        let start = data_start_row(&sheet.rows);
        tracing::debug!("Sheet '{}': data starts at row {}", sheet.name, start);

        let stats: &mut TransformStats = &mut result.stats;
        stats.sheets += 1;

        for row in sheet.rows.iter().skip(start) {
            stats.rows_scanned += 1;
            let records = self.reshaper.reshape(row);
            if records.is_empty() {
                stats.rows_skipped += 1;
                continue;
            }
            for record in records {
                if record.test_type_code == TestType::Csa.code() {
                    stats.csa_records += 1;
                } else {
                    stats.en_records += 1;
                }
                result.records.push(record);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Cell, RawRow};

    fn transformer() -> SheetTransformer {
        SheetTransformer::with_settings(
            HardnessStrategy::Extended,
            MaterialConstants::default(),
            HeightPolicy::PreferOriginal,
        )
        .unwrap()
    }

    fn data_row(size: &str, csa: bool, en: bool) -> RawRow {
        let mut row = vec![Cell::Empty; 14];
        row[0] = Cell::from("2024-03-01");
        row[1] = Cell::from(size);
        if csa {
            row[2] = Cell::Number(3.0);
            row[3] = Cell::from("44");
            row[4] = Cell::Number(30.0);
            row[5] = Cell::Number(4.0);
        }
        if en {
            row[10] = Cell::Number(2.0);
            row[11] = Cell::from("46");
            row[12] = Cell::Number(25.0);
            row[13] = Cell::Number(3.0);
        }
        row
    }

    fn header_row() -> RawRow {
        vec![Cell::from("Date"), Cell::from("Size")]
    }

    #[test]
    fn test_order_across_sheets_and_rows() {
        let workbook = Workbook::new(vec![
            Sheet::new("A", vec![header_row(), data_row("L#1", true, true), data_row("L#2", false, true)]),
            Sheet::new("B", vec![data_row("R#3", true, false)]),
        ]);

        let result = transformer().transform(&workbook);
        let summary: Vec<(u32, u8)> = result
            .records
            .iter()
            .map(|r| (r.size, r.test_type_code))
            .collect();
        assert_eq!(summary, vec![(1, 0), (1, 1), (2, 1), (3, 0)]);
        assert_eq!(result.stats.sheets, 2);
        assert_eq!(result.stats.rows_scanned, 3);
        assert_eq!(result.stats.csa_records, 2);
        assert_eq!(result.stats.en_records, 2);
    }

    #[test]
    fn test_rows_above_header_are_ignored() {
        let workbook = Workbook::new(vec![Sheet::new(
            "Tests",
            vec![data_row("L#9", true, false), header_row(), data_row("L#4", true, false)],
        )]);
        let result = transformer().transform(&workbook);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].size, 4);
    }

    #[test]
    fn test_malformed_rows_do_not_abort() {
        let workbook = Workbook::new(vec![Sheet::new(
            "Tests",
            vec![
                header_row(),
                vec![Cell::from("short")],
                data_row("n/a", true, true),
                data_row("L#5", true, true),
            ],
        )]);
        let result = transformer().transform(&workbook);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.stats.rows_skipped, 2);
    }

    #[test]
    fn test_output_bounded_by_twice_row_count() {
        let rows: Vec<RawRow> = (1..=20)
            .map(|i| data_row(&format!("L#{}", i), i % 2 == 0, i % 3 != 0))
            .collect();
        let workbook = Workbook::new(vec![Sheet::new("S", rows)]);
        let result = transformer().transform(&workbook);
        assert!(result.records.len() <= 2 * workbook.total_rows());
    }

    #[test]
    fn test_empty_workbook() {
        let result = transformer().transform(&Workbook::default());
        assert!(result.records.is_empty());
        assert_eq!(result.stats, TransformStats::default());
    }
}
