use crate::adapters::export::{bundle_zip, ExportFile};
use crate::adapters::workbook_reader::read_workbook;
use crate::core::transformer::SheetTransformer;
use crate::core::{ConfigProvider, Pipeline, Storage, TransformResult, Workbook};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::validate_output_formats;
use std::path::Path;

/// 讀取試驗工作簿、正規化硬度並匯出的管道
pub struct HardnessPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    transformer: SheetTransformer,
}

impl<S: Storage, C: ConfigProvider> HardnessPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let transformer = SheetTransformer::with_settings(
            config.hardness_strategy(),
            config.material_constants(),
            config.height_policy(),
        )?;

        Ok(Self {
            storage,
            config,
            transformer,
        })
    }

    fn output_file_path(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    /// 依設定的格式產生輸出檔內容
    pub fn render(&self, result: &TransformResult) -> Result<Vec<ExportFile>> {
        let formats = validate_output_formats("output_formats", self.config.output_formats())?;

        formats
            .into_iter()
            .map(|format| {
                let data = format.render(&result.records, self.config.sheet_name())?;
                tracing::debug!("Rendered {} output ({} bytes)", format, data.len());
                Ok(ExportFile {
                    name: self.config.output_filename(format.extension()),
                    data,
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for HardnessPipeline<S, C> {
    async fn extract(&self) -> Result<Workbook> {
        let input = self.config.input_path();
        tracing::debug!("Reading workbook from: {}", input);

        let bytes = self.storage.read_file(input).await?;
        let workbook = read_workbook(bytes)?;

        if workbook.is_empty() {
            return Err(EtlError::ProcessingError {
                message: format!("Workbook '{}' has no sheets", input),
            });
        }

        Ok(workbook)
    }

    async fn transform(&self, workbook: Workbook) -> Result<TransformResult> {
        tracing::debug!(
            "Hardness strategy: {}, height policy: {}",
            self.config.hardness_strategy(),
            self.config.height_policy()
        );

        let result = self.transformer.transform(&workbook);

        if result.records.is_empty() {
            tracing::warn!("No test rows produced output records; check the sheet layout");
        }

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let files = self.render(&result)?;

        if let Some(archive) = self.config.archive_filename() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = bundle_zip(&files)?;
            let path = self.output_file_path(archive);
            self.storage.write_file(&path, &zip_data).await?;
            return Ok(path);
        }

        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let path = self.output_file_path(&file.name);
            self.storage.write_file(&path, &file.data).await?;
            written.push(path);
        }

        Ok(written.join(", "))
    }
}
