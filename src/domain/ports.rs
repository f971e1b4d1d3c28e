use crate::core::hardness::HardnessStrategy;
use crate::core::reshape::HeightPolicy;
use crate::domain::model::{MaterialConstants, TransformResult, Workbook};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn material_constants(&self) -> MaterialConstants;
    fn hardness_strategy(&self) -> HardnessStrategy;
    fn height_policy(&self) -> HeightPolicy;

    /// 設定時將所有輸出打包成 zip
    fn archive_filename(&self) -> Option<&str> {
        None
    }

    fn sheet_name(&self) -> &str {
        "All Data"
    }

    fn output_filename(&self, format: &str) -> String {
        format!("transformed_all_data.{}", format)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Workbook>;
    async fn transform(&self, workbook: Workbook) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
