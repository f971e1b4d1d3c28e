use crate::core::hardness::HardnessStrategy;
use crate::core::reshape::HeightPolicy;
use crate::core::ConfigProvider;
use crate::domain::model::MaterialConstants;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 輸入工作簿路徑
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    pub hardness_strategy: Option<HardnessStrategy>,
    pub height_policy: Option<HeightPolicy>,
    pub material: Option<MaterialConstants>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub sheet_name: Option<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub xlsx: Option<String>,
    pub csv: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// trace / debug / info / warn / error
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INPUT_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_workbook_path("source.path", &self.source.path)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(sheet_name) = &self.load.sheet_name {
            validation::validate_non_empty_string("load.sheet_name", sheet_name)?;
        }

        if let Some(compression) = &self.load.compression {
            if compression.enabled {
                validation::validate_file_extensions(
                    "load.compression.filename",
                    &[compression.filename.clone()],
                    &["zip"],
                )?;
            }
        }

        if let Some(level) = self.log_level() {
            validation::validate_log_level("monitoring.log_level", level)?;
        }

        validation::validate_material_constants("transform.material", &self.material_constants())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn material_constants(&self) -> MaterialConstants {
        self.transform.material.unwrap_or_default()
    }

    fn hardness_strategy(&self) -> HardnessStrategy {
        self.transform.hardness_strategy.unwrap_or_default()
    }

    fn height_policy(&self) -> HeightPolicy {
        self.transform.height_policy.unwrap_or_default()
    }

    fn archive_filename(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn sheet_name(&self) -> &str {
        self.load.sheet_name.as_deref().unwrap_or("All Data")
    }

    fn output_filename(&self, format: &str) -> String {
        let custom = self.load.filenames.as_ref().and_then(|names| match format {
            "xlsx" => names.xlsx.clone(),
            "csv" => names.csv.clone(),
            "json" => names.json.clone(),
            _ => None,
        });
        custom.unwrap_or_else(|| format!("transformed_all_data.{}", format))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
