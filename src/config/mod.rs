pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::hardness::HardnessStrategy;
    use crate::core::reshape::HeightPolicy;
    use crate::core::ConfigProvider;
    use crate::domain::model::MaterialConstants;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "hardness-etl")]
    #[command(about = "Normalize mechanical-test workbooks into a single hardness table")]
    pub struct CliConfig {
        /// Workbook to read (.xlsx, .xlsm, .xlsb, .xls, .ods)
        #[arg(short, long)]
        pub input: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_delimiter = ',', default_value = "xlsx")]
        pub formats: Vec<String>,

        #[arg(long, value_enum, default_value_t = HardnessStrategy::Extended)]
        pub hardness_strategy: HardnessStrategy,

        #[arg(long, value_enum, default_value_t = HeightPolicy::PreferOriginal)]
        pub height_policy: HeightPolicy,

        #[arg(long, default_value = "All Data")]
        pub sheet_name: String,

        /// Bundle every output file into this zip archive
        #[arg(long)]
        pub archive: Option<String>,

        #[arg(long, default_value_t = 434.0)]
        pub yield_strength: f64,

        #[arg(long, default_value_t = 739.0)]
        pub tensile_strength: f64,

        #[arg(long, default_value_t = 25.5)]
        pub elongation_percent: f64,

        #[arg(long, default_value_t = 210.0)]
        pub elastic_modulus: f64,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn material_constants(&self) -> MaterialConstants {
            MaterialConstants {
                yield_strength: self.yield_strength,
                tensile_strength: self.tensile_strength,
                elongation_percent: self.elongation_percent,
                elastic_modulus: self.elastic_modulus,
            }
        }

        fn hardness_strategy(&self) -> HardnessStrategy {
            self.hardness_strategy
        }

        fn height_policy(&self) -> HeightPolicy {
            self.height_policy
        }

        fn archive_filename(&self) -> Option<&str> {
            self.archive.as_deref()
        }

        fn sheet_name(&self) -> &str {
            &self.sheet_name
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_workbook_path("input", &self.input)?;
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_output_formats("formats", &self.formats)?;
            validation::validate_non_empty_string("sheet_name", &self.sheet_name)?;
            if let Some(archive) = &self.archive {
                validation::validate_file_extensions("archive", &[archive.clone()], &["zip"])?;
            }
            validation::validate_material_constants("material", &self.material_constants())
        }
    }

}
