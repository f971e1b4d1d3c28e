pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use core::hardness::{HardnessEncoding, HardnessParser, HardnessStrategy};
pub use core::reshape::{HeightPolicy, RowReshaper};
pub use core::transformer::SheetTransformer;
pub use core::{etl::EtlEngine, pipeline::HardnessPipeline};
pub use domain::model::{Cell, MaterialConstants, OutputRecord, Sheet, TransformResult, Workbook};
pub use utils::error::{EtlError, Result};
