pub mod etl;
pub mod hardness;
pub mod header;
pub mod pipeline;
pub mod reshape;
pub mod transformer;

pub use crate::domain::model::{OutputRecord, TransformResult, Workbook};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
