use crate::adapters::export::{OutputFormat, SUPPORTED_FORMATS};
use crate::domain::model::MaterialConstants;
use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

/// Spreadsheet extensions the reader understands.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(field_name: &str, files: &[String], allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(extension.to_ascii_lowercase().as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

/// 檢查輸入檔路徑與副檔名
pub fn validate_workbook_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    validate_file_extensions(field_name, &[path.to_string()], &WORKBOOK_EXTENSIONS)
}

/// Parsed formats in first-seen order; repeats are dropped so each output file is written once.
pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<Vec<OutputFormat>> {
    if formats.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: format!(
                "At least one output format is required. Valid formats: {}",
                SUPPORTED_FORMATS.join(", ")
            ),
        });
    }

    let mut parsed = Vec::with_capacity(formats.len());
    for f in formats {
        let format = f
            .parse::<OutputFormat>()
            .map_err(|_| EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: f.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    SUPPORTED_FORMATS.join(", ")
                ),
            })?;
        if !parsed.contains(&format) {
            parsed.push(format);
        }
    }
    Ok(parsed)
}

pub fn validate_log_level(field_name: &str, level: &str) -> Result<()> {
    if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: level.to_string(),
            reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_material_constants(prefix: &str, constants: &MaterialConstants) -> Result<()> {
    validate_positive(&format!("{}.yield_strength", prefix), constants.yield_strength)?;
    validate_positive(&format!("{}.tensile_strength", prefix), constants.tensile_strength)?;
    validate_positive(&format!("{}.elastic_modulus", prefix), constants.elastic_modulus)?;
    validate_range(
        &format!("{}.elongation_percent", prefix),
        constants.elongation_percent,
        0.0,
        100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_workbook_path() {
        assert!(validate_workbook_path("input", "tests/plates.xlsx").is_ok());
        assert!(validate_workbook_path("input", "legacy/PLATES.XLS").is_ok());
        assert!(validate_workbook_path("input", "").is_err());
        assert!(validate_workbook_path("input", "notes.txt").is_err());
        assert!(validate_workbook_path("input", "no_extension").is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["xlsx".to_string(), "csv".to_string()];
        assert_eq!(
            validate_output_formats("formats", &formats).unwrap(),
            vec![OutputFormat::Xlsx, OutputFormat::Csv]
        );
        assert!(validate_output_formats("formats", &["tsv".to_string()]).is_err());
        assert!(validate_output_formats("formats", &[]).is_err());
    }

    #[test]
    fn test_repeated_output_formats_collapse() {
        let formats: Vec<String> = ["csv", "json", "CSV", "csv"].iter().map(|f| f.to_string()).collect();
        assert_eq!(
            validate_output_formats("formats", &formats).unwrap(),
            vec![OutputFormat::Csv, OutputFormat::Json]
        );
    }

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("monitoring.log_level", "debug").is_ok());
        assert!(validate_log_level("monitoring.log_level", "WARN").is_ok());
        assert!(validate_log_level("monitoring.log_level", "verbose").is_err());
    }

    #[test]
    fn test_validate_material_constants() {
        assert!(validate_material_constants("material", &MaterialConstants::default()).is_ok());

        let negative = MaterialConstants {
            yield_strength: -1.0,
            ..MaterialConstants::default()
        };
        assert!(validate_material_constants("material", &negative).is_err());

        let elongation = MaterialConstants {
            elongation_percent: 120.0,
            ..MaterialConstants::default()
        };
        assert!(validate_material_constants("material", &elongation).is_err());
    }
}
