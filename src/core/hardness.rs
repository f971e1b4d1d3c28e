//! Hardness cell normalization.
//!
//! A hardness cell may hold one reading or several, written in whichever
//! shorthand the operator used that day. Each shorthand is a named
//! [`HardnessEncoding`]; a [`HardnessStrategy`] decides which encodings are
//! tried and in what order. The first encoding that yields at least one
//! reading wins and the readings are averaged to one decimal place.

use crate::domain::model::Cell;
use crate::utils::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardnessEncoding {
    /// 每行一筆：`"09 043.3\n10 045.1"` (序號 + 空白 + 讀值)
    IndexedReadings,
    /// `"44.2"`
    BareNumber,
    /// `"47.47.46"`
    PeriodSeparated,
    /// `"47° 48° 46°"`
    DegreeMarked,
}

impl HardnessEncoding {
    pub fn name(self) -> &'static str {
        match self {
            HardnessEncoding::IndexedReadings => "indexed-readings",
            HardnessEncoding::BareNumber => "bare-number",
            HardnessEncoding::PeriodSeparated => "period-separated",
            HardnessEncoding::DegreeMarked => "degree-marked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum HardnessStrategy {
    /// Newline-segmented indexed readings only.
    Segmented,
    /// All known encodings, in priority order.
    #[default]
    Extended,
}

impl HardnessStrategy {
    pub fn encodings(self) -> &'static [HardnessEncoding] {
        match self {
            HardnessStrategy::Segmented => &[HardnessEncoding::IndexedReadings],
            HardnessStrategy::Extended => &[
                HardnessEncoding::IndexedReadings,
                HardnessEncoding::BareNumber,
                HardnessEncoding::PeriodSeparated,
                HardnessEncoding::DegreeMarked,
            ],
        }
    }
}

impl fmt::Display for HardnessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardnessStrategy::Segmented => write!(f, "segmented"),
            HardnessStrategy::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for HardnessStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "segmented" => Ok(HardnessStrategy::Segmented),
            "extended" => Ok(HardnessStrategy::Extended),
            other => Err(format!("unknown hardness strategy: {}", other)),
        }
    }
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[derive(Debug, Clone)]
pub struct HardnessParser {
    strategy: HardnessStrategy,
    indexed: Regex,
    bare: Regex,
    leading_int: Regex,
    degree: Regex,
}

impl HardnessParser {
    pub fn new(strategy: HardnessStrategy) -> Result<Self> {
        Ok(Self {
            strategy,
            indexed: Regex::new(r"[0-9]+\s+([0-9]+\.?[0-9]*)")?,
            bare: Regex::new(r"^[0-9]+\.?[0-9]*$")?,
            leading_int: Regex::new(r"^\s*([+-]?[0-9]+)")?,
            degree: Regex::new(r"([0-9]+)°")?,
        })
    }

    /// 解析儲存格；無法解析時回傳 None
    pub fn parse(&self, cell: &Cell) -> Option<f64> {
        match cell {
            Cell::Empty | Cell::Bool(_) | Cell::Date(_) => None,
            Cell::Number(n) if !n.is_finite() => None,
            Cell::Number(_) | Cell::Text(_) => self.parse_text(&cell.to_text()),
        }
    }

    pub fn parse_text(&self, raw: &str) -> Option<f64> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.strategy.encodings().iter().find_map(|&encoding| {
            let readings = self.readings(encoding, text)?;
            tracing::trace!(
                "hardness {:?} matched {} ({} readings)",
                text,
                encoding.name(),
                readings.len()
            );
            mean(&readings)
                .filter(|m| m.is_finite())
                .map(round_one_decimal)
        })
    }

    /// Readings found by a single encoding, or `None` if it does not apply.
    /// Digits are ASCII only; readings that overflow `f64` are dropped.
    pub fn readings(&self, encoding: HardnessEncoding, text: &str) -> Option<Vec<f64>> {
        let mut values: Vec<f64> = match encoding {
            HardnessEncoding::IndexedReadings => text
                .split('\n')
                .filter_map(|segment| {
                    let caps = self.indexed.captures(segment)?;
                    caps.get(1)?.as_str().parse::<f64>().ok()
                })
                .collect(),
            HardnessEncoding::BareNumber => {
                if !self.bare.is_match(text) {
                    return None;
                }
                vec![text.parse::<f64>().ok()?]
            }
            HardnessEncoding::PeriodSeparated => {
                if !text.contains('.') {
                    return None;
                }
                text.split('.')
                    .filter_map(|segment| {
                        let caps = self.leading_int.captures(segment)?;
                        caps.get(1)?.as_str().parse::<i64>().ok().map(|n| n as f64)
                    })
                    .collect()
            }
            HardnessEncoding::DegreeMarked => {
                if !text.contains('°') {
                    return None;
                }
                text.split_whitespace()
                    .filter_map(|token| {
                        let caps = self.degree.captures(token)?;
                        caps.get(1)?.as_str().parse::<f64>().ok()
                    })
                    .collect()
            }
        };
        values.retain(|v| v.is_finite());

        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }
}
