//! Parsing for the flat metric files.
//!
//! Each file carries a single line of comma-separated `KEY : FLOAT` pairs,
//! e.g. `PSNR : 21.240, SSIM : 0.694, LPIPS : 0.315`. Only the first line is
//! consumed. Parse failures never abort the upload: the record falls back to
//! zero placeholders so the row still lands in the sheet.

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

pub const IMAGE_QUALITY_KEYS: &[&str] = &["PSNR", "SSIM", "LPIPS"];
pub const POSE_ERROR_KEYS: &[&str] = &["RPE_trans", "RPE_rot", "ATE"];

const ZERO: &str = "0.000";

/// One parsed metric file: a fixed key set with a 3-decimal formatted value
/// per key. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRecord {
    keys: &'static [&'static str],
    values: Vec<String>,
}

impl MetricRecord {
    /// All-zero placeholder record for the given key set.
    pub fn zeros(keys: &'static [&'static str]) -> Self {
        Self {
            keys,
            values: vec![ZERO.to_string(); keys.len()],
        }
    }

    /// Reads the first line of `path` and extracts the recognized keys.
    /// Unrecognized pairs are ignored; absent keys default to `"0.000"`.
    /// Any read or parse failure logs an error and yields the zero record.
    pub fn from_file(path: &Path, keys: &'static [&'static str]) -> Self {
        match read_first_line(path).and_then(|line| parse_metric_line(&line)) {
            Ok(parsed) => {
                let values = keys
                    .iter()
                    .map(|key| format!("{:.3}", parsed.get(*key).copied().unwrap_or(0.0)))
                    .collect();
                Self { keys, values }
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), "metric file unusable: {error:#}");
                eprintln!("❌ Error reading '{}': {error}", path.display());
                Self::zeros(keys)
            }
        }
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    /// Formatted value for `key`; `"0.000"` for keys outside the set.
    pub fn get(&self, key: &str) -> &str {
        self.keys
            .iter()
            .position(|k| *k == key)
            .map(|idx| self.values[idx].as_str())
            .unwrap_or(ZERO)
    }

    /// Values in key order, for the batched row write.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

fn read_first_line(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Ok(content.lines().next().unwrap_or_default().trim().to_string())
}

/// Splits a `KEY : FLOAT, KEY : FLOAT, ...` line into an ordered map.
pub fn parse_metric_line(line: &str) -> Result<IndexMap<String, f64>> {
    if line.is_empty() {
        bail!("empty metrics line");
    }
    let mut parsed = IndexMap::new();
    for part in line.split(',') {
        let Some((key, value)) = part.split_once(':') else {
            bail!("malformed metric pair '{}' (expected KEY : FLOAT)", part.trim());
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("missing key in metric pair '{}'", part.trim());
        }
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("non-numeric value in metric pair '{}'", part.trim()))?;
        parsed.insert(key.to_string(), value);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record_from(content: &str, keys: &'static [&'static str]) -> MetricRecord {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        MetricRecord::from_file(file.path(), keys)
    }

    #[test]
    fn test_parse_image_quality_line() {
        let record = record_from("PSNR : 21.24, SSIM : 0.694, LPIPS : 0.315", IMAGE_QUALITY_KEYS);
        assert_eq!(record.get("PSNR"), "21.240");
        assert_eq!(record.get("SSIM"), "0.694");
        assert_eq!(record.get("LPIPS"), "0.315");
    }

    #[test]
    fn test_parse_pose_line() {
        let record = record_from("RPE_trans: 0.026, RPE_rot: 0.035, ATE: 0.003", POSE_ERROR_KEYS);
        assert_eq!(record.get("RPE_trans"), "0.026");
        assert_eq!(record.get("RPE_rot"), "0.035");
        assert_eq!(record.get("ATE"), "0.003");
    }

    #[test]
    fn test_only_first_line_is_read() {
        let record = record_from("PSNR : 30.0\nPSNR : 99.9", IMAGE_QUALITY_KEYS);
        assert_eq!(record.get("PSNR"), "30.000");
    }

    #[test]
    fn test_absent_keys_default_to_zero() {
        let record = record_from("PSNR : 18.5", IMAGE_QUALITY_KEYS);
        assert_eq!(record.get("PSNR"), "18.500");
        assert_eq!(record.get("SSIM"), "0.000");
        assert_eq!(record.get("LPIPS"), "0.000");
    }

    #[test]
    fn test_empty_file_yields_zero_record() {
        let record = record_from("", IMAGE_QUALITY_KEYS);
        assert_eq!(record, MetricRecord::zeros(IMAGE_QUALITY_KEYS));
    }

    #[test]
    fn test_malformed_line_yields_zero_record() {
        let record = record_from("PSNR 21.24, SSIM = 0.694", IMAGE_QUALITY_KEYS);
        assert_eq!(record, MetricRecord::zeros(IMAGE_QUALITY_KEYS));
    }

    #[test]
    fn test_non_numeric_value_yields_zero_record() {
        let record = record_from("PSNR : high, SSIM : 0.694", IMAGE_QUALITY_KEYS);
        assert_eq!(record, MetricRecord::zeros(IMAGE_QUALITY_KEYS));
    }

    #[test]
    fn test_missing_file_yields_zero_record() {
        let record =
            MetricRecord::from_file(Path::new("/nonexistent/test.txt"), IMAGE_QUALITY_KEYS);
        assert_eq!(record, MetricRecord::zeros(IMAGE_QUALITY_KEYS));
    }

    #[test]
    fn test_parse_metric_line_preserves_order() {
        let parsed = parse_metric_line("B : 2.0, A : 1.0").unwrap();
        let keys: Vec<_> = parsed.keys().cloned().collect();
        assert_eq!(keys, vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_values_iterate_in_key_order() {
        let record = record_from("LPIPS : 0.3, PSNR : 21.0, SSIM : 0.5", IMAGE_QUALITY_KEYS);
        let values: Vec<_> = record.values().collect();
        assert_eq!(values, vec!["21.000", "0.500", "0.300"]);
    }
}
