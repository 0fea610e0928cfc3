use crate::models::{RegionKey, Variable, WeatherRecord};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use validator::Validate;

#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    /// Blank Rainfall/Max/Min cells; these do not make a row invalid
    pub missing_values: usize,
    pub violations: Vec<RecordViolation>,
    pub region_statistics: HashMap<RegionKey, RegionStatistics>,
}

#[derive(Debug, Clone)]
pub struct RecordViolation {
    pub region: RegionKey,
    pub date: NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    FieldValidation,
    DuplicateDate,
    MaxBelowMin,
}

#[derive(Debug, Clone, Default)]
pub struct RegionStatistics {
    pub total_records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_rainfall: f64,
}

/// Sanity checks over master-table rows before they are split or charted
pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check_integrity(&self, records: &[WeatherRecord]) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: records.len(),
            valid_records: 0,
            invalid_records: 0,
            missing_values: 0,
            violations: Vec::new(),
            region_statistics: HashMap::new(),
        };
        let mut seen: HashSet<(RegionKey, NaiveDate)> = HashSet::new();

        for record in records {
            let region = record.region_key();
            let mut valid = true;

            if let Err(e) = record.validate() {
                valid = false;
                report.push(record, ViolationType::FieldValidation, e.to_string());
            }

            report.missing_values += Variable::ALL
                .iter()
                .filter(|v| record.value(**v).is_none())
                .count();

            if let (Some(max), Some(min)) = (record.max_temperature, record.min_temperature) {
                if max < min {
                    valid = false;
                    report.push(
                        record,
                        ViolationType::MaxBelowMin,
                        format!("max temperature {} is below min temperature {}", max, min),
                    );
                }
            }

            if !seen.insert((region.clone(), record.date)) {
                valid = false;
                report.push(
                    record,
                    ViolationType::DuplicateDate,
                    "more than one row for this region and date".to_string(),
                );
            }

            if valid {
                report.valid_records += 1;
            } else {
                report.invalid_records += 1;
            }

            let stats = report.region_statistics.entry(region).or_default();
            stats.total_records += 1;
            stats.total_rainfall += record.rainfall.unwrap_or(0.0);
            stats.first_date = Some(stats.first_date.map_or(record.date, |d| d.min(record.date)));
            stats.last_date = Some(stats.last_date.map_or(record.date, |d| d.max(record.date)));
        }

        report
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();
        let pct = |n: usize| {
            if report.total_records == 0 {
                0.0
            } else {
                100.0 * n as f64 / report.total_records as f64
            }
        };

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!("Regions: {}\n", report.region_statistics.len()));
        summary.push_str(&format!(
            "Valid Records: {} ({:.1}%)\n",
            report.valid_records,
            pct(report.valid_records)
        ));
        summary.push_str(&format!(
            "Invalid Records: {} ({:.1}%)\n",
            report.invalid_records,
            pct(report.invalid_records)
        ));
        summary.push_str(&format!("Missing Readings: {}\n", report.missing_values));
        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} on {}: {}\n",
                    i + 1,
                    violation.region,
                    violation.date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl IntegrityReport {
    fn push(&mut self, record: &WeatherRecord, violation_type: ViolationType, details: String) {
        self.violations.push(RecordViolation {
            region: record.region_key(),
            date: record.date,
            violation_type,
            details,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, rain: f64, max: f64, min: f64) -> WeatherRecord {
        WeatherRecord::new(
            "Punjab",
            "Amritsar",
            "Ajnala",
            NaiveDate::from_ymd_opt(2005, 8, day).unwrap(),
            rain,
            max,
            min,
        )
    }

    #[test]
    fn test_clean_records() {
        let records = vec![record(1, 4.0, 34.0, 26.0), record(2, 0.0, 35.0, 27.0)];
        let checker = IntegrityChecker::new();
        let report = checker.check_integrity(&records);

        assert!(report.is_clean());
        assert_eq!(report.valid_records, 2);

        let stats = &report.region_statistics[&records[0].region_key()];
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.total_rainfall, 4.0);
        assert!(checker.generate_summary(&report).contains("Total Records: 2"));
    }

    #[test]
    fn test_violations() {
        let records = vec![
            record(1, -3.0, 34.0, 26.0),
            record(2, 0.0, 20.0, 27.0),
            record(2, 0.0, 35.0, 27.0),
        ];
        let report = IntegrityChecker::new().check_integrity(&records);

        let kinds: Vec<ViolationType> =
            report.violations.iter().map(|v| v.violation_type).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationType::FieldValidation,
                ViolationType::MaxBelowMin,
                ViolationType::DuplicateDate
            ]
        );
        assert_eq!(report.invalid_records, 3);
    }

    #[test]
    fn test_missing_readings_counted_not_invalid() {
        let mut gap = record(3, 1.5, 33.0, 25.0);
        gap.rainfall = None;
        gap.min_temperature = None;

        let checker = IntegrityChecker::new();
        let report = checker.check_integrity(&[gap]);

        assert!(report.is_clean());
        assert_eq!(report.missing_values, 2);
        assert_eq!(report.region_statistics.values().next().unwrap().total_rainfall, 0.0);
        assert!(checker.generate_summary(&report).contains("Missing Readings: 2"));
    }

    #[test]
    fn test_empty_summary() {
        let checker = IntegrityChecker::new();
        let report = checker.check_integrity(&[]);
        assert!(checker.generate_summary(&report).contains("Valid Records: 0 (0.0%)"));
    }
}
