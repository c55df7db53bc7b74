//! Build report model
//!
//! Mirrors the JSON document emitted by the upstream build/test step.
//! A report is parsed and validated once per run, then only borrowed.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::Result;

/// Identity of the build that produced a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// Application name
    pub app_name: String,
    /// Marketing version (e.g. `1.4.0`)
    pub version: String,
    /// Build number, kept as text because CI systems disagree on its shape
    #[serde(rename = "number", alias = "buildNumber")]
    pub build_number: String,
}

impl BuildInfo {
    pub fn new(app_name: &str, version: &str, build_number: &str) -> Self {
        BuildInfo {
            app_name: app_name.to_string(),
            version: version.to_string(),
            build_number: build_number.to_string(),
        }
    }
}

/// A single warning or error reported by the build.
///
/// Findings keep the order the upstream tool produced them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub description: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub line_number: Option<String>,
}

impl Finding {
    /// Finding without a source location.
    pub fn new(description: &str) -> Self {
        Finding {
            description: description.to_string(),
            path: None,
            line_number: None,
        }
    }

    /// Attach a file path.
    pub fn at(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Attach a line number.
    pub fn line(mut self, line_number: &str) -> Self {
        self.line_number = Some(line_number.to_string());
        self
    }
}

/// Aggregate test coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestCoverage {
    /// Overall line coverage in percent, within [0, 100]
    #[serde(rename = "overall")]
    pub overall_percent: f64,
}

/// Structured outcome of one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub build_info: BuildInfo,
    #[serde(default)]
    pub warnings: Vec<Finding>,
    #[serde(default)]
    pub errors: Vec<Finding>,
    pub test_coverage: TestCoverage,
}

impl BuildReport {
    /// Build a validated report.
    pub fn new(
        build_info: BuildInfo,
        warnings: Vec<Finding>,
        errors: Vec<Finding>,
        overall_percent: f64,
    ) -> Result<Self> {
        let report = BuildReport {
            build_info,
            warnings,
            errors,
            test_coverage: TestCoverage { overall_percent },
        };
        report.validate()?;
        Ok(report)
    }

    /// Parse and validate the upstream JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let report: BuildReport = serde_json::from_str(text)?;
        report.validate()?;
        Ok(report)
    }

    /// Check structural invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let coverage = self.test_coverage.overall_percent;
        if !coverage.is_finite() || !(0.0..=100.0).contains(&coverage) {
            return Err(ReportError::CoverageOutOfRange(coverage));
        }
        if self.build_info.app_name.trim().is_empty() {
            return Err(ReportError::EmptyField("buildInfo.appName"));
        }
        Ok(())
    }

    /// Overall coverage in percent.
    pub fn coverage(&self) -> f64 {
        self.test_coverage.overall_percent
    }
}
