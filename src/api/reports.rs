// StreamOne ION client library for Rust
// Copyright (C) 2025 StreamOne ION SDK contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Reports resource (v3)
//!
//! # API Endpoints
//! - `GET /api/v3/accounts/{account}/reports`
//! - `GET /api/v3/accounts/{account}/reports/{report}`
//! - `POST /api/v3/accounts/{account}/reports/{report}/reportDataCsv`
//!
//! The CSV export is the one place this crate writes service data to disk:
//! the service answers with a JSON envelope whose `results` field holds the
//! raw tabular text, and that text goes to the output path verbatim.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::api::client::IonClient;
use crate::api::response::NotFoundBehavior;
use crate::error::{IonError, Result};

/// Timestamp format the report endpoints expect for fixed date ranges.
const REPORT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Module owning a report specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportsModule {
    #[default]
    Unspecified,
    Reports,
    Dashboards,
    BudgetManagement,
    Invoice,
    V1Billing,
    Caching,
}

impl ReportsModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportsModule::Unspecified => "REPORTS_MODULE_UNSPECIFIED",
            ReportsModule::Reports => "REPORTS_REPORTS_MODULE",
            ReportsModule::Dashboards => "DASHBOARDS_REPORTS_MODULE",
            ReportsModule::BudgetManagement => "BUDGET_MANAGEMENT_REPORTS_MODULE",
            ReportsModule::Invoice => "INVOICE_REPORTS_MODULE",
            ReportsModule::V1Billing => "V1_BILLING_REPORTS_MODULE",
            ReportsModule::Caching => "CACHING_REPORTS_MODULE",
        }
    }
}

/// Named relative date ranges understood by the reporting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDateRange {
    Unknown,
    Custom,
    Today,
    MonthToDate,
    QuarterToDate,
    YearToDate,
    LastMonth,
    LastQuarter,
    LastYear,
    LatestMonth,
    WeekToDate,
    LastWeek,
    TwoMonthsAgo,
}

impl RelativeDateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelativeDateRange::Unknown => "UNKNOWN_RELATIVE_DATE_RANGE",
            RelativeDateRange::Custom => "CUSTOM",
            RelativeDateRange::Today => "TODAY",
            RelativeDateRange::MonthToDate => "MONTH_TO_DATE",
            RelativeDateRange::QuarterToDate => "QUARTER_TO_DATE",
            RelativeDateRange::YearToDate => "YEAR_TO_DATE",
            RelativeDateRange::LastMonth => "LAST_MONTH",
            RelativeDateRange::LastQuarter => "LAST_QUARTER",
            RelativeDateRange::LastYear => "LAST_YEAR",
            RelativeDateRange::LatestMonth => "LATEST_MONTH",
            RelativeDateRange::WeekToDate => "WEEK_TO_DATE",
            RelativeDateRange::LastWeek => "LAST_WEEK",
            RelativeDateRange::TwoMonthsAgo => "TWO_MONTHS_AGO",
        }
    }
}

/// Date-range specification for a report export: either a named relative
/// range or an explicit start/end pair.
#[derive(Debug, Clone)]
pub enum ReportDateRange {
    Relative(RelativeDateRange),
    Fixed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl ReportDateRange {
    /// Render the `specs` payload fragment the export endpoint expects.
    fn to_specs(&self) -> Value {
        match self {
            ReportDateRange::Relative(range) => json!({
                "date_range_option": { "select_date_range": range.as_str() }
            }),
            ReportDateRange::Fixed { start, end } => json!({
                "date_range_option": {
                    "fixed_date_range": {
                        "start_date": start.format(REPORT_DATE_FORMAT).to_string(),
                        "end_date": end.format(REPORT_DATE_FORMAT).to_string(),
                    }
                }
            }),
        }
    }
}

impl IonClient {
    /// List the report specifications available to the given module.
    ///
    /// 404 classifies as "no reports" and yields an empty list.
    pub async fn list_reports(&self, module: ReportsModule) -> Result<Vec<Value>> {
        let params = [("module".to_string(), module.as_str().to_string())];
        let data = self
            .v3_get(
                &self.v3_account_path("/reports"),
                &params,
                NotFoundBehavior::EmptyObject,
            )
            .await?;
        Ok(data
            .get("reports")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Fetch a single report specification by ID.
    pub async fn get_report(&self, report_id: &str) -> Result<Value> {
        self.v3_get(
            &self.v3_account_path(&format!("/reports/{}", report_id)),
            &[],
            NotFoundBehavior::EmptyObject,
        )
        .await
    }

    /// Generate a report and write its tabular data to `path`.
    ///
    /// The service-returned payload is written verbatim; no parsing or
    /// reshaping happens on the way to disk. When `path` is `None` the
    /// data lands in `report.csv` in the working directory.
    ///
    /// # Errors
    /// Classified failures from the export call; `InvalidResponse` when
    /// the envelope lacks the `results` field; `Io` when the file write
    /// fails.
    pub async fn export_report_csv(
        &self,
        report_id: &str,
        module: ReportsModule,
        category: &str,
        date_range: ReportDateRange,
        path: Option<PathBuf>,
    ) -> Result<PathBuf> {
        let payload = json!({
            "report_id": report_id,
            "report_module": module.as_str(),
            "category": category,
            "specs": date_range.to_specs(),
        });

        let data = self
            .v3_post_json(
                &self.v3_account_path(&format!("/reports/{}/reportDataCsv", report_id)),
                &payload,
                NotFoundBehavior::EmptyObject,
            )
            .await?;

        let results = data
            .get("results")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                IonError::invalid_response("report data response has no \"results\" field")
            })?;

        let path = path.unwrap_or_else(|| PathBuf::from("report.csv"));
        tokio::fs::write(&path, results).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn module_names_match_the_wire_enum() {
        assert_eq!(
            ReportsModule::Unspecified.as_str(),
            "REPORTS_MODULE_UNSPECIFIED"
        );
        assert_eq!(ReportsModule::V1Billing.as_str(), "V1_BILLING_REPORTS_MODULE");
        assert_eq!(ReportsModule::default(), ReportsModule::Unspecified);
    }

    #[test]
    fn relative_range_renders_select_date_range() {
        let specs = ReportDateRange::Relative(RelativeDateRange::MonthToDate).to_specs();
        assert_eq!(
            specs["date_range_option"]["select_date_range"],
            "MONTH_TO_DATE"
        );
    }

    #[test]
    fn fixed_range_renders_zulu_timestamps() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap();
        let specs = ReportDateRange::Fixed { start, end }.to_specs();
        let fixed = &specs["date_range_option"]["fixed_date_range"];
        assert_eq!(fixed["start_date"], "2025-03-01T00:00:00Z");
        assert_eq!(fixed["end_date"], "2025-03-31T23:59:59Z");
    }
}
