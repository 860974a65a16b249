use crate::utils::error::{Result, WidgetError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 報表日期區間的預設偏移：今天的資料尚未完整，所以往前推一天
pub const DATE_RANGE_OFFSET: u32 = 1;

/// 預設報表區間天數
pub const DEFAULT_DATE_RANGE_DAYS: u32 = 28;

fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(WidgetError::InvalidSlugError {
            slug: slug.to_string(),
            reason: "slug cannot be empty".to_string(),
        });
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(WidgetError::InvalidSlugError {
            slug: slug.to_string(),
            reason: "slug may only contain ASCII letters, digits, '-' and '_'".to_string(),
        });
    }

    Ok(())
}

/// Stable identifier of a registered widget, e.g. `adsenseTopEarningPages`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct WidgetSlug(String);

impl WidgetSlug {
    pub fn new(slug: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        validate_slug(&slug)?;
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WidgetSlug {
    type Error = WidgetError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for WidgetSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a plugin module, e.g. `analytics` or `search-console`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ModuleSlug(String);

impl ModuleSlug {
    pub fn new(slug: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        validate_slug(&slug)?;
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModuleSlug {
    type Error = WidgetError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for ModuleSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleState {
    pub active: bool,
    pub connected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<f64>,
}

impl ReportRow {
    pub fn dimension(&self, index: usize) -> Option<&str> {
        self.dimensions.get(index).map(String::as_str)
    }

    pub fn metric(&self, index: usize) -> Option<f64> {
        self.metrics.get(index).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default)]
    pub totals: Vec<f64>,
}

impl Report {
    /// 沒有任何資料列，或所有指標皆為零，視為「零報表」
    pub fn is_zero(&self) -> bool {
        if self.rows.is_empty() {
            return true;
        }

        if !self.totals.is_empty() {
            return self.totals.iter().all(|total| *total == 0.0);
        }

        self.rows
            .iter()
            .all(|row| row.metrics.iter().all(|metric| *metric == 0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    /// `days` 天的區間，結束日為 `reference` 往前 `offset_days` 天
    pub fn last_days(reference: NaiveDate, days: u32, offset_days: u32) -> Self {
        let end_date = reference - Duration::days(i64::from(offset_days));
        let start_date = end_date - Duration::days(i64::from(days.saturating_sub(1)));
        Self {
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub field_name: String,
    pub sort_order: SortOrder,
}

/// Arguments of a `getReport` selection; doubles as the key for resolution and
/// error lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportQuery {
    pub module: ModuleSlug,
    pub date_range: Option<DateRange>,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
    pub url: Option<String>,
}

impl ReportQuery {
    pub fn new(module: ModuleSlug) -> Self {
        Self {
            module,
            date_range: None,
            dimensions: Vec::new(),
            metrics: Vec::new(),
            order_by: None,
            limit: None,
            url: None,
        }
    }

    pub fn date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = Some(date_range);
        self
    }

    pub fn dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, field_name: impl Into<String>, sort_order: SortOrder) -> Self {
        self.order_by = Some(OrderBy {
            field_name: field_name.into(),
            sort_order,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Error object handed back by the store for a failed selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// 追蹤事件的 beacon 內容，欄位名稱是與分析端點的相容性契約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub send_to: String,
    pub event_category: String,
    pub event_label: String,
    pub event_value: String,
    pub dimension1: String,
    pub dimension2: String,
    pub dimension3: String,
}
