//! Query-string parameters accepted by the HTTP handlers

use crate::error::{AppError, AppResult};
use crate::storage::ResponseFilter;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use shared_types::Language;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 500;
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseListQuery {
    pub email: Option<String>,
    pub language: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AdminResponsesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub email: Option<String>,
    pub language: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub language: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
    /// Replace existing questions instead of skipping an already seeded table
    pub replace: Option<bool>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_language(value: Option<&str>) -> AppResult<Option<Language>> {
    value
        .map(|raw| {
            raw.parse::<Language>()
                .map_err(|_| AppError::InvalidRequest("Invalid language. Use EN or ID".to_string()))
        })
        .transpose()
}

/// Parse a date filter into unix seconds.
///
/// Accepts unix seconds, RFC 3339 timestamps, or a bare `YYYY-MM-DD` date.
/// A bare date used as an end bound covers that whole day.
pub fn parse_date_bound(raw: &str, end_of_day: bool) -> AppResult<i64> {
    if let Ok(seconds) = raw.parse::<i64>() {
        return Ok(seconds);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.timestamp());
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidRequest(format!("Invalid date '{}'", raw)))?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|t| t.and_utc().timestamp())
        .ok_or_else(|| AppError::InvalidRequest(format!("Invalid date '{}'", raw)))
}

fn build_filter(
    email: &Option<String>,
    language: &Option<String>,
    start_date: &Option<String>,
    end_date: &Option<String>,
) -> AppResult<ResponseFilter> {
    Ok(ResponseFilter {
        email: non_empty(email).map(str::to_string),
        language: parse_language(non_empty(language))?,
        start: non_empty(start_date)
            .map(|raw| parse_date_bound(raw, false))
            .transpose()?,
        end: non_empty(end_date)
            .map(|raw| parse_date_bound(raw, true))
            .transpose()?,
    })
}

impl ResponseListQuery {
    pub fn filter(&self) -> AppResult<ResponseFilter> {
        build_filter(&self.email, &self.language, &self.start_date, &self.end_date)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_PAGE_SIZE)
    }
}

impl AdminResponsesQuery {
    pub fn filter(&self) -> AppResult<ResponseFilter> {
        build_filter(&self.email, &self.language, &self.start_date, &self.end_date)
    }

    /// 1-based page and page size, both clamped to sane values
    pub fn page_and_limit(&self) -> (i64, i64) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1).min(MAX_PAGE);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        (page, limit)
    }
}

impl ReportQuery {
    pub fn filter(&self) -> AppResult<ResponseFilter> {
        build_filter(&None, &self.language, &self.start_date, &self.end_date)
    }
}
