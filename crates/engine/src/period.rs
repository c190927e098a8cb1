//! Reporting windows and the farm/period filter shared by lists, summaries
//! and the income statement.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use sea_orm::{ColumnTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, util::normalize_farm};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter month label stored next to every record (`Jan` … `Dec`).
///
/// Matching is exact and case-sensitive: `"dec"` is not a month token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonthToken(&'static str);

impl MonthToken {
    /// Token for the calendar month of `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(MONTHS[date.month0() as usize])
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl FromStr for MonthToken {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        MONTHS
            .iter()
            .find(|month| **month == value)
            .map(|month| Self(*month))
            .ok_or_else(|| EngineError::Validation(format!("invalid month token: {value}")))
    }
}

impl fmt::Display for MonthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for MonthToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for MonthToken {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Reporting window. Month token and date range are never combined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PeriodFilter {
    #[default]
    AllTime,
    Month(MonthToken),
    /// Inclusive on both ends; each bound is optional.
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl PeriodFilter {
    /// Builds a period from the loose query-string shape.
    ///
    /// Fails when a month token is combined with either date bound.
    pub fn from_parts(
        month: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ResultEngine<Self> {
        let month = month.map(str::trim).filter(|m| !m.is_empty());
        match (month, start, end) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(EngineError::Validation(
                "use either month or startDate/endDate, not both".to_string(),
            )),
            (Some(month), None, None) => Ok(Self::Month(month.parse()?)),
            (None, None, None) => Ok(Self::AllTime),
            (None, start, end) => Ok(Self::Range { start, end }),
        }
    }

    /// Human label used as the `period` field of reports.
    pub fn label(&self) -> String {
        match self {
            Self::AllTime => "All time".to_string(),
            Self::Month(token) => format!("Month: {token}"),
            Self::Range { start, end } => format!(
                "From {} to {}",
                start.map_or_else(|| "earliest".to_string(), |d| d.to_string()),
                end.map_or_else(|| "latest".to_string(), |d| d.to_string()),
            ),
        }
    }

    pub fn contains(&self, month: MonthToken, date: NaiveDate) -> bool {
        match self {
            Self::AllTime => true,
            Self::Month(token) => *token == month,
            Self::Range { start, end } => {
                start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
            }
        }
    }
}

/// Farm + period restriction applied to record queries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub farm: Option<String>,
    pub period: PeriodFilter,
}

impl RecordFilter {
    pub fn new(farm: Option<&str>, period: PeriodFilter) -> Self {
        Self {
            farm: farm.map(normalize_farm).filter(|farm| !farm.is_empty()),
            period,
        }
    }

    /// In-memory counterpart of [`apply_record_filter`].
    pub fn matches(&self, farm: &str, month: MonthToken, date: NaiveDate) -> bool {
        self.farm.as_deref().is_none_or(|wanted| wanted == farm) && self.period.contains(month, date)
    }
}

/// Restricts `query` to `filter` using the table's own farm, month and date
/// columns.
pub(crate) fn apply_record_filter<Q, C>(
    mut query: Q,
    filter: &RecordFilter,
    farm: C,
    month: C,
    date: C,
) -> Q
where
    Q: QueryFilter,
    C: ColumnTrait,
{
    if let Some(farm_id) = &filter.farm {
        query = query.filter(farm.eq(farm_id.as_str()));
    }
    match &filter.period {
        PeriodFilter::AllTime => {}
        PeriodFilter::Month(token) => {
            query = query.filter(month.eq(token.as_str()));
        }
        PeriodFilter::Range { start, end } => {
            if let Some(start) = start {
                query = query.filter(date.gte(*start));
            }
            if let Some(end) = end {
                query = query.filter(date.lte(*end));
            }
        }
    }
    query
}
