use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Reporting window the stats API aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Yesterday,
    Week,
    LastWeek,
    Month,
    LastMonth,
    Custom(NaiveDate),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid period '{0}'. Use today|yesterday|week|lastWeek|month|lastMonth|custom")]
    UnknownPeriod(String),
    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
    pub date: Option<String>,
}

impl Period {
    /// Days back from today that a custom period lands on when no date is given.
    pub const DEFAULT_CUSTOM_OFFSET_DAYS: u64 = 2;

    pub fn code(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Week => "week",
            Self::LastWeek => "lastWeek",
            Self::Month => "month",
            Self::LastMonth => "lastMonth",
            Self::Custom(_) => "custom",
        }
    }

    pub fn custom_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Custom(date) => Some(*date),
            _ => None,
        }
    }

    pub fn default_custom_date(today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(Self::DEFAULT_CUSTOM_OFFSET_DAYS))
            .unwrap_or(today)
    }

    pub fn from_query(query: &PeriodQuery, today: NaiveDate) -> Result<Self, PeriodError> {
        let raw = query.period.as_deref().map(str::trim).unwrap_or("today");

        let period = match raw {
            "" | "today" => Self::Today,
            "yesterday" => Self::Yesterday,
            "week" | "this_week" => Self::Week,
            "lastWeek" | "last_week" => Self::LastWeek,
            "month" | "this_month" => Self::Month,
            "lastMonth" | "last_month" => Self::LastMonth,
            "custom" => {
                let date = match query.date.as_deref().map(str::trim) {
                    Some(value) if !value.is_empty() => parse_date(value)?,
                    _ => Self::default_custom_date(today),
                };
                Self::Custom(date)
            }
            other => return Err(PeriodError::UnknownPeriod(other.to_string())),
        };

        Ok(period)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr {
            period: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            date: Option<NaiveDate>,
        }

        Repr {
            period: self.code(),
            date: self.custom_date(),
        }
        .serialize(serializer)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| PeriodError::InvalidDate(raw.to_string()))
}
