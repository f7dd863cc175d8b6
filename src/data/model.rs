use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// RecordError – a source row that cannot become a RentalRecord
// ---------------------------------------------------------------------------

/// Data-quality problems found while turning raw cells into records.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("season code {0} is not one of 1-4")]
    InvalidSeason(i64),
    #[error("hour {0} is outside 0-23")]
    InvalidHour(i64),
    #[error("column '{column}': {value} is not a boolean flag (expected 0 or 1)")]
    InvalidFlag { column: &'static str, value: String },
    #[error("column '{column}': '{value}' is not a non-negative integer count")]
    InvalidCount { column: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// Season code as stored in the dataset (1=Spring … 4=Winter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Spring = 1,
    Summer = 2,
    Fall = 3,
    Winter = 4,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn from_code(code: i64) -> Result<Self, RecordError> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            other => Err(RecordError::InvalidSeason(other)),
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.name())
    }
}

// ---------------------------------------------------------------------------
// DayType – derived from the holiday / workingday flags
// ---------------------------------------------------------------------------

/// Derived day category. Variant order is the report row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayType {
    WorkDay,
    Weekend,
    Holiday,
}

impl DayType {
    pub const ALL: [DayType; 3] = [DayType::WorkDay, DayType::Weekend, DayType::Holiday];

    /// Holiday wins over working day; neither flag means weekend.
    pub fn classify(holiday: bool, working_day: bool) -> Self {
        if holiday {
            DayType::Holiday
        } else if working_day {
            DayType::WorkDay
        } else {
            DayType::Weekend
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayType::WorkDay => "Work Day",
            DayType::Weekend => "Weekend",
            DayType::Holiday => "Holiday",
        }
    }

    /// Parse a CLI-style name: `workday`, `work-day`, `weekend`, `holiday`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "workday" => Some(DayType::WorkDay),
            "weekend" => Some(DayType::Weekend),
            "holiday" => Some(DayType::Holiday),
            _ => None,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Measure / grouping dimension
// ---------------------------------------------------------------------------

/// The two rental counts the dashboard analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Measure {
    Casual,
    Registered,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::Casual, Measure::Registered];

    pub fn label(self) -> &'static str {
        match self {
            Measure::Casual => "casual",
            Measure::Registered => "registered",
        }
    }

    pub fn value(self, record: &RentalRecord) -> f64 {
        match self {
            Measure::Casual => record.casual as f64,
            Measure::Registered => record.registered as f64,
        }
    }
}

/// Categorical dimension a tab groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupBy {
    Season,
    DayType,
}

impl GroupBy {
    /// Every level of the dimension, in natural order.
    pub fn levels(self) -> Vec<GroupKey> {
        match self {
            GroupBy::Season => Season::ALL.into_iter().map(GroupKey::Season).collect(),
            GroupBy::DayType => DayType::ALL.into_iter().map(GroupKey::DayType).collect(),
        }
    }

    pub fn key_of(self, record: &RentalRecord) -> GroupKey {
        match self {
            GroupBy::Season => GroupKey::Season(record.season),
            GroupBy::DayType => GroupKey::DayType(record.day_type),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupBy::Season => "season",
            GroupBy::DayType => "day type",
        }
    }
}

/// One level of a [`GroupBy`] dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Season(Season),
    DayType(DayType),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Season(s) => write!(f, "{s}"),
            GroupKey::DayType(d) => write!(f, "{d}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RentalRecord – one row of the hourly dataset
// ---------------------------------------------------------------------------

/// A single hourly observation. The day type is computed once, on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalRecord {
    pub season: Season,
    /// Hour of day, 0–23.
    pub hour: u8,
    pub holiday: bool,
    pub working_day: bool,
    pub casual: u32,
    pub registered: u32,
    pub day_type: DayType,
}

impl RentalRecord {
    pub fn new(
        season: Season,
        hour: u8,
        holiday: bool,
        working_day: bool,
        casual: u32,
        registered: u32,
    ) -> Result<Self, RecordError> {
        if hour > 23 {
            return Err(RecordError::InvalidHour(hour as i64));
        }
        Ok(RentalRecord {
            season,
            hour,
            holiday,
            working_day,
            casual,
            registered,
            day_type: DayType::classify(holiday, working_day),
        })
    }

    /// Validate the integer-coded cells of a source row.
    pub fn from_codes(
        season: i64,
        hour: i64,
        holiday: i64,
        working_day: i64,
        casual: i64,
        registered: i64,
    ) -> Result<Self, RecordError> {
        let season = Season::from_code(season)?;
        let hour = u8::try_from(hour)
            .ok()
            .filter(|h| *h <= 23)
            .ok_or(RecordError::InvalidHour(hour))?;
        Self::new(
            season,
            hour,
            flag_from_code("holiday", holiday)?,
            flag_from_code("workingday", working_day)?,
            count_from_code("casual", casual)?,
            count_from_code("registered", registered)?,
        )
    }

    pub fn day_type(&self) -> DayType {
        self.day_type
    }
}

fn flag_from_code(column: &'static str, v: i64) -> Result<bool, RecordError> {
    match v {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RecordError::InvalidFlag {
            column,
            value: other.to_string(),
        }),
    }
}

fn count_from_code(column: &'static str, v: i64) -> Result<u32, RecordError> {
    u32::try_from(v).map_err(|_| RecordError::InvalidCount {
        column,
        value: v.to_string(),
    })
}

// ---------------------------------------------------------------------------
// RentalDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable after load; share it by reference.
#[derive(Debug, Clone, Default)]
pub struct RentalDataset {
    records: Vec<RentalRecord>,
    /// Distinct seasons present, for the season selector.
    seasons: BTreeSet<Season>,
}

impl RentalDataset {
    pub fn from_records(records: Vec<RentalRecord>) -> Self {
        let seasons = records.iter().map(|r| r.season).collect();
        RentalDataset { records, seasons }
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&RentalRecord> {
        self.records.get(idx)
    }

    pub fn seasons(&self) -> &BTreeSet<Season> {
        &self.seasons
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
