//! CLI argument parsing for the dashboard

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::filter::{DayTypeScope, HourRange, Selection};
use crate::data::model::{DayType, Season};

/// File opened when no path is given and it exists in the working directory.
pub const DEFAULT_DATA_FILE: &str = "hour.csv";

/// Output format for `--report`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "bikeshare-dashboard")]
#[command(version)]
#[command(about = "Bike rental analysis dashboard: rentals by season and day type, with ANOVA", long_about = None)]
pub struct Cli {
    /// Dataset to load (.csv, .json, .parquet). Defaults to ./hour.csv when present
    #[arg(value_name = "DATA")]
    pub data: Option<PathBuf>,

    /// Print the analysis reports and exit instead of opening the window
    #[arg(long)]
    pub report: bool,

    /// Report format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Initially selected season codes (e.g. --seasons 1,2,3,4)
    #[arg(long, value_delimiter = ',', value_parser = parse_season, value_name = "CODES")]
    pub seasons: Option<Vec<Season>>,

    /// Initial hour-of-day window, inclusive (e.g. --hours 7-19)
    #[arg(long, value_parser = parse_hour_range, value_name = "LO-HI")]
    pub hours: Option<HourRange>,

    /// Initially selected day types (workday, weekend, holiday)
    #[arg(long = "day-types", value_delimiter = ',', value_parser = parse_day_type, value_name = "TYPES")]
    pub day_types: Option<Vec<DayType>>,

    /// Apply the season and hour selection to the day-type tab as well
    #[arg(long = "chain-day-type")]
    pub chain_day_type: bool,
}

impl Cli {
    /// Explicit path, else `hour.csv` if it exists.
    pub fn data_path(&self) -> Option<PathBuf> {
        self.data.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_DATA_FILE);
            default.exists().then_some(default)
        })
    }

    /// Initial selection: everything, narrowed by whichever flags were given.
    pub fn selection(&self) -> Selection {
        let mut sel = Selection::all();
        if let Some(seasons) = &self.seasons {
            sel.seasons = seasons.iter().copied().collect();
        }
        if let Some(hours) = self.hours {
            sel.hours = hours;
        }
        if let Some(day_types) = &self.day_types {
            sel.day_types = day_types.iter().copied().collect();
        }
        sel
    }

    pub fn scope(&self) -> DayTypeScope {
        if self.chain_day_type {
            DayTypeScope::SeasonAndHour
        } else {
            DayTypeScope::FullDataset
        }
    }
}

fn parse_season(s: &str) -> Result<Season, String> {
    let code: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a season code"))?;
    Season::from_code(code).map_err(|e| e.to_string())
}

fn parse_day_type(s: &str) -> Result<DayType, String> {
    DayType::parse(s).ok_or_else(|| format!("'{s}' is not one of workday, weekend, holiday"))
}

fn parse_hour_range(s: &str) -> Result<HourRange, String> {
    let (lo, hi) = s
        .split_once('-')
        .ok_or_else(|| format!("'{s}' is not of the form LO-HI"))?;
    let lo: u8 = lo.trim().parse().map_err(|_| format!("bad hour '{lo}'"))?;
    let hi: u8 = hi.trim().parse().map_err(|_| format!("bad hour '{hi}'"))?;
    HourRange::new(lo, hi).map_err(|e| e.to_string())
}
