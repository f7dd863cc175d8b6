//! Bike rental analytics: load the hourly rental dataset, filter it by
//! season, hour and day type, and compute grouped means, descriptive
//! statistics and one-way ANOVA tests for the dashboard to display.

pub mod analysis;
pub mod cli;
pub mod data;

pub use analysis::report::{DashboardReport, TabReport};
pub use data::filter::{DayTypeScope, HourRange, Selection};
pub use data::model::{DayType, GroupBy, Measure, RentalDataset, RentalRecord, Season};
