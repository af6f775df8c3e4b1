mod config_cmd;
mod dish;
mod order;
mod share;

pub use config_cmd::ConfigCommand;
pub use dish::DishCommand;
pub use order::OrderCommand;
pub use share::{ReceiveCommand, ShareCommand};

use caseorder_core::{DateKey, PlannerError};
use clap::ValueEnum;

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parses an optional `YYYY-MM-DD` argument, defaulting to today.
fn parse_date(date: Option<&str>) -> Result<DateKey, Box<dyn std::error::Error>> {
    match date {
        Some(d) => Ok(d.parse()?),
        None => Ok(DateKey::today()),
    }
}

/// Formats a date for the screen using the configured display format.
fn display_date(date: DateKey, config: &Config) -> String {
    date.date()
        .format(&config.display_date_format.value)
        .to_string()
}

/// Prints rejected input as a warning; store failures still propagate.
fn warn_on_rejection<T>(result: Result<T, PlannerError>) -> Result<Option<T>, PlannerError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_warning() => {
            eprintln!("Warning: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
