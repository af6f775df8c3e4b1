use caseorder_core::{KeyValueStore, Planner, Selection, Toggle};
use clap::{Args, Subcommand};
use serde::Serialize;

use super::{display_date, parse_date, warn_on_rejection, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct OrderCommand {
    #[command(subcommand)]
    pub command: OrderSubcommand,
}

#[derive(Subcommand)]
pub enum OrderSubcommand {
    /// Order a dish for a day, or cancel it if already ordered
    Toggle {
        /// Dish name
        name: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Show the dishes ordered for a day
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List every day that has an order
    Dates {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Serialize)]
struct DateSummary {
    date: String,
    dishes: usize,
}

impl OrderCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        planner: &mut Planner<S>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            OrderSubcommand::Toggle { name, date } => {
                planner.select_date(parse_date(date.as_deref())?)?;
                let date = planner.active_date();

                match warn_on_rejection(planner.toggle(name))? {
                    Some(Toggle::Selected) => {
                        println!("Ordered '{}' for {}", name, display_date(date, config));
                    }
                    Some(Toggle::Deselected) => {
                        println!("Cancelled '{}' for {}", name, display_date(date, config));
                    }
                    None => {}
                }
                Ok(())
            }

            OrderSubcommand::Show { date, format } => {
                planner.select_date(parse_date(date.as_deref())?)?;
                let selection = planner.selection();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(selection)?);
                    }
                    OutputFormat::Text => {
                        let title = format!(
                            "Order for {} ({})",
                            display_date(selection.date(), config),
                            selection.date()
                        );
                        println!("{}", title);
                        println!("{}", "=".repeat(title.chars().count()));
                        if selection.is_empty() {
                            println!("No dishes ordered");
                        } else {
                            for dish in selection.dishes() {
                                println!("  - {}", dish);
                            }
                        }
                    }
                }
                Ok(())
            }

            OrderSubcommand::Dates { format } => {
                let index = planner.dates()?;
                let mut summaries = Vec::with_capacity(index.len());
                for date in index.dates() {
                    let selection = Selection::load(planner.store(), *date)?;
                    summaries.push(DateSummary {
                        date: date.to_string(),
                        dishes: selection.len(),
                    });
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&summaries)?);
                    }
                    OutputFormat::Text => {
                        if summaries.is_empty() {
                            println!("No orders found");
                            return Ok(());
                        }
                        for summary in &summaries {
                            let dishes_str = match summary.dishes {
                                0 => "no dishes".to_string(),
                                1 => "1 dish".to_string(),
                                n => format!("{} dishes", n),
                            };
                            println!("{}  ({})", summary.date, dishes_str);
                        }
                        println!("\nTotal: {} day(s)", summaries.len());
                    }
                }
                Ok(())
            }
        }
    }
}
