use caseorder_core::{DishQuery, KeyValueStore, Pager, Planner, SortOrder};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

use super::{display_date, parse_date, warn_on_rejection, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct DishCommand {
    #[command(subcommand)]
    pub command: DishSubcommand,
}

#[derive(Subcommand)]
pub enum DishSubcommand {
    /// Add a dish to the catalog
    Add {
        /// Name of the dish
        name: String,
    },

    /// List dishes, marking the ones ordered for a day
    List {
        /// Only show dishes containing this text
        #[arg(long, short)]
        search: Option<String>,

        /// Sort by name (asc, desc); defaults to the order dishes were added
        #[arg(long)]
        sort: Option<String>,

        /// Load this many more pages after the first
        #[arg(long, default_value_t = 0)]
        more: usize,

        /// Show every matching dish
        #[arg(long, conflicts_with = "more")]
        all: bool,

        /// Date whose order is marked (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete dishes from the catalog and from every day's order
    Delete {
        /// Dish names
        #[arg(required = true)]
        names: Vec<String>,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Debug, Serialize, PartialEq)]
struct ListedDish<'a> {
    name: &'a str,
    ordered: bool,
}

/// One rendered page of the dish list.
#[derive(Debug)]
struct DishPage<'a> {
    shown: Vec<ListedDish<'a>>,
    matching: usize,
}

impl DishCommand {
    pub async fn run<S: KeyValueStore>(
        &self,
        planner: &mut Planner<S>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DishSubcommand::Add { name } => {
                if warn_on_rejection(planner.add_dish(name))?.is_some() {
                    println!("Added dish: {}", name);
                }
                Ok(())
            }

            DishSubcommand::List {
                search,
                sort,
                more,
                all,
                date,
                format,
            } => {
                planner.select_date(parse_date(date.as_deref())?)?;

                let mut query = DishQuery::new(search.clone().unwrap_or_default());
                if let Some(sort) = sort {
                    let order: SortOrder = sort.parse().map_err(|e: String| e)?;
                    query = query.with_order(order);
                }

                let pages = if *all { None } else { Some(*more) };
                let delay = Duration::from_millis(config.load_more_delay_ms.value);
                let page = list_page(planner, &query, config, pages, delay).await;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&page.shown)?);
                    }
                    OutputFormat::Text => {
                        if page.matching == 0 {
                            println!("No dishes found");
                            return Ok(());
                        }

                        let date = planner.active_date();
                        println!("Dishes for {} ({})", display_date(date, config), date);
                        println!("{}", "-".repeat(40));
                        for dish in &page.shown {
                            let mark = if dish.ordered { "x" } else { " " };
                            println!("[{}] {}", mark, dish.name);
                        }
                        if page.shown.len() < page.matching {
                            println!(
                                "\nShowing {} of {} dish(es). Use --more {} to load more.",
                                page.shown.len(),
                                page.matching,
                                pages.unwrap_or(0) + 1
                            );
                        } else {
                            println!("\nTotal: {} dish(es)", page.matching);
                        }
                    }
                }
                Ok(())
            }

            DishSubcommand::Delete { names, force } => {
                let (known, unknown): (Vec<&String>, Vec<&String>) = names
                    .iter()
                    .partition(|name| planner.catalog().contains(name));

                if known.is_empty() {
                    return Err(format!("Dish not found: {}", names.join(", ")).into());
                }
                for name in &unknown {
                    eprintln!("Warning: Dish not found: {}", name);
                }

                // Confirm deletion unless --force is used
                if !force {
                    let listed: Vec<&str> = known.iter().map(|n| n.as_str()).collect();
                    print!(
                        "Delete {} dish(es) ({}) from the catalog and every order? [y/N] ",
                        listed.len(),
                        listed.join(", ")
                    );
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                let removed = planner.remove_dishes(names.iter().cloned())?;
                for name in &removed {
                    println!("Deleted dish: {}", name);
                }
                Ok(())
            }
        }
    }
}

/// Filters and sorts the catalog, then reveals `pages` extra pages.
///
/// Each extra page waits `delay` before it is revealed. `None` shows
/// everything at once.
async fn list_page<'a, S: KeyValueStore>(
    planner: &'a Planner<S>,
    query: &DishQuery,
    config: &Config,
    pages: Option<usize>,
    delay: Duration,
) -> DishPage<'a> {
    let matching = query.apply(planner.catalog().dishes());

    let mut pager = match pages {
        Some(_) => Pager::new(config.page_size.value, config.page_increment.value),
        None => Pager::new(matching.len(), 1),
    };
    for _ in 0..pages.unwrap_or(0) {
        if !pager.request_more(matching.len()) {
            break;
        }
        tokio::time::sleep(delay).await;
        pager.finish_loading();
    }

    let selection = planner.selection();
    let shown = pager
        .page(&matching)
        .iter()
        .map(|&name| ListedDish {
            name,
            ordered: selection.contains(name),
        })
        .collect();

    DishPage {
        shown,
        matching: matching.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseorder_core::{DateKey, MemoryStore};
    use tempfile::TempDir;

    fn setup(dishes: &[&str]) -> (Planner<MemoryStore>, Config, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "page_size: 2\npage_increment: 2\n").unwrap();
        let config = Config::load(Some(config_path)).unwrap();

        let date: DateKey = "2024-10-07".parse().unwrap();
        let mut planner = Planner::open(MemoryStore::new(), date).unwrap();
        for dish in dishes {
            planner.add_dish(dish).unwrap();
        }
        (planner, config, temp_dir)
    }

    fn add(name: &str) -> DishCommand {
        DishCommand {
            command: DishSubcommand::Add {
                name: name.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_add_keeps_name_as_given() {
        let (mut planner, config, _temp) = setup(&["宫保鸡丁"]);

        add(" 宫保鸡丁 ").run(&mut planner, &config).await.unwrap();
        add("   ").run(&mut planner, &config).await.unwrap();

        assert_eq!(
            planner.catalog().dishes(),
            &["宫保鸡丁".to_string(), " 宫保鸡丁 ".to_string()]
        );
    }

    fn names<'a>(page: &DishPage<'a>) -> Vec<&'a str> {
        page.shown.iter().map(|d| d.name).collect()
    }

    #[tokio::test]
    async fn test_first_page_only() {
        let (planner, config, _temp) = setup(&["a", "b", "c", "d", "e"]);

        let page = list_page(&planner, &DishQuery::default(), &config, Some(0), Duration::ZERO).await;

        assert_eq!(names(&page), vec!["a", "b"]);
        assert_eq!(page.matching, 5);
    }

    #[tokio::test]
    async fn test_load_more_reveals_increments() {
        let (planner, config, _temp) = setup(&["a", "b", "c", "d", "e"]);
        let query = DishQuery::default();

        let page = list_page(&planner, &query, &config, Some(1), Duration::ZERO).await;
        assert_eq!(page.shown.len(), 4);

        let page = list_page(&planner, &query, &config, Some(10), Duration::ZERO).await;
        assert_eq!(page.shown.len(), 5);
    }

    #[tokio::test]
    async fn test_all_ignores_page_size() {
        let (planner, config, _temp) = setup(&["a", "b", "c", "d", "e"]);

        let page = list_page(&planner, &DishQuery::default(), &config, None, Duration::ZERO).await;

        assert_eq!(page.shown.len(), 5);
    }

    #[tokio::test]
    async fn test_marks_ordered_dishes_after_search_and_sort() {
        let (mut planner, config, _temp) = setup(&["宫保鸡丁", "口水鸡", "麻婆豆腐"]);
        planner.toggle("口水鸡").unwrap();
        let query = DishQuery::new("鸡").with_order(SortOrder::Descending);

        let page = list_page(&planner, &query, &config, None, Duration::ZERO).await;

        let mut expected = vec!["宫保鸡丁", "口水鸡"];
        expected.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(names(&page), expected);
        assert_eq!(
            page.shown
                .iter()
                .find(|d| d.name == "口水鸡")
                .map(|d| d.ordered),
            Some(true)
        );
        assert_eq!(
            page.shown
                .iter()
                .find(|d| d.name == "宫保鸡丁")
                .map(|d| d.ordered),
            Some(false)
        );
    }
}
