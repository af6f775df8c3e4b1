use caseorder_core::{KeyValueStore, Planner};
use clap::Args;
use std::io;
use std::path::PathBuf;

use super::{display_date, parse_date, warn_on_rejection};
use crate::config::Config;

#[derive(Args)]
pub struct ShareCommand {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    date: Option<String>,

    /// Write the shared text to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl ShareCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        planner: &mut Planner<S>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        planner.select_date(parse_date(self.date.as_deref())?)?;

        if planner.selection().is_empty() {
            return Err(format!(
                "No dishes ordered for {}",
                display_date(planner.active_date(), config)
            )
            .into());
        }

        let text = planner.share().encode();
        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{}\n", text))
                    .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
                eprintln!("Wrote order for {} to {}", planner.active_date(), path.display());
            }
            None => println!("{}", text),
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct ReceiveCommand {
    /// File holding shared text; reads stdin when omitted
    file: Option<PathBuf>,
}

impl ReceiveCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        planner: &mut Planner<S>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let text = match &self.file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                tracing::debug!("Failed to read shared content from {}: {}", path.display(), e);
                format!("Failed to read '{}': {}", path.display(), e)
            })?,
            None => io::read_to_string(io::stdin())
                .map_err(|e| format!("Failed to read stdin: {}", e))?,
        };

        if let Some(summary) = warn_on_rejection(planner.receive(&text))? {
            println!(
                "Received order for {} ({})",
                display_date(summary.date, config),
                summary.date
            );
            println!("  newly ordered: {}", summary.newly_selected.len());
            if !summary.new_dishes.is_empty() {
                println!("  added to catalog: {}", summary.new_dishes.join(", "));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseorder_core::{DateKey, MemoryStore};
    use tempfile::TempDir;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn setup(date: &str) -> (Planner<MemoryStore>, Config, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(Some(temp_dir.path().join("config.yaml"))).unwrap();
        let planner = Planner::open(MemoryStore::new(), key(date)).unwrap();
        (planner, config, temp_dir)
    }

    #[test]
    fn test_receive_missing_file_changes_nothing() {
        let (mut planner, config, temp_dir) = setup("2024-10-07");
        planner.add_dish("米饭").unwrap();
        let writes = planner.store().writes();

        let cmd = ReceiveCommand {
            file: Some(temp_dir.path().join("missing.txt")),
        };
        let err = cmd.run(&mut planner, &config).unwrap_err();

        assert!(err.to_string().starts_with("Failed to read"));
        assert_eq!(planner.store().writes(), writes);
        assert_eq!(planner.catalog().len(), 1);
    }

    #[test]
    fn test_receive_file_imports_order() {
        let (mut planner, config, temp_dir) = setup("2024-10-07");
        let path = temp_dir.path().join("order.txt");
        std::fs::write(&path, "在 Oct 8, 2024 的点菜：\n水煮鱼\n米饭\n").unwrap();

        ReceiveCommand { file: Some(path) }
            .run(&mut planner, &config)
            .unwrap();

        assert!(planner.catalog().contains("水煮鱼"));
        assert!(planner.catalog().contains("米饭"));
        planner.select_date(key("2024-10-08")).unwrap();
        assert_eq!(
            planner.selection().dishes(),
            &["水煮鱼".to_string(), "米饭".to_string()]
        );
    }

    #[test]
    fn test_receive_malformed_file_is_a_warning() {
        let (mut planner, config, temp_dir) = setup("2024-10-07");
        let path = temp_dir.path().join("note.txt");
        std::fs::write(&path, "just a note").unwrap();

        ReceiveCommand { file: Some(path) }
            .run(&mut planner, &config)
            .unwrap();

        assert_eq!(planner.store().writes(), 0);
    }

    #[test]
    fn test_share_output_round_trips_through_receive() {
        let (mut sender, config, temp_dir) = setup("2024-10-07");
        sender.add_dish("宫保鸡丁").unwrap();
        sender.add_dish("麻婆豆腐").unwrap();
        sender.toggle("麻婆豆腐").unwrap();
        sender.toggle("宫保鸡丁").unwrap();
        let path = temp_dir.path().join("shared.txt");

        ShareCommand {
            date: Some("2024-10-07".to_string()),
            output: Some(path.clone()),
        }
        .run(&mut sender, &config)
        .unwrap();

        let (mut receiver, _, _receiver_temp) = setup("2024-10-07");
        ReceiveCommand { file: Some(path) }
            .run(&mut receiver, &config)
            .unwrap();

        assert_eq!(receiver.selection(), sender.selection());
        assert_eq!(
            receiver.catalog().dishes(),
            &["麻婆豆腐".to_string(), "宫保鸡丁".to_string()]
        );
    }

    #[test]
    fn test_share_empty_day_is_refused() {
        let (mut planner, config, temp_dir) = setup("2024-10-07");
        let path = temp_dir.path().join("shared.txt");

        let cmd = ShareCommand {
            date: None,
            output: Some(path.clone()),
        };
        assert!(cmd.run(&mut planner, &config).is_err());
        assert!(!path.exists());
    }
}
