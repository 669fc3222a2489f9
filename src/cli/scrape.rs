use super::ui;
use crate::core::config::AppConfig;
use crate::scrape::{self, SnapshotFile, TARGETS};

/// One-line summary printed after a scrape.
pub fn summary(snapshot: &SnapshotFile, snapshot_path: &str) -> String {
    let line = format!(
        "Scraped {}/{} futures ({}) -> {}",
        snapshot.items.len(),
        TARGETS.len(),
        snapshot.updated_at,
        snapshot_path
    );
    if snapshot.items.is_empty() {
        ui::style_text(&line, ui::StyleType::Error)
    } else {
        ui::style_text(&line, ui::StyleType::Subtle)
    }
}

/// Runs the scraper with a progress bar. Always succeeds; failures are logged
/// and leave an empty or partial snapshot behind.
pub async fn run(config: &AppConfig) {
    let pb = ui::new_progress_bar(TARGETS.len() as u64);
    pb.set_message("Scraping futures");

    let snapshot = scrape::run_and_write(config, |target, ok| {
        if !ok {
            pb.println(ui::style_text(
                &format!("No quote for {}", target.name),
                ui::StyleType::Error,
            ));
        }
        pb.inc(1);
    })
    .await;

    pb.finish_and_clear();
    println!("{}", summary(&snapshot, &config.snapshot_path));
}
