//! Status command: render the daemon's current snapshot

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, SnapshotView};
use crate::output::{
    color_classification, format_metric_value, format_timestamp, print_warning, OutputFormat,
};

/// Row for the per-metric table
#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Samples")]
    samples: usize,
}

pub async fn run(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let snapshot: SnapshotView = client.get("snapshot").await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&snapshot)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{}", "Monitor Snapshot".bold());
            println!("{}", "=".repeat(60));
            println!(
                "Classification: {}",
                color_classification(&snapshot.classification)
            );
            println!("Generated:      {}", format_timestamp(snapshot.generated_at));
            println!();

            if snapshot.aggregates.is_empty() {
                print_warning("No samples recorded yet");
                return Ok(());
            }

            let mut names: Vec<&String> = snapshot.aggregates.keys().collect();
            names.sort();

            let rows: Vec<MetricRow> = names
                .into_iter()
                .map(|name| {
                    let aggregate = &snapshot.aggregates[name];
                    let current = snapshot
                        .current
                        .get(name)
                        .map(|s| format_metric_value(name, s.value))
                        .unwrap_or_else(|| "-".to_string());
                    MetricRow {
                        metric: name.clone(),
                        current,
                        mean: format_metric_value(name, aggregate.mean),
                        min: format_metric_value(name, aggregate.min),
                        max: format_metric_value(name, aggregate.max),
                        samples: aggregate.count,
                    }
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if !snapshot.recommendations.is_empty() {
                println!();
                println!("{}", "Recommendations".bold());
                for action in &snapshot.recommendations {
                    println!(
                        "  [{}] {}: {}",
                        action.priority.to_uppercase(),
                        action.category.cyan(),
                        action.description
                    );
                }
            }
        }
    }

    Ok(())
}
