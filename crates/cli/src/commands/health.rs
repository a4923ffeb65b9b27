//! Health command: render daemon component health

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, HealthView};
use crate::output::{color_status, format_timestamp, OutputFormat};

/// Row for the component health table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Last Check")]
    last_check: String,
}

pub async fn run(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: HealthView = client.get_with_status("healthz").await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&health)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{}", "Daemon Health".bold());
            println!("{}", "=".repeat(60));
            println!("Overall: {}", color_status(&health.status));
            println!();

            let mut names: Vec<&String> = health.components.keys().collect();
            names.sort();

            let rows: Vec<ComponentRow> = names
                .into_iter()
                .map(|name| {
                    let component = &health.components[name];
                    ComponentRow {
                        component: name.clone(),
                        status: color_status(&component.status),
                        message: component.message.clone().unwrap_or_default(),
                        last_check: format_timestamp(component.last_check_timestamp),
                    }
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
