//! Pressure command: inject a critical memory pressure signal

use anyhow::Result;

use crate::client::{ApiClient, PressureAck};
use crate::output::print_success;

pub async fn run(client: &ApiClient) -> Result<()> {
    let ack: PressureAck = client.post("pressure").await?;

    if ack.status == "accepted" {
        print_success("Critical memory pressure signal delivered");
    } else {
        print_success(&format!("Daemon responded: {}", ack.status));
    }

    Ok(())
}
