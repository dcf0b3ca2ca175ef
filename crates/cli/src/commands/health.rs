//! Liveness check command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{color_status, print_error, print_record, OutputFormat};

#[derive(Tabled, Serialize)]
struct HealthRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
}

/// Show server liveness
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health = match client.health().await {
        Ok(h) => h,
        Err(e) => {
            print_error("Server is not reachable");
            return Err(e);
        }
    };

    let status = match format {
        OutputFormat::Table => color_status(&health.status),
        OutputFormat::Json => health.status,
    };
    let row = HealthRow {
        status,
        timestamp: health.timestamp,
    };
    print_record(row, format);

    Ok(())
}
