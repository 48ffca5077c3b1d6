use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use cinema_cli::Cli;
use cinema_observability::{LogFormat, LogSettings};
use cinema_tickets::{LoggingPaymentGateway, LoggingSeatReservation, TicketConfig, TicketService};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = TicketConfig::from_env().context("invalid ticket configuration")?;

    cinema_observability::init(&LogSettings {
        default_filter: config.log_level.clone(),
        format: if config.environment.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Compact
        },
    });

    let mode = cli.mode();
    tracing::info!(
        service = %config.service_name,
        environment = ?config.environment,
        max_tickets = config.max_tickets_per_purchase,
        ?mode,
        "ticket service ready"
    );

    let service = TicketService::from_config(
        &config,
        Arc::new(LoggingSeatReservation),
        Arc::new(LoggingPaymentGateway),
    );

    let result = cli
        .source()
        .and_then(|source| cinema_cli::run(mode, source, &service, std::io::stdin().lock()));

    match result {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "request rejected");
            Err(err.into())
        }
    }
}
