//! Command-line front end for the ticket service.
//!
//! ```text
//! cinema-tickets [--quote] <ACCOUNT_ID> <TYPE=COUNT>...
//! cinema-tickets [--quote] --json < request.json
//! ```

use std::io::Read;

use clap::Parser;
use thiserror::Error;

use cinema_core::InvalidPurchase;
use cinema_tickets::{PurchaseRequest, TicketRequest, TicketService};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Purchase(#[from] InvalidPurchase),

    #[error("invalid JSON request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "cinema-tickets",
    version,
    about = "Buy cinema tickets",
    long_about = None,
    after_help = "TYPE is one of ADULT, CHILD, INFANT (any case)."
)]
pub struct Cli {
    /// Validate and price the order without reserving seats or taking payment
    #[arg(long)]
    pub quote: bool,

    /// Read a JSON purchase request from stdin
    #[arg(long, conflicts_with_all = ["account_id", "tickets"])]
    pub json: bool,

    /// Account paying for the tickets
    #[arg(
        value_name = "ACCOUNT_ID",
        required_unless_present = "json",
        allow_negative_numbers = true
    )]
    pub account_id: Option<String>,

    /// Ticket requests, e.g. ADULT=2 CHILD=1
    #[arg(value_name = "TYPE=COUNT")]
    pub tickets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Purchase,
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Args(PurchaseRequest),
    Stdin,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.quote { Mode::Quote } else { Mode::Purchase }
    }

    /// Where the purchase request comes from.
    ///
    /// A non-numeric account id is passed on as absent so the purchase rules
    /// report it like any other invalid account.
    pub fn source(&self) -> Result<Source, CliError> {
        if self.json {
            return Ok(Source::Stdin);
        }

        let tickets = self
            .tickets
            .iter()
            .map(|raw| raw.parse::<TicketRequest>().map(|r| Some(r.into())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Source::Args(PurchaseRequest {
            account_id: self
                .account_id
                .as_deref()
                .and_then(|raw| raw.trim().parse::<i64>().ok()),
            tickets,
        }))
    }
}

/// Execute a request and return the JSON document to print.
pub fn run<R: Read>(
    mode: Mode,
    source: Source,
    service: &TicketService,
    mut stdin: R,
) -> Result<serde_json::Value, CliError> {
    let request = match source {
        Source::Args(request) => request,
        Source::Stdin => {
            let mut raw = String::new();
            stdin.read_to_string(&mut raw)?;
            serde_json::from_str::<PurchaseRequest>(&raw)?
        }
    };

    let output = match mode {
        Mode::Purchase => serde_json::to_value(service.purchase(&request)?)?,
        Mode::Quote => serde_json::to_value(service.quote(&request)?)?,
    };
    Ok(output)
}
