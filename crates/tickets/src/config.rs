//! Configuration management for the ticket service.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{DEFAULT_ADULT_PRICE, DEFAULT_CHILD_PRICE, PriceTable};
use crate::rules::{DEFAULT_MAX_TICKETS, PurchaseRules};
use crate::ticket::TicketType;

pub const ENV_ADULT_PRICE: &str = "ADULT_TICKET_PRICE";
pub const ENV_CHILD_PRICE: &str = "CHILD_TICKET_PRICE";
pub const ENV_MAX_TICKETS: &str = "MAX_TICKETS_PER_PURCHASE";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_APP_ENV: &str = "APP_ENV";
pub const ENV_SERVICE_NAME: &str = "SERVICE_NAME";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("MAX_TICKETS_PER_PURCHASE must be at least 1")]
    ZeroMaxTickets,

    #[error("unknown APP_ENV '{0}': expected development or production")]
    UnknownEnvironment(String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Ticket service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketConfig {
    /// Unit price per ticket type. Infant tickets are always free.
    pub prices: PriceTable,
    /// Upper bound on tickets in one purchase (default: 25)
    pub max_tickets_per_purchase: u32,
    /// Default log level when `RUST_LOG` is not set (default: info)
    pub log_level: String,
    pub environment: Environment,
    pub service_name: String,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            prices: PriceTable::default(),
            max_tickets_per_purchase: DEFAULT_MAX_TICKETS,
            log_level: "info".to_string(),
            environment: Environment::default(),
            service_name: "ticket-service".to_string(),
        }
    }
}

impl TicketConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let adult_price =
            parse_number(ENV_ADULT_PRICE, get(ENV_ADULT_PRICE))?.unwrap_or(DEFAULT_ADULT_PRICE);
        let child_price =
            parse_number(ENV_CHILD_PRICE, get(ENV_CHILD_PRICE))?.unwrap_or(DEFAULT_CHILD_PRICE);

        let max_tickets_per_purchase = parse_number(ENV_MAX_TICKETS, get(ENV_MAX_TICKETS))?
            .unwrap_or(defaults.max_tickets_per_purchase);
        if max_tickets_per_purchase == 0 {
            return Err(ConfigError::ZeroMaxTickets);
        }

        let environment = match get(ENV_APP_ENV) {
            None => defaults.environment,
            Some(raw) => {
                let normalized = raw.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    "development" | "dev" => Environment::Development,
                    "production" | "prod" => Environment::Production,
                    _ => return Err(ConfigError::UnknownEnvironment(raw)),
                }
            }
        };

        Ok(Self {
            prices: PriceTable::empty()
                .with_price(TicketType::Adult, adult_price)
                .with_price(TicketType::Child, child_price)
                .with_price(TicketType::Infant, 0),
            max_tickets_per_purchase,
            log_level: get(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            environment,
            service_name: get(ENV_SERVICE_NAME).unwrap_or(defaults.service_name),
        })
    }

    pub fn rules(&self) -> PurchaseRules {
        PurchaseRules {
            max_tickets: self.max_tickets_per_purchase,
        }
    }
}

fn parse_number<T: core::str::FromStr>(
    key: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let parsed = raw.trim().parse::<T>();
    match parsed {
        Ok(number) => Ok(Some(number)),
        Err(_) => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}
