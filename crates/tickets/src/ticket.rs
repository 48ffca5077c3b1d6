use core::str::FromStr;
use serde::{Deserialize, Serialize};

use cinema_core::{InvalidPurchase, Reason, ValueObject};

/// Ticket category. Closed set.
///
/// Written upper-case; read case-insensitively through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum TicketType {
    Adult,
    Child,
    Infant,
}

impl TicketType {
    pub const ALL: [TicketType; 3] = [TicketType::Adult, TicketType::Child, TicketType::Infant];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketType::Adult => "ADULT",
            TicketType::Child => "CHILD",
            TicketType::Infant => "INFANT",
        }
    }

    /// Infants sit on an adult's lap and take no seat.
    pub fn occupies_seat(self) -> bool {
        !matches!(self, TicketType::Infant)
    }
}

impl core::fmt::Display for TicketType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = InvalidPurchase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TicketType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InvalidPurchase::new(Reason::UnknownTicketType(trimmed.to_string())))
    }
}

impl TryFrom<String> for TicketType {
    type Error = InvalidPurchase;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One line item of an order: `count` tickets of `ticket_type`.
///
/// A count of zero is representable here; the rule validator rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketRequest {
    #[serde(rename = "type")]
    ticket_type: TicketType,
    count: u32,
}

impl TicketRequest {
    pub fn new(ticket_type: TicketType, count: u32) -> Self {
        Self { ticket_type, count }
    }

    pub fn adult(count: u32) -> Self {
        Self::new(TicketType::Adult, count)
    }

    pub fn child(count: u32) -> Self {
        Self::new(TicketType::Child, count)
    }

    pub fn infant(count: u32) -> Self {
        Self::new(TicketType::Infant, count)
    }

    pub fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl ValueObject for TicketRequest {}

impl core::fmt::Display for TicketRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}={}", self.ticket_type, self.count)
    }
}

/// Parses `TYPE=COUNT`, e.g. `adult=2`.
impl FromStr for TicketRequest {
    type Err = InvalidPurchase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidPurchase::new(Reason::MalformedTicketRequest(s.to_string()));

        let (ticket_type, count) = s.split_once('=').ok_or_else(malformed)?;
        let ticket_type = ticket_type.parse::<TicketType>()?;
        let count = count.trim().parse::<u32>().map_err(|_| malformed())?;
        Ok(Self::new(ticket_type, count))
    }
}

/// Per-type ticket totals of an order. Repeated requests of one type are summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCounts {
    pub adult: u64,
    pub child: u64,
    pub infant: u64,
}

impl TicketCounts {
    pub fn from_requests<'a>(requests: impl IntoIterator<Item = &'a TicketRequest>) -> Self {
        requests.into_iter().fold(Self::default(), |mut acc, r| {
            *acc.slot(r.ticket_type) += u64::from(r.count);
            acc
        })
    }

    pub fn of(&self, ticket_type: TicketType) -> u64 {
        match ticket_type {
            TicketType::Adult => self.adult,
            TicketType::Child => self.child,
            TicketType::Infant => self.infant,
        }
    }

    pub fn total(&self) -> u64 {
        self.adult + self.child + self.infant
    }

    fn slot(&mut self, ticket_type: TicketType) -> &mut u64 {
        match ticket_type {
            TicketType::Adult => &mut self.adult,
            TicketType::Child => &mut self.child,
            TicketType::Infant => &mut self.infant,
        }
    }
}

impl ValueObject for TicketCounts {}
