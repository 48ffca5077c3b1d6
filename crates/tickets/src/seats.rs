use crate::ticket::TicketRequest;

/// Number of seats to reserve for an order: every ticket except infants.
pub fn calculate_seats(requests: &[TicketRequest]) -> u64 {
    requests
        .iter()
        .filter(|r| r.ticket_type().occupies_seat())
        .map(|r| u64::from(r.count()))
        .sum()
}
