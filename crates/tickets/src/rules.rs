//! Purchase eligibility rules.
//!
//! The validator turns a raw [`PurchaseRequest`] into a validated [`Order`], or
//! rejects it with the first rule it breaks. Rules are checked in a fixed order
//! so the same bad input always yields the same error:
//!
//! 1. account id present and positive
//! 2. at least one ticket request, none of them missing, each naming a known
//!    type and an integer count
//! 3. no request for zero tickets
//! 4. total tickets within the per-purchase maximum
//! 5. child or infant tickets need at least one adult
//! 6. no more infants than adults

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use cinema_core::{AccountId, InvalidPurchase, PurchaseResult, Reason};

use crate::ticket::{TicketCounts, TicketRequest, TicketType};

pub const DEFAULT_MAX_TICKETS: u32 = 25;

/// Raw purchase input, as received from a caller.
///
/// Absent values are representable so that JSON input such as
/// `{"tickets": [null]}` reaches the validator instead of failing to decode.
/// An account id that is not an integer (`1.5`, `"1"`) decodes as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub tickets: Vec<Option<TicketLine>>,
}

impl PurchaseRequest {
    pub fn new(account_id: i64, tickets: &[TicketRequest]) -> Self {
        Self {
            account_id: Some(account_id),
            tickets: tickets.iter().map(|r| Some(TicketLine::from(*r))).collect(),
        }
    }
}

/// One ticket line as received. Type and count stay unchecked until
/// validation, so bad values are reported as purchase errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLine {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub ticket_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub count: Option<u32>,
}

impl TicketLine {
    /// Resolve the line into a typed request.
    pub fn parse(&self) -> PurchaseResult<TicketRequest> {
        let ticket_type = self
            .ticket_type
            .as_deref()
            .unwrap_or_default()
            .parse::<TicketType>()?;
        let count = self.count.ok_or_else(|| {
            InvalidPurchase::new(Reason::InvalidTicketCount {
                ticket_type: ticket_type.as_str().to_string(),
            })
        })?;
        Ok(TicketRequest::new(ticket_type, count))
    }
}

impl From<TicketRequest> for TicketLine {
    fn from(request: TicketRequest) -> Self {
        Self {
            ticket_type: Some(request.ticket_type().as_str().to_string()),
            count: Some(request.count()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    #[allow(dead_code)]
    Invalid(IgnoredAny),
}

/// Decode a `T`, turning any value of the wrong shape into `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Valid(value) => Some(value),
        Lenient::Invalid(_) => None,
    })
}

/// Limits applied by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRules {
    pub max_tickets: u32,
}

impl Default for PurchaseRules {
    fn default() -> Self {
        Self {
            max_tickets: DEFAULT_MAX_TICKETS,
        }
    }
}

/// An order that passed every rule. Only [`RuleValidator::validate`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    account_id: AccountId,
    requests: Vec<TicketRequest>,
    counts: TicketCounts,
}

impl Order {
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn requests(&self) -> &[TicketRequest] {
        &self.requests
    }

    pub fn counts(&self) -> TicketCounts {
        self.counts
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleValidator {
    rules: PurchaseRules,
}

impl RuleValidator {
    pub fn new(rules: PurchaseRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> PurchaseRules {
        self.rules
    }

    /// Check every rule, failing fast on the first violation.
    pub fn validate(&self, request: &PurchaseRequest) -> PurchaseResult<Order> {
        let account_id = request
            .account_id
            .ok_or_else(InvalidPurchase::invalid_account)
            .and_then(AccountId::try_from)?;

        let requests = Self::require_requests(&request.tickets)?;

        if let Some(zero) = requests.iter().find(|r| r.count() == 0) {
            return Err(InvalidPurchase::zero_tickets(zero.ticket_type().as_str()));
        }

        let counts = TicketCounts::from_requests(&requests);
        self.check_counts(&counts)?;

        tracing::debug!(
            account_id = %account_id,
            adult = counts.adult,
            child = counts.child,
            infant = counts.infant,
            "order passed purchase rules"
        );

        Ok(Order {
            account_id,
            requests,
            counts,
        })
    }

    fn require_requests(tickets: &[Option<TicketLine>]) -> PurchaseResult<Vec<TicketRequest>> {
        if tickets.is_empty() || tickets.iter().any(Option::is_none) {
            return Err(InvalidPurchase::no_ticket_requests());
        }
        tickets.iter().flatten().map(TicketLine::parse).collect()
    }

    fn check_counts(&self, counts: &TicketCounts) -> PurchaseResult<()> {
        let requested = counts.total();
        if requested > u64::from(self.rules.max_tickets) {
            return Err(Reason::ExceedsMaximum {
                requested,
                max: self.rules.max_tickets,
            }
            .into());
        }

        if counts.child + counts.infant > 0 && counts.adult == 0 {
            return Err(Reason::AdultRequired.into());
        }

        // One adult lap per infant.
        if counts.infant > counts.adult {
            return Err(Reason::InfantsExceedAdults {
                infants: counts.infant,
                adults: counts.adult,
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn validate(account_id: i64, tickets: &[TicketRequest]) -> PurchaseResult<Order> {
        RuleValidator::default().validate(&PurchaseRequest::new(account_id, tickets))
    }

    fn reason_of(result: PurchaseResult<Order>) -> Reason {
        result.unwrap_err().reason().clone()
    }

    #[test]
    fn valid_family_order_passes() {
        let order = validate(
            1,
            &[
                TicketRequest::adult(2),
                TicketRequest::child(3),
                TicketRequest::infant(1),
            ],
        )
        .unwrap();

        assert_eq!(order.account_id().get(), 1);
        assert_eq!(order.requests().len(), 3);
        assert_eq!(
            order.counts(),
            TicketCounts {
                adult: 2,
                child: 3,
                infant: 1
            }
        );
    }

    #[test]
    fn missing_account_is_rejected() {
        let request = PurchaseRequest {
            account_id: None,
            tickets: vec![Some(TicketRequest::adult(1).into())],
        };
        let result = RuleValidator::default().validate(&request);
        assert_eq!(reason_of(result), Reason::InvalidAccount);
    }

    #[test]
    fn non_positive_account_is_rejected() {
        assert_eq!(reason_of(validate(0, &[TicketRequest::adult(1)])), Reason::InvalidAccount);
        assert_eq!(reason_of(validate(-5, &[TicketRequest::adult(1)])), Reason::InvalidAccount);
    }

    #[test]
    fn account_is_checked_before_tickets() {
        assert_eq!(reason_of(validate(0, &[])), Reason::InvalidAccount);
    }

    #[test]
    fn empty_order_is_rejected() {
        assert_eq!(reason_of(validate(1, &[])), Reason::NoTicketRequests);
    }

    #[test]
    fn missing_entry_is_rejected() {
        let request = PurchaseRequest {
            account_id: Some(1),
            tickets: vec![Some(TicketRequest::adult(1).into()), None],
        };
        let result = RuleValidator::default().validate(&request);
        assert_eq!(reason_of(result), Reason::NoTicketRequests);
    }

    #[test]
    fn zero_ticket_request_is_rejected_even_when_others_are_valid() {
        let result = validate(1, &[TicketRequest::adult(2), TicketRequest::child(0)]);
        assert_eq!(
            reason_of(result),
            Reason::ZeroTickets {
                ticket_type: "CHILD".to_string()
            }
        );
    }

    #[test]
    fn exactly_the_maximum_is_allowed() {
        assert!(validate(1, &[TicketRequest::adult(25)]).is_ok());
        assert!(validate(1, &[TicketRequest::adult(20), TicketRequest::child(5)]).is_ok());
    }

    #[test]
    fn above_the_maximum_is_rejected() {
        let result = validate(1, &[TicketRequest::adult(26)]);
        assert_eq!(
            reason_of(result),
            Reason::ExceedsMaximum {
                requested: 26,
                max: 25
            }
        );
    }

    #[test]
    fn infants_count_towards_the_maximum() {
        let result = validate(1, &[TicketRequest::adult(13), TicketRequest::infant(13)]);
        assert!(matches!(reason_of(result), Reason::ExceedsMaximum { requested: 26, .. }));
    }

    #[test]
    fn custom_maximum_is_honoured() {
        let validator = RuleValidator::new(PurchaseRules { max_tickets: 4 });
        let request = PurchaseRequest::new(1, &[TicketRequest::adult(5)]);
        let err = validator.validate(&request).unwrap_err();
        assert_eq!(
            err.reason(),
            &Reason::ExceedsMaximum {
                requested: 5,
                max: 4
            }
        );
    }

    #[test]
    fn child_without_adult_is_rejected() {
        assert_eq!(reason_of(validate(1, &[TicketRequest::child(1)])), Reason::AdultRequired);
    }

    #[test]
    fn infant_without_adult_is_rejected_as_adult_required() {
        assert_eq!(reason_of(validate(1, &[TicketRequest::infant(1)])), Reason::AdultRequired);
    }

    #[test]
    fn more_infants_than_adults_is_rejected() {
        let result = validate(1, &[TicketRequest::adult(1), TicketRequest::infant(2)]);
        assert_eq!(
            reason_of(result),
            Reason::InfantsExceedAdults {
                infants: 2,
                adults: 1
            }
        );
    }

    #[test]
    fn as_many_infants_as_adults_is_allowed() {
        assert!(validate(1, &[TicketRequest::adult(2), TicketRequest::infant(2)]).is_ok());
    }

    #[test]
    fn repeated_types_are_aggregated_before_rules_apply() {
        // Two separate adult lines cover two infants.
        let order = validate(
            1,
            &[
                TicketRequest::adult(1),
                TicketRequest::infant(2),
                TicketRequest::adult(1),
            ],
        )
        .unwrap();
        assert_eq!(order.counts().adult, 2);

        // Split lines still count towards the maximum.
        let result = validate(1, &[TicketRequest::adult(13), TicketRequest::adult(13)]);
        assert!(matches!(reason_of(result), Reason::ExceedsMaximum { .. }));
    }

    fn validate_json(raw: &str) -> PurchaseResult<Order> {
        let request: PurchaseRequest = serde_json::from_str(raw).unwrap();
        RuleValidator::default().validate(&request)
    }

    #[test]
    fn request_decodes_nulls_from_json() {
        let request: PurchaseRequest = serde_json::from_str(
            r#"{"account_id": 3, "tickets": [{"type": "ADULT", "count": 1}, null]}"#,
        )
        .unwrap();
        assert_eq!(request.tickets.len(), 2);
        assert!(request.tickets[1].is_none());

        let empty: PurchaseRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PurchaseRequest::default());
    }

    #[test]
    fn non_integer_account_ids_from_json_are_invalid_accounts() {
        for account_id in ["1.5", r#""1""#, "null", "true", "9223372036854775808", "[1]"] {
            let raw = format!(
                r#"{{"account_id": {account_id}, "tickets": [{{"type": "ADULT", "count": 1}}]}}"#
            );
            assert_eq!(
                reason_of(validate_json(&raw)),
                Reason::InvalidAccount,
                "account id {account_id}"
            );
        }
    }

    #[test]
    fn ticket_types_from_json_are_case_insensitive() {
        let order = validate_json(concat!(
            r#"{"account_id": 1, "tickets": "#,
            r#"[{"type": "adult", "count": 2}, {"type": "Child", "count": 1}]}"#,
        ))
        .unwrap();
        assert_eq!(order.counts().adult, 2);
        assert_eq!(order.counts().child, 1);
    }

    #[test]
    fn unknown_ticket_type_from_json_is_a_purchase_error() {
        let result =
            validate_json(r#"{"account_id": 1, "tickets": [{"type": "SENIOR", "count": 1}]}"#);
        assert_eq!(
            reason_of(result),
            Reason::UnknownTicketType("SENIOR".to_string())
        );

        let result = validate_json(r#"{"account_id": 1, "tickets": [{"count": 1}]}"#);
        assert_eq!(reason_of(result), Reason::UnknownTicketType(String::new()));
    }

    #[test]
    fn bad_ticket_counts_from_json_are_purchase_errors() {
        for count in ["1.5", "-1", r#""2""#, "null"] {
            let raw = format!(
                r#"{{"account_id": 1, "tickets": [{{"type": "ADULT", "count": {count}}}]}}"#
            );
            assert_eq!(
                reason_of(validate_json(&raw)),
                Reason::InvalidTicketCount {
                    ticket_type: "ADULT".to_string()
                },
                "count {count}"
            );
        }
    }

    #[test]
    fn null_entries_are_reported_before_bad_lines() {
        let result = validate_json(
            r#"{"account_id": 1, "tickets": [{"type": "SENIOR", "count": 1}, null]}"#,
        );
        assert_eq!(reason_of(result), Reason::NoTicketRequests);
    }

    fn arb_request() -> impl Strategy<Value = TicketRequest> {
        (prop::sample::select(TicketType::ALL.to_vec()), 1u32..15)
            .prop_map(|(t, c)| TicketRequest::new(t, c))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: whatever passes validation satisfies every count rule.
        #[test]
        fn accepted_orders_respect_all_limits(
            requests in prop::collection::vec(arb_request(), 1..6)
        ) {
            if let Ok(order) = validate(1, &requests) {
                let counts = order.counts();
                prop_assert!(counts.total() <= u64::from(DEFAULT_MAX_TICKETS));
                prop_assert!(counts.adult >= 1);
                prop_assert!(counts.infant <= counts.adult);
            }
        }

        /// Property: validation has no hidden state; the same input gives the same outcome.
        #[test]
        fn validation_is_deterministic(
            requests in prop::collection::vec(arb_request(), 1..6)
        ) {
            let first = validate(1, &requests).map_err(|e| e.reason().clone());
            let second = validate(1, &requests).map_err(|e| e.reason().clone());
            prop_assert_eq!(first, second);
        }
    }
}
