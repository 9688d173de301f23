use axum_market::schema::trade_offers;
use chrono::NaiveDateTime;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::merchant::models::ContactCard;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected are terminal; only a pending offer can move.
    pub fn is_decided(&self) -> bool {
        !matches!(self, OfferStatus::Pending)
    }
}

impl ToSql<Text, Pg> for OfferStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for OfferStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"pending" => Ok(OfferStatus::Pending),
            b"accepted" => Ok(OfferStatus::Accepted),
            b"rejected" => Ok(OfferStatus::Rejected),
            _ => Err("unrecognized offer status".into()),
        }
    }
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = trade_offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TradeOffer {
    pub id: i32,
    pub offered_by: i32,
    pub offered_to: i32,
    pub offered_listing_id: i32,
    pub requested_listing_id: i32,
    pub status: OfferStatus,
    pub note: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = trade_offers)]
pub struct NewTradeOffer {
    pub offered_by: i32,
    pub offered_to: i32,
    pub offered_listing_id: i32,
    pub requested_listing_id: i32,
    pub note: String,
}

#[derive(Deserialize)]
pub struct NewOfferPayload {
    pub offered_listing_id: i32,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct RespondPayload {
    pub decision: String,
}

pub fn parse_decision(decision: &str) -> Option<OfferStatus> {
    match decision {
        "accept" => Some(OfferStatus::Accepted),
        "reject" => Some(OfferStatus::Rejected),
        _ => None,
    }
}

#[derive(Serialize)]
pub struct OfferFeed {
    pub received: Vec<TradeOffer>,
    pub sent: Vec<TradeOffer>,
}

/// Decision result; the counterparty's contact card is attached once a
/// swap is agreed so the parties can arrange the exchange themselves.
#[derive(Serialize)]
pub struct OfferDecision {
    pub offer: TradeOffer,
    pub counterparty: Option<ContactCard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_offers_are_open() {
        assert!(!OfferStatus::Pending.is_decided());
        assert!(OfferStatus::Accepted.is_decided());
        assert!(OfferStatus::Rejected.is_decided());
    }

    #[test]
    fn decisions_parse_to_terminal_states() {
        assert_eq!(parse_decision("accept"), Some(OfferStatus::Accepted));
        assert_eq!(parse_decision("reject"), Some(OfferStatus::Rejected));
        assert_eq!(parse_decision("withdraw"), None);
        assert_eq!(parse_decision(""), None);
    }
}
