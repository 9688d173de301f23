use axum_market::schema::payments;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::utils::ApiError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl ToSql<Text, Pg> for PaymentStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for PaymentStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"pending" => Ok(PaymentStatus::Pending),
            b"confirmed" => Ok(PaymentStatus::Confirmed),
            b"cancelled" => Ok(PaymentStatus::Cancelled),
            _ => Err("unrecognized payment status".into()),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Promotion,
    Advertisement,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Promotion => "promotion",
            PaymentKind::Advertisement => "advertisement",
        }
    }
}

impl ToSql<Text, Pg> for PaymentKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for PaymentKind {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"promotion" => Ok(PaymentKind::Promotion),
            b"advertisement" => Ok(PaymentKind::Advertisement),
            _ => Err("unrecognized payment kind".into()),
        }
    }
}

/// What a payment buys. A payment is only ever created through one of the
/// purchase flows, so constructing one of these is the only way to link it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PaymentTarget {
    Promotion(i32),
    Advertisement(i32),
}

impl PaymentTarget {
    pub fn kind(&self) -> PaymentKind {
        match self {
            PaymentTarget::Promotion(_) => PaymentKind::Promotion,
            PaymentTarget::Advertisement(_) => PaymentKind::Advertisement,
        }
    }

    fn links(&self) -> (Option<i32>, Option<i32>) {
        match self {
            PaymentTarget::Promotion(id) => (Some(*id), None),
            PaymentTarget::Advertisement(id) => (None, Some(*id)),
        }
    }

    pub fn from_links(
        promotion_id: Option<i32>,
        advertisement_id: Option<i32>,
    ) -> Option<PaymentTarget> {
        match (promotion_id, advertisement_id) {
            (Some(id), None) => Some(PaymentTarget::Promotion(id)),
            (None, Some(id)) => Some(PaymentTarget::Advertisement(id)),
            _ => None,
        }
    }
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Payment {
    pub id: i32,
    pub merchant_id: i32,
    pub kind: PaymentKind,
    pub amount: BigDecimal,
    pub status: PaymentStatus,
    #[serde(skip)]
    pub promotion_id: Option<i32>,
    #[serde(skip)]
    pub advertisement_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl Payment {
    /// The database check constraint keeps exactly one link set; a row that
    /// still decodes to neither or both is corrupt.
    pub fn target(&self) -> Result<PaymentTarget, ApiError> {
        PaymentTarget::from_links(self.promotion_id, self.advertisement_id).ok_or_else(|| {
            ApiError::internal(format!(
                "payment {} is not linked to exactly one promotion or advertisement",
                self.id
            ))
        })
    }

    /// Wire reference the buyer quotes on the bank transfer.
    pub fn reference(&self) -> String {
        format!("MKT-{}", self.id)
    }
}

#[derive(Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    merchant_id: i32,
    kind: PaymentKind,
    amount: BigDecimal,
    promotion_id: Option<i32>,
    advertisement_id: Option<i32>,
}

impl NewPayment {
    pub fn for_target(merchant_id: i32, target: PaymentTarget, amount: BigDecimal) -> Self {
        let (promotion_id, advertisement_id) = target.links();
        NewPayment {
            merchant_id,
            kind: target.kind(),
            amount,
            promotion_id,
            advertisement_id,
        }
    }
}

#[derive(Serialize)]
pub struct PaymentInstructions {
    pub payment: Payment,
    pub target: PaymentTarget,
    pub reference: String,
}

#[derive(Deserialize)]
pub struct CheckoutPayload {
    pub callback_url: String,
}

#[derive(Deserialize)]
pub struct VerifyPayload {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_target_is_exactly_one_of_promotion_or_advertisement() {
        assert_eq!(
            PaymentTarget::from_links(Some(3), None),
            Some(PaymentTarget::Promotion(3))
        );
        assert_eq!(
            PaymentTarget::from_links(None, Some(9)),
            Some(PaymentTarget::Advertisement(9))
        );
        assert_eq!(PaymentTarget::from_links(None, None), None);
        assert_eq!(PaymentTarget::from_links(Some(3), Some(9)), None);
    }

    #[test]
    fn target_kind_matches_the_linked_entity() {
        assert_eq!(PaymentTarget::Promotion(1).kind(), PaymentKind::Promotion);
        assert_eq!(
            PaymentTarget::Advertisement(1).kind(),
            PaymentKind::Advertisement
        );
    }

    #[test]
    fn payments_link_back_through_the_constructed_target() {
        let target = PaymentTarget::Promotion(42);
        let payment = NewPayment::for_target(7, target, BigDecimal::from(50));
        assert_eq!(payment.kind, PaymentKind::Promotion);
        assert_eq!(payment.promotion_id, Some(42));
        assert_eq!(payment.advertisement_id, None);
    }
}
