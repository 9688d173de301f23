use axum_market::schema::listings;
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

/// Listing numbers start here when the board is empty, and whenever the
/// stored maximum cannot be read back as an integer.
pub const FIRST_LISTING_NO: i64 = 1_000_001;

pub const UNITS: [&str; 6] = ["piece", "kg", "g", "lt", "package", "box"];

pub fn valid_unit(unit: &str) -> bool {
    UNITS.contains(&unit)
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Trade,
    Sale,
    Both,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Trade => "trade",
            TransactionType::Sale => "sale",
            TransactionType::Both => "both",
        }
    }

    pub fn allows_trade(&self) -> bool {
        matches!(self, TransactionType::Trade | TransactionType::Both)
    }

    pub fn allows_sale(&self) -> bool {
        matches!(self, TransactionType::Sale | TransactionType::Both)
    }
}

impl ToSql<Text, Pg> for TransactionType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for TransactionType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"trade" => Ok(TransactionType::Trade),
            b"sale" => Ok(TransactionType::Sale),
            b"both" => Ok(TransactionType::Both),
            _ => Err("unrecognized transaction type".into()),
        }
    }
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Listing {
    pub id: i32,
    pub listing_no: String,
    pub merchant_id: i32,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub unit: String,
    pub price: Option<BigDecimal>,
    pub min_order_quantity: i32,
    pub vat_rate: i32,
    pub transaction_type: TransactionType,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = listings)]
pub struct NewListing {
    pub listing_no: String,
    pub merchant_id: i32,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub unit: String,
    pub price: Option<BigDecimal>,
    pub min_order_quantity: i32,
    pub vat_rate: i32,
    pub transaction_type: TransactionType,
}

#[derive(Deserialize)]
pub struct NewListingPayload {
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub quantity: i32,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub price: Option<BigDecimal>,
    #[serde(default = "default_min_order_quantity")]
    pub min_order_quantity: i32,
    #[serde(default = "default_vat_rate")]
    pub vat_rate: i32,
    pub transaction_type: TransactionType,
}

fn default_unit() -> String {
    "piece".to_owned()
}

fn default_min_order_quantity() -> i32 {
    1
}

fn default_vat_rate() -> i32 {
    18
}

#[derive(Deserialize)]
pub struct ListingStatusPayload {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ListingFeaturedPayload {
    pub featured: bool,
}

#[derive(Deserialize, Debug)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Next listing number, derived from the stored maximum. Non-numeric
/// leftovers (hand-edited rows, legacy imports) reset the sequence to its
/// base rather than failing the insert.
pub fn next_listing_no(current_max: Option<&str>) -> String {
    let next = current_max
        .and_then(|no| no.parse::<i64>().ok())
        .map(|no| no + 1)
        .unwrap_or(FIRST_LISTING_NO);
    next.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_listing_gets_the_base_number() {
        assert_eq!(next_listing_no(None), "1000001");
    }

    #[test]
    fn numbers_increment_from_the_current_maximum() {
        assert_eq!(next_listing_no(Some("1000001")), "1000002");
        assert_eq!(next_listing_no(Some("1004512")), "1004513");
    }

    #[test]
    fn non_numeric_maximum_falls_back_to_the_base() {
        assert_eq!(next_listing_no(Some("A-1042")), "1000001");
        assert_eq!(next_listing_no(Some("")), "1000001");
    }

    #[test]
    fn sequence_is_strictly_increasing() {
        let mut current = next_listing_no(None);
        for _ in 0..5 {
            let next = next_listing_no(Some(&current));
            assert!(next.parse::<i64>().unwrap() > current.parse::<i64>().unwrap());
            current = next;
        }
    }

    #[test]
    fn trade_eligibility_follows_transaction_type() {
        assert!(TransactionType::Trade.allows_trade());
        assert!(TransactionType::Both.allows_trade());
        assert!(!TransactionType::Sale.allows_trade());
        assert!(TransactionType::Sale.allows_sale());
        assert!(TransactionType::Both.allows_sale());
        assert!(!TransactionType::Trade.allows_sale());
    }
}
