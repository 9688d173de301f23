use axum_market::schema::merchants;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::ApiError;

pub const DELIVERY_OPTIONS: [&str; 3] = ["self_delivery", "courier", "both"];

pub fn valid_delivery_option(option: &str) -> bool {
    DELIVERY_OPTIONS.contains(&option)
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = merchants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Merchant {
    pub id: i32,
    pub user_id: Uuid,
    pub business_type_id: Option<i32>,
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub tax_number: Option<String>,
    pub tax_office: Option<String>,
    pub delivery_option: String,
    pub min_order_amount: Option<BigDecimal>,
    pub is_active: bool,
}

impl Merchant {
    pub async fn for_user(
        conn: &mut AsyncPgConnection,
        user: Uuid,
    ) -> Result<Option<Merchant>, diesel::result::Error> {
        merchants::table
            .filter(merchants::user_id.eq(user))
            .select(Merchant::as_select())
            .first(conn)
            .await
            .optional()
    }

    /// Resolves the acting merchant or rejects callers who registered an
    /// account but never completed a company profile.
    pub async fn require_for_user(
        conn: &mut AsyncPgConnection,
        user: Uuid,
    ) -> Result<Merchant, ApiError> {
        Self::for_user(conn, user).await?.ok_or_else(|| {
            ApiError::NotAuthorized(
                "complete your company profile before using the marketplace".to_owned(),
            )
        })
    }

    pub fn contact_card(&self) -> ContactCard {
        ContactCard {
            id: self.id,
            company_name: self.company_name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            whatsapp: self.whatsapp.clone(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = merchants)]
pub struct NewMerchant {
    pub user_id: Uuid,
    pub business_type_id: Option<i32>,
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub tax_number: Option<String>,
    pub tax_office: Option<String>,
    pub delivery_option: String,
    pub min_order_amount: Option<BigDecimal>,
}

#[derive(Deserialize)]
pub struct NewMerchantPayload {
    pub business_type_id: Option<i32>,
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub tax_number: Option<String>,
    pub tax_office: Option<String>,
    #[serde(default = "default_delivery_option")]
    pub delivery_option: String,
    pub min_order_amount: Option<BigDecimal>,
}

fn default_delivery_option() -> String {
    "self_delivery".to_owned()
}

#[derive(Deserialize, AsChangeset)]
#[diesel(table_name = merchants)]
pub struct UpdateMerchant {
    pub business_type_id: Option<i32>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub tax_number: Option<String>,
    pub tax_office: Option<String>,
    pub delivery_option: Option<String>,
    pub min_order_amount: Option<BigDecimal>,
}

/// The public face of a merchant, shown to counterparties once a trade or
/// sale needs to be settled out of band.
#[derive(Debug, PartialEq, Serialize)]
pub struct ContactCard {
    pub id: i32,
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub whatsapp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_options_are_closed_set() {
        assert!(valid_delivery_option("self_delivery"));
        assert!(valid_delivery_option("courier"));
        assert!(valid_delivery_option("both"));
        assert!(!valid_delivery_option("drone"));
        assert!(!valid_delivery_option(""));
    }
}
