use axum_market::schema::{ad_slots, advertisements, listing_promotions, promotion_options};
use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::payment::models::PaymentStatus;

pub const MAX_AD_DAYS: i32 = 365;

pub const PROMOTION_PLACEMENTS: [&str; 3] = ["showcase", "above_category", "above_homepage"];

pub const AD_PLACEMENTS: [&str; 4] = ["header", "sidebar", "footer", "category_page"];

pub fn valid_promotion_placement(placement: &str) -> bool {
    PROMOTION_PLACEMENTS.contains(&placement)
}

pub fn valid_ad_placement(placement: &str) -> bool {
    AD_PLACEMENTS.contains(&placement)
}

/// Paid windows run from the moment of purchase; only payment confirmation
/// turns them on.
pub fn paid_window(starts_at: NaiveDateTime, days: i32) -> (NaiveDateTime, NaiveDateTime) {
    (starts_at, starts_at + Duration::days(i64::from(days)))
}

pub fn ad_total(daily_rate: &BigDecimal, days: i32) -> BigDecimal {
    daily_rate.clone() * BigDecimal::from(days)
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = promotion_options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PromotionOption {
    pub id: i32,
    pub name: String,
    pub placement: String,
    pub duration_days: i32,
    pub price: BigDecimal,
    pub description: String,
    pub is_active: bool,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = promotion_options)]
pub struct NewPromotionOption {
    pub name: String,
    pub placement: String,
    pub duration_days: i32,
    pub price: BigDecimal,
    #[serde(default)]
    pub description: String,
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = listing_promotions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListingPromotion {
    pub id: i32,
    pub listing_id: i32,
    pub option_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub payment_status: PaymentStatus,
}

#[derive(Insertable)]
#[diesel(table_name = listing_promotions)]
pub struct NewListingPromotion {
    pub listing_id: i32,
    pub option_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct PurchasePromotionPayload {
    pub option_id: i32,
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = ad_slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdSlot {
    pub id: i32,
    pub name: String,
    pub placement: String,
    pub size: String,
    pub daily_rate: BigDecimal,
    pub is_active: bool,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = ad_slots)]
pub struct NewAdSlot {
    pub name: String,
    pub placement: String,
    pub size: String,
    pub daily_rate: BigDecimal,
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = advertisements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Advertisement {
    pub id: i32,
    pub merchant_id: i32,
    pub slot_id: i32,
    pub title: String,
    pub image: String,
    pub link: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub payment_status: PaymentStatus,
}

#[derive(Insertable)]
#[diesel(table_name = advertisements)]
pub struct NewAdvertisement {
    pub merchant_id: i32,
    pub slot_id: i32,
    pub title: String,
    pub image: String,
    pub link: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct PurchaseAdPayload {
    pub slot_id: i32,
    pub title: String,
    pub image: String,
    pub link: String,
    pub days: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn paid_window_runs_for_the_bought_days() {
        let (start, end) = paid_window(noon(), 30);
        assert_eq!(start, noon());
        assert_eq!(end - start, Duration::days(30));
    }

    #[test]
    fn ad_cost_is_daily_rate_times_days() {
        let rate = BigDecimal::from(25);
        assert_eq!(ad_total(&rate, 4), BigDecimal::from(100));
        assert_eq!(ad_total(&rate, 1), rate);
    }

    #[test]
    fn placements_are_closed_sets() {
        assert!(valid_promotion_placement("showcase"));
        assert!(valid_promotion_placement("above_homepage"));
        assert!(!valid_promotion_placement("header"));

        assert!(valid_ad_placement("header"));
        assert!(valid_ad_placement("category_page"));
        assert!(!valid_ad_placement("showcase"));
    }
}
