use super::models::{
    AdSlot, Advertisement, ListingPromotion, MAX_AD_DAYS, NewAdSlot, NewAdvertisement,
    NewListingPromotion, NewPromotionOption, PromotionOption, PurchaseAdPayload,
    PurchasePromotionPayload, ad_total, paid_window, valid_ad_placement,
    valid_promotion_placement,
};
use crate::auth::models::AccessTokenClaims;
use crate::listing::models::Listing;
use crate::merchant::models::Merchant;
use crate::payment::models::{NewPayment, Payment, PaymentTarget};
use crate::utils::ApiError;
use crate::utils::types::Pool;
use axum::extract::{Json, Path, State};
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;

pub async fn get_promotion_options(
    State(pool): State<Pool>,
) -> Result<Json<Vec<PromotionOption>>, ApiError> {
    use axum_market::schema::promotion_options;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = promotion_options::table
        .filter(promotion_options::is_active.eq(true))
        .order(promotion_options::price.asc())
        .select(PromotionOption::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn create_promotion_option(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<NewPromotionOption>,
) -> Result<Json<PromotionOption>, ApiError> {
    use axum_market::schema::promotion_options;

    claims.require_admin()?;

    if !valid_promotion_placement(&payload.placement) {
        return Err(ApiError::Validation(format!(
            "unknown promotion placement: {}",
            payload.placement
        )));
    }
    if payload.duration_days < 1 {
        return Err(ApiError::Validation(
            "promotion duration must be at least one day".to_owned(),
        ));
    }
    if payload.price < BigDecimal::from(0) {
        return Err(ApiError::Validation(
            "promotion price cannot be negative".to_owned(),
        ));
    }

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = diesel::insert_into(promotion_options::table)
        .values(&payload)
        .returning(PromotionOption::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

/// Featured-listing purchase. The promotion and its pending payment are
/// written together; nothing becomes visible until the payment is
/// confirmed.
pub async fn purchase_promotion(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(listing_id): Path<i32>,
    Json(payload): Json<PurchasePromotionPayload>,
) -> Result<Json<Payment>, ApiError> {
    use axum_market::schema::{listing_promotions, listings, payments, promotion_options};

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let listing = listings::table
        .find(listing_id)
        .select(Listing::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("listing"))?;

    if listing.merchant_id != merchant.id {
        return Err(ApiError::NotAuthorized(
            "you can only promote your own listings".to_owned(),
        ));
    }

    let option = promotion_options::table
        .find(payload.option_id)
        .select(PromotionOption::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("promotion option"))?;

    if !option.is_active {
        return Err(ApiError::StateConflict(
            "this promotion package is no longer offered".to_owned(),
        ));
    }

    let (starts_at, ends_at) = paid_window(Utc::now().naive_utc(), option.duration_days);
    let merchant_id = merchant.id;

    let payment = conn
        .transaction::<Payment, diesel::result::Error, _>(|conn| {
            async move {
                let promotion: ListingPromotion =
                    diesel::insert_into(listing_promotions::table)
                        .values(&NewListingPromotion {
                            listing_id,
                            option_id: option.id,
                            starts_at,
                            ends_at,
                        })
                        .returning(ListingPromotion::as_returning())
                        .get_result(conn)
                        .await?;

                let payment = diesel::insert_into(payments::table)
                    .values(&NewPayment::for_target(
                        merchant_id,
                        PaymentTarget::Promotion(promotion.id),
                        option.price.clone(),
                    ))
                    .returning(Payment::as_returning())
                    .get_result(conn)
                    .await?;

                Ok(payment)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(payment_id = payment.id, "promotion purchased, payment pending");

    Ok(Json(payment))
}

pub async fn my_promotions(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Json<Vec<ListingPromotion>>, ApiError> {
    use axum_market::schema::{listing_promotions, listings};

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let res = listing_promotions::table
        .inner_join(listings::table)
        .filter(listings::merchant_id.eq(merchant.id))
        .order(listing_promotions::starts_at.desc())
        .select(ListingPromotion::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_ad_slots(State(pool): State<Pool>) -> Result<Json<Vec<AdSlot>>, ApiError> {
    use axum_market::schema::ad_slots;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = ad_slots::table
        .filter(ad_slots::is_active.eq(true))
        .order(ad_slots::daily_rate.asc())
        .select(AdSlot::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn create_ad_slot(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<NewAdSlot>,
) -> Result<Json<AdSlot>, ApiError> {
    use axum_market::schema::ad_slots;

    claims.require_admin()?;

    if !valid_ad_placement(&payload.placement) {
        return Err(ApiError::Validation(format!(
            "unknown ad placement: {}",
            payload.placement
        )));
    }
    if payload.daily_rate < BigDecimal::from(0) {
        return Err(ApiError::Validation(
            "daily rate cannot be negative".to_owned(),
        ));
    }

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = diesel::insert_into(ad_slots::table)
        .values(&payload)
        .returning(AdSlot::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

/// Banner purchase; the price is the slot's daily rate over the bought
/// window. Advertisement and pending payment land together.
pub async fn purchase_ad(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<PurchaseAdPayload>,
) -> Result<Json<Payment>, ApiError> {
    use axum_market::schema::{ad_slots, advertisements, payments};

    if payload.days < 1 || payload.days > MAX_AD_DAYS {
        return Err(ApiError::Validation(format!(
            "advertisement duration must be between 1 and {} days",
            MAX_AD_DAYS
        )));
    }
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("advertisement title is required".to_owned()));
    }
    if payload.image.trim().is_empty() {
        return Err(ApiError::Validation("advertisement image is required".to_owned()));
    }
    if !payload.link.starts_with("http://") && !payload.link.starts_with("https://") {
        return Err(ApiError::Validation(
            "advertisement link must be an http(s) url".to_owned(),
        ));
    }

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let slot = ad_slots::table
        .find(payload.slot_id)
        .select(AdSlot::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("ad slot"))?;

    if !slot.is_active {
        return Err(ApiError::StateConflict(
            "this ad slot is not available".to_owned(),
        ));
    }

    let amount = ad_total(&slot.daily_rate, payload.days);
    let (starts_at, ends_at) = paid_window(Utc::now().naive_utc(), payload.days);
    let merchant_id = merchant.id;

    let payment = conn
        .transaction::<Payment, diesel::result::Error, _>(|conn| {
            async move {
                let advertisement: Advertisement = diesel::insert_into(advertisements::table)
                    .values(&NewAdvertisement {
                        merchant_id,
                        slot_id: slot.id,
                        title: payload.title,
                        image: payload.image,
                        link: payload.link,
                        starts_at,
                        ends_at,
                    })
                    .returning(Advertisement::as_returning())
                    .get_result(conn)
                    .await?;

                let payment = diesel::insert_into(payments::table)
                    .values(&NewPayment::for_target(
                        merchant_id,
                        PaymentTarget::Advertisement(advertisement.id),
                        amount,
                    ))
                    .returning(Payment::as_returning())
                    .get_result(conn)
                    .await?;

                Ok(payment)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(payment_id = payment.id, "advertisement purchased, payment pending");

    Ok(Json(payment))
}

pub async fn my_ads(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Json<Vec<Advertisement>>, ApiError> {
    use axum_market::schema::advertisements;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let res = advertisements::table
        .filter(advertisements::merchant_id.eq(merchant.id))
        .order(advertisements::starts_at.desc())
        .select(Advertisement::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}
