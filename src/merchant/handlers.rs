use super::models::{
    ContactCard, Merchant, NewMerchant, NewMerchantPayload, UpdateMerchant, valid_delivery_option,
};
use crate::auth::models::AccessTokenClaims;
use crate::utils::ApiError;
use crate::utils::types::Pool;
use axum::extract::{Json, Path, State};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;

pub async fn register_merchant(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<NewMerchantPayload>,
) -> Result<Json<Merchant>, ApiError> {
    use axum_market::schema::merchants;

    if !valid_delivery_option(&payload.delivery_option) {
        return Err(ApiError::Validation(format!(
            "unknown delivery option: {}",
            payload.delivery_option
        )));
    }
    if payload.company_name.trim().is_empty() {
        return Err(ApiError::Validation("company name is required".to_owned()));
    }

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    if Merchant::for_user(&mut conn, claims.sub).await?.is_some() {
        return Err(ApiError::StateConflict(
            "a company profile already exists for this account".to_owned(),
        ));
    }

    let new_merchant = NewMerchant {
        user_id: claims.sub,
        business_type_id: payload.business_type_id,
        company_name: payload.company_name,
        address: payload.address,
        phone: payload.phone,
        whatsapp: payload.whatsapp,
        tax_number: payload.tax_number,
        tax_office: payload.tax_office,
        delivery_option: payload.delivery_option,
        min_order_amount: payload.min_order_amount,
    };

    let res = diesel::insert_into(merchants::table)
        .values(&new_merchant)
        .returning(Merchant::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(merchant_id = res.id, "merchant profile created");

    Ok(Json(res))
}

pub async fn get_my_profile(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Json<Merchant>, ApiError> {
    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    Ok(Json(merchant))
}

pub async fn update_my_profile(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<UpdateMerchant>,
) -> Result<Json<Merchant>, ApiError> {
    use axum_market::schema::merchants;

    if let Some(option) = &payload.delivery_option {
        if !valid_delivery_option(option) {
            return Err(ApiError::Validation(format!(
                "unknown delivery option: {}",
                option
            )));
        }
    }

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let res = diesel::update(merchants::table.find(merchant.id))
        .set(&payload)
        .returning(Merchant::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_merchant(
    State(pool): State<Pool>,
    Path(id): Path<i32>,
) -> Result<Json<ContactCard>, ApiError> {
    use axum_market::schema::merchants;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = merchants::table
        .find(id)
        .filter(merchants::is_active.eq(true))
        .select(Merchant::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("merchant"))?;

    Ok(Json(merchant.contact_card()))
}

/// Account removal, invoked by the identity service when an account is
/// closed. Everything the merchant owns or took part in goes with the
/// profile, in dependency order, inside one transaction.
pub async fn delete_merchant(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
) -> Result<Json<Merchant>, ApiError> {
    use axum_market::schema::{
        advertisements, listing_promotions, listings, merchants, messages, payments, trade_offers,
    };

    claims.require_admin()?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = merchants::table
        .find(id)
        .select(Merchant::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("merchant"))?;

    conn.transaction::<(), diesel::result::Error, _>(|conn| {
        async move {
            let listing_ids: Vec<i32> = listings::table
                .filter(listings::merchant_id.eq(id))
                .select(listings::id)
                .load(conn)
                .await?;

            diesel::delete(payments::table.filter(payments::merchant_id.eq(id)))
                .execute(conn)
                .await?;
            diesel::delete(
                listing_promotions::table
                    .filter(listing_promotions::listing_id.eq_any(&listing_ids)),
            )
            .execute(conn)
            .await?;
            diesel::delete(advertisements::table.filter(advertisements::merchant_id.eq(id)))
                .execute(conn)
                .await?;
            diesel::delete(
                trade_offers::table.filter(
                    trade_offers::offered_by
                        .eq(id)
                        .or(trade_offers::offered_to.eq(id))
                        .or(trade_offers::offered_listing_id.eq_any(&listing_ids))
                        .or(trade_offers::requested_listing_id.eq_any(&listing_ids)),
                ),
            )
            .execute(conn)
            .await?;
            diesel::delete(
                messages::table.filter(
                    messages::sender_id
                        .eq(id)
                        .or(messages::recipient_id.eq(id)),
                ),
            )
            .execute(conn)
            .await?;
            diesel::delete(listings::table.filter(listings::merchant_id.eq(id)))
                .execute(conn)
                .await?;
            diesel::delete(merchants::table.find(id)).execute(conn).await?;

            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    tracing::info!(merchant_id = id, "merchant profile and owned records removed");

    Ok(Json(merchant))
}
