use super::gateway;
use super::models::{
    CheckoutPayload, Payment, PaymentInstructions, PaymentStatus, PaymentTarget, VerifyPayload,
};
use crate::auth::models::AccessTokenClaims;
use crate::merchant::models::Merchant;
use crate::utils::ApiError;
use crate::utils::types::Pool;
use axum::extract::{Json, Path, State};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;

pub async fn get_payment(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
) -> Result<Json<PaymentInstructions>, ApiError> {
    use axum_market::schema::payments;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let payment = payments::table
        .find(id)
        .select(Payment::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("payment"))?;

    if payment.merchant_id != merchant.id {
        return Err(ApiError::NotAuthorized(
            "this payment belongs to another merchant".to_owned(),
        ));
    }

    Ok(Json(PaymentInstructions {
        target: payment.target()?,
        reference: payment.reference(),
        payment,
    }))
}

/// Opens a checkout form at the external gateway and relays its redirect
/// payload. The payment row itself is untouched; a gateway failure leaves
/// nothing to roll back.
pub async fn start_checkout(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
    Json(payload): Json<CheckoutPayload>,
) -> Result<Json<gateway::CheckoutInit>, ApiError> {
    use axum_market::schema::payments;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let payment = payments::table
        .find(id)
        .select(Payment::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("payment"))?;

    if payment.merchant_id != merchant.id {
        return Err(ApiError::NotAuthorized(
            "this payment belongs to another merchant".to_owned(),
        ));
    }
    if payment.status != PaymentStatus::Pending {
        return Err(ApiError::StateConflict(format!(
            "this payment is already {}",
            payment.status.as_str()
        )));
    }

    let init = gateway::initialize_checkout(&payment, &merchant, &payload.callback_url).await?;

    Ok(Json(init))
}

/// Looks a checkout token up at the gateway and relays the status payload.
/// Confirmation stays a separate, privileged step; a gateway answer alone
/// never flips a payment.
pub async fn verify_payment(
    _claims: AccessTokenClaims,
    Json(payload): Json<VerifyPayload>,
) -> Result<Json<gateway::GatewayVerification>, ApiError> {
    let verification = gateway::retrieve_checkout(&payload.token).await?;

    Ok(Json(verification))
}

pub async fn confirm_payment(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
) -> Result<Json<Payment>, ApiError> {
    use axum_market::schema::{advertisements, listing_promotions, payments};

    claims.require_admin()?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let payment = conn
        .transaction::<Payment, ApiError, _>(|conn| {
            async move {
                let payment = payments::table
                    .find(id)
                    .select(Payment::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?
                    .ok_or(ApiError::NotFound("payment"))?;

                match payment.status {
                    // Confirming twice changes nothing.
                    PaymentStatus::Confirmed => return Ok(payment),
                    PaymentStatus::Cancelled => {
                        return Err(ApiError::StateConflict(
                            "a cancelled payment cannot be confirmed".to_owned(),
                        ));
                    }
                    PaymentStatus::Pending => {}
                }

                let updated = diesel::update(payments::table.find(id))
                    .set(payments::status.eq(PaymentStatus::Confirmed))
                    .returning(Payment::as_returning())
                    .get_result(conn)
                    .await?;

                match updated.target()? {
                    PaymentTarget::Promotion(promotion_id) => {
                        diesel::update(listing_promotions::table.find(promotion_id))
                            .set((
                                listing_promotions::is_active.eq(true),
                                listing_promotions::payment_status.eq(PaymentStatus::Confirmed),
                            ))
                            .execute(conn)
                            .await?;
                    }
                    PaymentTarget::Advertisement(advertisement_id) => {
                        diesel::update(advertisements::table.find(advertisement_id))
                            .set((
                                advertisements::is_active.eq(true),
                                advertisements::payment_status.eq(PaymentStatus::Confirmed),
                            ))
                            .execute(conn)
                            .await?;
                    }
                }

                Ok(updated)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(payment_id = id, "payment confirmed and target activated");

    Ok(Json(payment))
}

pub async fn cancel_payment(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
) -> Result<Json<Payment>, ApiError> {
    use axum_market::schema::{advertisements, listing_promotions, payments};

    claims.require_admin()?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let payment = conn
        .transaction::<Payment, ApiError, _>(|conn| {
            async move {
                let payment = payments::table
                    .find(id)
                    .select(Payment::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?
                    .ok_or(ApiError::NotFound("payment"))?;

                match payment.status {
                    PaymentStatus::Cancelled => return Ok(payment),
                    PaymentStatus::Confirmed => {
                        return Err(ApiError::StateConflict(
                            "a confirmed payment cannot be cancelled here".to_owned(),
                        ));
                    }
                    PaymentStatus::Pending => {}
                }

                let updated = diesel::update(payments::table.find(id))
                    .set(payments::status.eq(PaymentStatus::Cancelled))
                    .returning(Payment::as_returning())
                    .get_result(conn)
                    .await?;

                match updated.target()? {
                    PaymentTarget::Promotion(promotion_id) => {
                        diesel::update(listing_promotions::table.find(promotion_id))
                            .set(listing_promotions::payment_status.eq(PaymentStatus::Cancelled))
                            .execute(conn)
                            .await?;
                    }
                    PaymentTarget::Advertisement(advertisement_id) => {
                        diesel::update(advertisements::table.find(advertisement_id))
                            .set(advertisements::payment_status.eq(PaymentStatus::Cancelled))
                            .execute(conn)
                            .await?;
                    }
                }

                Ok(updated)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(payment_id = id, "payment cancelled");

    Ok(Json(payment))
}
