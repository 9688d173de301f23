use super::models::{
    NewOfferPayload, NewTradeOffer, OfferDecision, OfferFeed, OfferStatus, RespondPayload,
    TradeOffer, parse_decision,
};
use crate::auth::models::AccessTokenClaims;
use crate::listing::models::{Listing, TransactionType};
use crate::merchant::models::Merchant;
use crate::utils::ApiError;
use crate::utils::types::Pool;
use axum::extract::{Json, Path, State};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;

pub async fn create_offer(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(requested_listing_id): Path<i32>,
    Json(payload): Json<NewOfferPayload>,
) -> Result<Json<TradeOffer>, ApiError> {
    use axum_market::schema::{listings, trade_offers};

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let requester = Merchant::for_user(&mut conn, claims.sub).await?.ok_or_else(|| {
        ApiError::NotAuthorized(
            "complete your company profile before sending trade offers".to_owned(),
        )
    })?;

    let requested = listings::table
        .find(requested_listing_id)
        .select(Listing::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("listing"))?;

    if requested.merchant_id == requester.id {
        return Err(ApiError::Validation(
            "you cannot make a trade offer on your own listing".to_owned(),
        ));
    }

    if !requested.transaction_type.allows_trade() {
        return Err(ApiError::StateConflict(
            "this listing is not open to trade".to_owned(),
        ));
    }

    let has_inventory: bool = diesel::select(exists(
        listings::table
            .filter(listings::merchant_id.eq(requester.id))
            .filter(listings::is_active.eq(true))
            .filter(
                listings::transaction_type
                    .eq(TransactionType::Trade)
                    .or(listings::transaction_type.eq(TransactionType::Both)),
            ),
    ))
    .get_result(&mut conn)
    .await?;
    if !has_inventory {
        return Err(ApiError::StateConflict(
            "add an active tradeable listing before making trade offers".to_owned(),
        ));
    }

    let offered = listings::table
        .find(payload.offered_listing_id)
        .select(Listing::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("listing"))?;

    if offered.merchant_id != requester.id {
        return Err(ApiError::NotAuthorized(
            "the offered listing must be one of your own".to_owned(),
        ));
    }
    if !offered.is_active || !offered.transaction_type.allows_trade() {
        return Err(ApiError::StateConflict(
            "the offered listing must be active and tradeable".to_owned(),
        ));
    }

    let duplicate: bool = diesel::select(exists(
        trade_offers::table
            .filter(trade_offers::offered_by.eq(requester.id))
            .filter(trade_offers::requested_listing_id.eq(requested.id))
            .filter(trade_offers::status.eq(OfferStatus::Pending)),
    ))
    .get_result(&mut conn)
    .await?;
    if duplicate {
        return Err(ApiError::StateConflict(
            "you already have a pending offer for this listing".to_owned(),
        ));
    }

    let new_offer = NewTradeOffer {
        offered_by: requester.id,
        offered_to: requested.merchant_id,
        offered_listing_id: offered.id,
        requested_listing_id: requested.id,
        note: payload.note.unwrap_or_default(),
    };

    // The partial unique index on pending offers closes the window between
    // the exists() check and the insert.
    let res = diesel::insert_into(trade_offers::table)
        .values(&new_offer)
        .returning(TradeOffer::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::StateConflict(
                    "you already have a pending offer for this listing".to_owned(),
                )
            }
            other => other.into(),
        })?;

    tracing::info!(offer_id = res.id, "trade offer created");

    Ok(Json(res))
}

pub async fn respond_offer(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
    Json(payload): Json<RespondPayload>,
) -> Result<Json<OfferDecision>, ApiError> {
    use axum_market::schema::{merchants, trade_offers};

    let decision = parse_decision(&payload.decision).ok_or_else(|| {
        ApiError::Validation(format!("unknown decision: {}", payload.decision))
    })?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let responder = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let offer = trade_offers::table
        .find(id)
        .select(TradeOffer::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("trade offer"))?;

    if offer.offered_to != responder.id {
        return Err(ApiError::NotAuthorized(
            "only the receiving merchant can answer this offer".to_owned(),
        ));
    }
    if offer.status.is_decided() {
        return Err(ApiError::StateConflict(
            "this offer has already been decided".to_owned(),
        ));
    }

    // Guard the transition on the stored status as well, in case the offer
    // was decided between the read and this write.
    let updated = diesel::update(
        trade_offers::table
            .find(id)
            .filter(trade_offers::status.eq(OfferStatus::Pending)),
    )
    .set(trade_offers::status.eq(decision))
    .returning(TradeOffer::as_returning())
    .get_result(&mut conn)
    .await
    .optional()?
    .ok_or_else(|| {
        ApiError::StateConflict("this offer has already been decided".to_owned())
    })?;

    let counterparty = if decision == OfferStatus::Accepted {
        let offerer = merchants::table
            .find(updated.offered_by)
            .select(Merchant::as_select())
            .first(&mut conn)
            .await?;
        Some(offerer.contact_card())
    } else {
        None
    };

    tracing::info!(offer_id = id, status = decision.as_str(), "trade offer decided");

    Ok(Json(OfferDecision {
        offer: updated,
        counterparty,
    }))
}

pub async fn list_offers(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Json<OfferFeed>, ApiError> {
    use axum_market::schema::trade_offers;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let received = trade_offers::table
        .filter(trade_offers::offered_to.eq(merchant.id))
        .order(trade_offers::created_at.desc())
        .select(TradeOffer::as_select())
        .load(&mut conn)
        .await?;

    let sent = trade_offers::table
        .filter(trade_offers::offered_by.eq(merchant.id))
        .order(trade_offers::created_at.desc())
        .select(TradeOffer::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(OfferFeed { received, sent }))
}
