use super::models::{
    Listing, ListingFeaturedPayload, ListingStatusPayload, NewListing, NewListingPayload,
    SearchParams, next_listing_no, valid_unit,
};
use crate::auth::models::AccessTokenClaims;
use crate::merchant::models::{ContactCard, Merchant};
use crate::message::models::NewMessage;
use crate::utils::ApiError;
use crate::utils::types::Pool;
use axum::extract::{Json, Path, Query, State};
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::{AsyncConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;
use serde::Serialize;

const FEED_LIMIT: i64 = 8;

#[derive(Serialize)]
pub struct PurchaseContact {
    pub listing_id: i32,
    pub message: &'static str,
    pub contact: ContactCard,
}

pub async fn create_listing(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<NewListingPayload>,
) -> Result<Json<Listing>, ApiError> {
    use axum_market::schema::listings;

    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("listing title is required".to_owned()));
    }
    if payload.quantity <= 0 {
        return Err(ApiError::Validation(
            "stock quantity must be a positive number".to_owned(),
        ));
    }
    if payload.min_order_quantity < 1 {
        return Err(ApiError::Validation(
            "minimum order quantity must be at least 1".to_owned(),
        ));
    }
    if !valid_unit(&payload.unit) {
        return Err(ApiError::Validation(format!(
            "unknown stock unit: {}",
            payload.unit
        )));
    }

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let mut new_listing = NewListing {
        listing_no: String::new(),
        merchant_id: merchant.id,
        category_id: payload.category_id,
        sub_category_id: payload.sub_category_id,
        brand_id: payload.brand_id,
        title: payload.title,
        description: payload.description,
        image: payload.image,
        quantity: payload.quantity,
        unit: payload.unit,
        price: payload.price,
        min_order_quantity: payload.min_order_quantity,
        vat_rate: payload.vat_rate,
        transaction_type: payload.transaction_type,
    };

    // The number is read-max-then-assign; the unique index on listing_no
    // catches concurrent creations and we retake the number.
    let mut attempts = 0;
    let listing = loop {
        let current_max: Option<String> = listings::table
            .select(max(listings::listing_no))
            .first(&mut conn)
            .await?;
        new_listing.listing_no = next_listing_no(current_max.as_deref());

        match diesel::insert_into(listings::table)
            .values(&new_listing)
            .returning(Listing::as_returning())
            .get_result(&mut conn)
            .await
        {
            Ok(listing) => break listing,
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
                if attempts < 3 =>
            {
                attempts += 1;
            }
            Err(e) => return Err(e.into()),
        }
    };

    tracing::info!(listing_no = %listing.listing_no, "listing created");

    Ok(Json(listing))
}

pub async fn get_my_listings(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Json<Vec<Listing>>, ApiError> {
    use axum_market::schema::listings;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let res = listings::table
        .filter(listings::merchant_id.eq(merchant.id))
        .order(listings::created_at.desc())
        .select(Listing::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_listing(
    State(pool): State<Pool>,
    Path(id): Path<i32>,
) -> Result<Json<Listing>, ApiError> {
    use axum_market::schema::listings;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = listings::table
        .find(id)
        .select(Listing::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("listing"))?;

    Ok(Json(res))
}

pub async fn featured_listings(State(pool): State<Pool>) -> Result<Json<Vec<Listing>>, ApiError> {
    use axum_market::schema::listings;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = listings::table
        .filter(listings::is_active.eq(true))
        .filter(listings::is_featured.eq(true))
        .order(listings::created_at.desc())
        .limit(FEED_LIMIT)
        .select(Listing::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn latest_listings(State(pool): State<Pool>) -> Result<Json<Vec<Listing>>, ApiError> {
    use axum_market::schema::listings;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = listings::table
        .filter(listings::is_active.eq(true))
        .order(listings::created_at.desc())
        .limit(FEED_LIMIT)
        .select(Listing::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn search_listings(
    State(pool): State<Pool>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    use axum_market::schema::{listings, merchants};

    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Ok(Json(Vec::new())),
    };
    let pattern = format!("%{}%", query.trim());

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = listings::table
        .inner_join(merchants::table)
        .filter(listings::is_active.eq(true))
        .filter(
            listings::title
                .ilike(pattern.clone())
                .or(listings::description.ilike(pattern.clone()))
                .or(merchants::company_name.ilike(pattern)),
        )
        .order(listings::created_at.desc())
        .select(Listing::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn category_listings(
    State(pool): State<Pool>,
    Path(category_id): Path<i32>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    use axum_market::schema::listings;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = listings::table
        .filter(listings::category_id.eq(category_id))
        .filter(listings::is_active.eq(true))
        .order(listings::created_at.desc())
        .select(Listing::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn business_type_listings(
    State(pool): State<Pool>,
    Path(business_type_id): Path<i32>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    use axum_market::schema::{listings, merchants};

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = listings::table
        .inner_join(merchants::table)
        .filter(merchants::business_type_id.eq(business_type_id))
        .filter(listings::is_active.eq(true))
        .order(listings::created_at.desc())
        .select(Listing::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn set_listing_status(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
    Json(payload): Json<ListingStatusPayload>,
) -> Result<Json<Listing>, ApiError> {
    use axum_market::schema::listings;

    let is_active = match payload.status.as_str() {
        "active" => true,
        "inactive" => false,
        other => {
            return Err(ApiError::Validation(format!(
                "unknown listing status: {}",
                other
            )));
        }
    };

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let listing = listings::table
        .find(id)
        .select(Listing::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("listing"))?;

    if listing.merchant_id != merchant.id {
        return Err(ApiError::NotAuthorized(
            "only the owner can change a listing's status".to_owned(),
        ));
    }

    let res = diesel::update(listings::table.find(id))
        .set((
            listings::is_active.eq(is_active),
            listings::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Listing::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn set_listing_featured(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
    Json(payload): Json<ListingFeaturedPayload>,
) -> Result<Json<Listing>, ApiError> {
    use axum_market::schema::listings;

    claims.require_admin()?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = diesel::update(listings::table.find(id))
        .set((
            listings::is_featured.eq(payload.featured),
            listings::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Listing::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("listing"))?;

    Ok(Json(res))
}

pub async fn purchase_contact(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
) -> Result<Json<PurchaseContact>, ApiError> {
    use axum_market::schema::{listings, merchants};

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let buyer = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let listing = listings::table
        .find(id)
        .select(Listing::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("listing"))?;

    if listing.merchant_id == buyer.id {
        return Err(ApiError::Validation(
            "you cannot buy your own listing".to_owned(),
        ));
    }
    if !listing.transaction_type.allows_sale() {
        return Err(ApiError::StateConflict(
            "this listing is not open for sale".to_owned(),
        ));
    }
    if listing.price.is_none() {
        return Err(ApiError::StateConflict(
            "this listing has no sale price set".to_owned(),
        ));
    }

    let seller = merchants::table
        .find(listing.merchant_id)
        .select(Merchant::as_select())
        .first(&mut conn)
        .await?;

    Ok(Json(PurchaseContact {
        listing_id: listing.id,
        message: "contact the seller to settle the purchase",
        contact: seller.contact_card(),
    }))
}

pub async fn remove_listing(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
) -> Result<Json<Listing>, ApiError> {
    use axum_market::schema::{listing_promotions, listings, messages, payments, trade_offers};

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let listing = listings::table
        .find(id)
        .select(Listing::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("listing"))?;

    let merchant = Merchant::for_user(&mut conn, claims.sub).await?;
    let is_owner = merchant
        .as_ref()
        .map(|m| m.id == listing.merchant_id)
        .unwrap_or(false);

    if !is_owner && !claims.is_admin() {
        return Err(ApiError::NotAuthorized(
            "only the owner or an administrator can remove a listing".to_owned(),
        ));
    }

    let moderation_notice = (!is_owner).then(|| {
        NewMessage::system(
            listing.merchant_id,
            "Your listing was removed".to_owned(),
            format!(
                "Your listing \"{}\" was removed by an administrator. \
                 Please keep future listings within the marketplace rules.",
                listing.title
            ),
        )
    });

    conn.transaction::<(), diesel::result::Error, _>(|conn| {
        async move {
            let promotion_ids: Vec<i32> = listing_promotions::table
                .filter(listing_promotions::listing_id.eq(id))
                .select(listing_promotions::id)
                .load(conn)
                .await?;

            diesel::delete(payments::table.filter(payments::promotion_id.eq_any(&promotion_ids)))
                .execute(conn)
                .await?;
            diesel::delete(
                listing_promotions::table.filter(listing_promotions::listing_id.eq(id)),
            )
            .execute(conn)
            .await?;
            diesel::delete(
                trade_offers::table.filter(
                    trade_offers::offered_listing_id
                        .eq(id)
                        .or(trade_offers::requested_listing_id.eq(id)),
                ),
            )
            .execute(conn)
            .await?;
            diesel::delete(listings::table.find(id)).execute(conn).await?;

            if let Some(notice) = moderation_notice {
                diesel::insert_into(messages::table)
                    .values(&notice)
                    .execute(conn)
                    .await?;
            }

            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    tracing::info!(listing_no = %listing.listing_no, "listing removed");

    Ok(Json(listing))
}
