use super::models::{Message, MessageFeed, NewMessage, NewMessagePayload};
use crate::auth::models::AccessTokenClaims;
use crate::merchant::models::Merchant;
use crate::utils::ApiError;
use crate::utils::types::Pool;
use axum::extract::{Json, Path, State};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

pub async fn send_message(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(recipient_id): Path<i32>,
    Json(payload): Json<NewMessagePayload>,
) -> Result<Json<Message>, ApiError> {
    use axum_market::schema::{merchants, messages};

    if payload.subject.trim().is_empty() {
        return Err(ApiError::Validation("message subject is required".to_owned()));
    }
    if payload.body.trim().is_empty() {
        return Err(ApiError::Validation("message body is required".to_owned()));
    }

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let sender = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let recipient_exists: bool = diesel::select(diesel::dsl::exists(
        merchants::table.filter(merchants::id.eq(recipient_id)),
    ))
    .get_result(&mut conn)
    .await?;
    if !recipient_exists {
        return Err(ApiError::NotFound("merchant"));
    }

    let new_message =
        NewMessage::direct(sender.id, recipient_id, payload.subject, payload.body);

    let res = diesel::insert_into(messages::table)
        .values(&new_message)
        .returning(Message::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_messages(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Json<MessageFeed>, ApiError> {
    use axum_market::schema::messages;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let inbox = messages::table
        .filter(messages::recipient_id.eq(merchant.id))
        .order(messages::created_at.desc())
        .select(Message::as_select())
        .load(&mut conn)
        .await?;

    let outbox = messages::table
        .filter(messages::sender_id.eq(merchant.id))
        .order(messages::created_at.desc())
        .select(Message::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(MessageFeed { inbox, outbox }))
}

pub async fn mark_read(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Path(id): Path<i32>,
) -> Result<Json<Message>, ApiError> {
    use axum_market::schema::messages;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let merchant = Merchant::require_for_user(&mut conn, claims.sub).await?;

    let message = messages::table
        .find(id)
        .select(Message::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("message"))?;

    if message.recipient_id != merchant.id {
        return Err(ApiError::NotAuthorized(
            "only the recipient can mark a message as read".to_owned(),
        ));
    }

    // Marking twice is a no-op, not an error.
    if message.is_read {
        return Ok(Json(message));
    }

    let res = diesel::update(messages::table.find(id))
        .set(messages::is_read.eq(true))
        .returning(Message::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn unread_count(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Json<i64>, ApiError> {
    use axum_market::schema::messages;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    // Accounts without a completed profile simply have nothing waiting.
    let merchant = match Merchant::for_user(&mut conn, claims.sub).await? {
        Some(merchant) => merchant,
        None => return Ok(Json(0)),
    };

    let count = messages::table
        .filter(messages::recipient_id.eq(merchant.id))
        .filter(messages::is_read.eq(false))
        .count()
        .get_result(&mut conn)
        .await?;

    Ok(Json(count))
}
