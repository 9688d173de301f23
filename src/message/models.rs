use axum_market::schema::messages;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    pub id: i32,
    /// Absent for notices generated by the marketplace itself.
    pub sender_id: Option<i32>,
    pub recipient_id: i32,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    sender_id: Option<i32>,
    recipient_id: i32,
    subject: String,
    body: String,
}

impl NewMessage {
    pub fn direct(sender_id: i32, recipient_id: i32, subject: String, body: String) -> Self {
        NewMessage {
            sender_id: Some(sender_id),
            recipient_id,
            subject,
            body,
        }
    }

    pub fn system(recipient_id: i32, subject: String, body: String) -> Self {
        NewMessage {
            sender_id: None,
            recipient_id,
            subject,
            body,
        }
    }
}

#[derive(Deserialize)]
pub struct NewMessagePayload {
    pub subject: String,
    pub body: String,
}

#[derive(Serialize)]
pub struct MessageFeed {
    pub inbox: Vec<Message>,
    pub outbox: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_notices_carry_no_sender() {
        let notice = NewMessage::system(7, "subject".to_owned(), "body".to_owned());
        assert_eq!(notice.sender_id, None);
        assert_eq!(notice.recipient_id, 7);

        let direct = NewMessage::direct(3, 7, "subject".to_owned(), "body".to_owned());
        assert_eq!(direct.sender_id, Some(3));
    }
}
