// db/chatdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::chatmodels::{Conversation, Message};

#[async_trait]
pub trait ConversationExt {
    /// Looks up the conversation between two users, in either participant
    /// order.
    async fn find_conversation_between(
        &self,
        user_one_id: Uuid,
        user_two_id: Uuid,
    ) -> Result<Option<Conversation>, Error>;

    async fn create_conversation(
        &self,
        user_one_id: Uuid,
        user_two_id: Uuid,
    ) -> Result<Conversation, Error>;

    async fn get_conversation_by_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Conversation>, Error>;

    async fn get_user_conversations(&self, user_id: Uuid) -> Result<Vec<Conversation>, Error>;

    async fn create_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: String,
    ) -> Result<Message, Error>;

    async fn get_conversation_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, Error>;
}

#[async_trait]
impl ConversationExt for DBClient {
    async fn find_conversation_between(
        &self,
        user_one_id: Uuid,
        user_two_id: Uuid,
    ) -> Result<Option<Conversation>, Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, participant_one_id, participant_two_id, created_at
            FROM conversations
            WHERE (participant_one_id = $1 AND participant_two_id = $2)
               OR (participant_one_id = $2 AND participant_two_id = $1)
            "#,
        )
        .bind(user_one_id)
        .bind(user_two_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_conversation(
        &self,
        user_one_id: Uuid,
        user_two_id: Uuid,
    ) -> Result<Conversation, Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (participant_one_id, participant_two_id)
            VALUES ($1, $2)
            RETURNING id, participant_one_id, participant_two_id, created_at
            "#,
        )
        .bind(user_one_id)
        .bind(user_two_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_conversation_by_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Conversation>, Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, participant_one_id, participant_two_id, created_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_conversations(&self, user_id: Uuid) -> Result<Vec<Conversation>, Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, participant_one_id, participant_two_id, created_at
            FROM conversations
            WHERE participant_one_id = $1 OR participant_two_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: String,
    ) -> Result<Message, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, conversation_id, sender_id, content, created_at
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_conversation_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
    }
}
