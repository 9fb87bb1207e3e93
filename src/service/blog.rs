use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::Actor;
use crate::db::blog;
use crate::error::{Error, Result};

/// CRUD over blog records. Every operation re-derives authorization from
/// the acting identity; none trusts a client-supplied ownership claim.
#[derive(Clone)]
pub struct BlogService {
    db: DatabaseConnection,
}

impl BlogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        actor: Option<&Actor>,
        title: &str,
        link: &str,
        content: &str,
    ) -> Result<blog::Model> {
        let actor =
            actor.ok_or_else(|| Error::validation("an authenticated user is required"))?;
        if title.trim().is_empty() || link.trim().is_empty() || content.trim().is_empty() {
            return Err(Error::validation("title, link and content are all required"));
        }

        let record = blog::ActiveModel {
            user_id: Set(actor.id),
            youtube_title: Set(title.to_owned()),
            youtube_link: Set(link.to_owned()),
            generated_content: Set(content.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        log::info!(
            "created blog {} for user {}: {}",
            record.id,
            actor.username,
            record.youtube_title
        );
        Ok(record)
    }

    /// The actor's records, newest first. Empty for an absent actor.
    pub async fn list_for(&self, actor: Option<&Actor>) -> Result<Vec<blog::Model>> {
        let Some(actor) = actor else {
            log::warn!("attempted to list blogs without a signed-in user");
            return Ok(Vec::new());
        };

        let records = blog::Entity::find()
            .filter(blog::Column::UserId.eq(actor.id))
            .order_by_desc(blog::Column::CreatedAt)
            .order_by_desc(blog::Column::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    /// Fetches one record. Passing an actor asserts ownership; a mismatch
    /// is `PermissionDenied`. Pure read, no mutation.
    pub async fn get(&self, id: i32, actor: Option<&Actor>) -> Result<blog::Model> {
        let record = blog::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(Error::NotFound)?;

        if let Some(actor) = actor
            && record.user_id != actor.id
        {
            log::warn!(
                "user {} attempted to access blog {} owned by user {}",
                actor.username,
                id,
                record.user_id
            );
            return Err(Error::PermissionDenied);
        }

        Ok(record)
    }

    /// Removes a record. Ownership is re-checked here regardless of any
    /// earlier `get`.
    pub async fn delete(&self, id: i32, actor: Option<&Actor>) -> Result<()> {
        let Some(actor) = actor else {
            return Err(Error::PermissionDenied);
        };

        let record = blog::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(Error::NotFound)?;
        if record.user_id != actor.id {
            log::warn!(
                "user {} attempted to delete blog {} owned by user {}",
                actor.username,
                id,
                record.user_id
            );
            return Err(Error::PermissionDenied);
        }

        blog::Entity::delete_by_id(id).exec(&self.db).await?;
        log::info!(
            "user {} deleted blog {}: {}",
            actor.username,
            id,
            record.youtube_title
        );
        Ok(())
    }

    pub async fn count(&self, actor: Option<&Actor>) -> Result<u64> {
        let Some(actor) = actor else {
            return Ok(0);
        };
        let count = blog::Entity::find()
            .filter(blog::Column::UserId.eq(actor.id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Case-insensitive substring search over the actor's titles and
    /// contents, newest first. One OR-condition query, so each record
    /// appears at most once.
    pub async fn search(&self, actor: Option<&Actor>, query: &str) -> Result<Vec<blog::Model>> {
        let Some(actor) = actor else {
            return Ok(Vec::new());
        };
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let records = blog::Entity::find()
            .filter(blog::Column::UserId.eq(actor.id))
            .filter(
                Condition::any()
                    .add(blog::Column::YoutubeTitle.contains(query))
                    .add(blog::Column::GeneratedContent.contains(query)),
            )
            .order_by_desc(blog::Column::CreatedAt)
            .order_by_desc(blog::Column::Id)
            .all(&self.db)
            .await?;

        log::info!(
            "search '{}' for user {} returned {} results",
            query,
            actor.username,
            records.len()
        );
        Ok(records)
    }
}
