use crate::domain::{models::wishlist::Wishlist, ports::WishlistRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresWishlistRepo {
    pool: PgPool,
}

impl PostgresWishlistRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistRepository for PostgresWishlistRepo {
    async fn create(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError> {
        sqlx::query_as::<_, Wishlist>(
            "INSERT INTO wishlists (id, user_id, title, content, share_uuid, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, user_id, title, content, share_uuid, created_at",
        )
            .bind(&wishlist.id)
            .bind(&wishlist.user_id)
            .bind(&wishlist.title)
            .bind(&wishlist.content)
            .bind(&wishlist.share_uuid)
            .bind(wishlist.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<Wishlist>, AppError> {
        sqlx::query_as::<_, Wishlist>(
            "SELECT id, user_id, title, content, share_uuid, created_at FROM wishlists WHERE user_id = $1 AND id = $2",
        )
            .bind(user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_share_uuid(&self, share_uuid: &str) -> Result<Option<Wishlist>, AppError> {
        sqlx::query_as::<_, Wishlist>(
            "SELECT id, user_id, title, content, share_uuid, created_at FROM wishlists WHERE share_uuid = $1",
        )
            .bind(share_uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Wishlist>, AppError> {
        sqlx::query_as::<_, Wishlist>(
            "SELECT id, user_id, title, content, share_uuid, created_at FROM wishlists WHERE user_id = $1 ORDER BY created_at DESC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError> {
        sqlx::query_as::<_, Wishlist>(
            "UPDATE wishlists SET title = $1, content = $2 WHERE id = $3 AND user_id = $4 RETURNING id, user_id, title, content, share_uuid, created_at",
        )
            .bind(&wishlist.title)
            .bind(&wishlist.content)
            .bind(&wishlist.id)
            .bind(&wishlist.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM wishlists WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Wishlist not found".into()));
        }
        Ok(())
    }
}
