use crate::domain::{models::wishlist::Wishlist, ports::WishlistRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteWishlistRepo {
    pool: SqlitePool,
}

impl SqliteWishlistRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistRepository for SqliteWishlistRepo {
    async fn create(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError> {
        sqlx::query_as::<_, Wishlist>(
            "INSERT INTO wishlists (id, user_id, title, content, share_uuid, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
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
        sqlx::query_as::<_, Wishlist>("SELECT * FROM wishlists WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_share_uuid(&self, share_uuid: &str) -> Result<Option<Wishlist>, AppError> {
        sqlx::query_as::<_, Wishlist>("SELECT * FROM wishlists WHERE share_uuid = ?")
            .bind(share_uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Wishlist>, AppError> {
        sqlx::query_as::<_, Wishlist>("SELECT * FROM wishlists WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError> {
        sqlx::query_as::<_, Wishlist>(
            "UPDATE wishlists SET title = ?, content = ? WHERE id = ? AND user_id = ? RETURNING *",
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
        let result = sqlx::query("DELETE FROM wishlists WHERE id = ? AND user_id = ?")
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
