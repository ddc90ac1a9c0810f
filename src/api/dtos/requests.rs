use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
pub struct LinkTelegramRequest {
    pub connect_token: String,
    pub chat_id: i64,
}

#[derive(Deserialize)]
pub struct CreateWishlistRequest {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdateWishlistRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub target_count: i32,
}

#[derive(Deserialize, Default)]
pub struct WishlistChoice {
    pub wishlist_id: Option<String>,
    pub custom_wishlist: Option<String>,
}
