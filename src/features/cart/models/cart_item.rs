use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a cart row
///
/// One row per (user, product) pair; adds to an existing pair increment
/// `quantity` instead of inserting a second row.
#[derive(Debug, Clone, FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}
