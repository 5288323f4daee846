pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use models::{
    AdminStats, CartItem, CategoryStats, DeleteResult, Document, InsertResult, MenuItem,
    MenuItemPatch, Payment, PaymentReceipt, Review, UpdateResult, User,
};

/// Errors from the document store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Stored document is unreadable: {0}")]
    Corrupt(String),

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, DatabaseError>;

/// Collections backing the API. Each call is a single, non-retried round trip
/// except `record_payment`, which is atomic across the payment insert and the
/// cart cleanup.
#[async_trait]
pub trait Store: Send + Sync {
    // users
    async fn list_users(&self) -> StoreResult<Vec<Document<User>>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<Document<User>>>;
    /// Inserts unless a user with the same email exists, in which case `None`.
    async fn insert_user_if_absent(&self, user: User) -> StoreResult<Option<Uuid>>;
    async fn promote_user(&self, id: Uuid) -> StoreResult<UpdateResult>;
    async fn delete_user(&self, id: Uuid) -> StoreResult<DeleteResult>;

    // menu
    async fn list_menu(&self) -> StoreResult<Vec<Document<MenuItem>>>;
    async fn find_menu_item(&self, id: Uuid) -> StoreResult<Option<Document<MenuItem>>>;
    async fn insert_menu_item(&self, item: MenuItem) -> StoreResult<InsertResult>;
    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> StoreResult<UpdateResult>;
    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<DeleteResult>;

    // reviews
    async fn list_reviews(&self) -> StoreResult<Vec<Document<Review>>>;

    // carts
    async fn list_carts(&self, owner: Option<&str>) -> StoreResult<Vec<Document<CartItem>>>;
    async fn insert_cart_item(&self, item: CartItem) -> StoreResult<InsertResult>;
    async fn delete_cart_item(&self, id: Uuid) -> StoreResult<DeleteResult>;

    // payments
    async fn record_payment(&self, payment: Payment) -> StoreResult<PaymentReceipt>;
    async fn list_payments_by_email(&self, email: &str) -> StoreResult<Vec<Document<Payment>>>;

    // analytics
    async fn admin_stats(&self) -> StoreResult<AdminStats>;
    async fn order_stats(&self) -> StoreResult<Vec<CategoryStats>>;

    // lifecycle
    async fn health_check(&self) -> StoreResult<()>;
    async fn close(&self);
}
