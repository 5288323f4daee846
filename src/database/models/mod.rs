pub mod cart;
pub mod menu;
pub mod payment;
pub mod review;
pub mod stats;
pub mod user;

pub use cart::CartItem;
pub use menu::{MenuItem, MenuItemPatch};
pub use payment::Payment;
pub use review::Review;
pub use stats::{AdminStats, CategoryStats};
pub use user::{Role, User};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored record: the store-assigned `_id` next to the document's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Document<T> {
    pub fn new(id: Uuid, body: T) -> Self {
        Self { id, body }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: Option<Uuid>,
}

impl InsertResult {
    pub fn inserted(id: Uuid) -> Self {
        Self {
            acknowledged: true,
            inserted_id: Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Outcome of recording a payment: the new payment plus the pruned carts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment_result: InsertResult,
    pub delete_result: DeleteResult,
}
