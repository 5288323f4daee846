use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::models::{
    AdminStats, CartItem, CategoryStats, DeleteResult, Document, InsertResult, MenuItem,
    MenuItemPatch, Payment, PaymentReceipt, Review, Role, UpdateResult, User,
};
use super::{DatabaseError, Store, StoreResult};

#[derive(Default)]
struct Collections {
    users: Vec<Document<User>>,
    menu: Vec<Document<MenuItem>>,
    reviews: Vec<Document<Review>>,
    carts: Vec<Document<CartItem>>,
    payments: Vec<Document<Payment>>,
}

/// Process-local store used by the `memory` backend and the test suite.
/// Every operation holds the lock for its whole duration, so multi-step
/// writes are atomic with respect to other requests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reviews have no write endpoint; this is how they get in.
    pub async fn insert_review(&self, review: Review) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.reviews.push(Document::new(id, review));
        id
    }
}

fn checked_sum(
    prices: impl IntoIterator<Item = Decimal>,
    what: &'static str,
) -> StoreResult<Decimal> {
    prices.into_iter().try_fold(Decimal::ZERO, |total, price| {
        total.checked_add(price).ok_or(DatabaseError::Overflow(what))
    })
}

fn remove_by_id<T>(docs: &mut Vec<Document<T>>, id: Uuid) -> DeleteResult {
    let before = docs.len();
    docs.retain(|doc| doc.id != id);
    DeleteResult::new((before - docs.len()) as u64)
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<Document<User>>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<Document<User>>> {
        let collections = self.inner.read().await;
        Ok(collections.users.iter().find(|u| u.body.email == email).cloned())
    }

    async fn insert_user_if_absent(&self, user: User) -> StoreResult<Option<Uuid>> {
        let mut collections = self.inner.write().await;
        if collections.users.iter().any(|u| u.body.email == user.email) {
            return Ok(None);
        }
        let id = Uuid::new_v4();
        collections.users.push(Document::new(id, user));
        Ok(Some(id))
    }

    async fn promote_user(&self, id: Uuid) -> StoreResult<UpdateResult> {
        let mut collections = self.inner.write().await;
        match collections.users.iter_mut().find(|u| u.id == id) {
            Some(user) if user.body.role == Role::Admin => Ok(UpdateResult::new(1, 0)),
            Some(user) => {
                user.body.role = Role::Admin;
                Ok(UpdateResult::new(1, 1))
            }
            None => Ok(UpdateResult::new(0, 0)),
        }
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<DeleteResult> {
        Ok(remove_by_id(&mut self.inner.write().await.users, id))
    }

    async fn list_menu(&self) -> StoreResult<Vec<Document<MenuItem>>> {
        Ok(self.inner.read().await.menu.clone())
    }

    async fn find_menu_item(&self, id: Uuid) -> StoreResult<Option<Document<MenuItem>>> {
        let collections = self.inner.read().await;
        Ok(collections.menu.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_menu_item(&self, item: MenuItem) -> StoreResult<InsertResult> {
        let id = Uuid::new_v4();
        self.inner.write().await.menu.push(Document::new(id, item));
        Ok(InsertResult::inserted(id))
    }

    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> StoreResult<UpdateResult> {
        let mut collections = self.inner.write().await;
        match collections.menu.iter_mut().find(|m| m.id == id) {
            Some(item) => {
                let modified = patch.apply(&mut item.body);
                Ok(UpdateResult::new(1, u64::from(modified)))
            }
            None => Ok(UpdateResult::new(0, 0)),
        }
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        Ok(remove_by_id(&mut self.inner.write().await.menu, id))
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Document<Review>>> {
        Ok(self.inner.read().await.reviews.clone())
    }

    async fn list_carts(&self, owner: Option<&str>) -> StoreResult<Vec<Document<CartItem>>> {
        let collections = self.inner.read().await;
        Ok(collections
            .carts
            .iter()
            .filter(|c| owner.map_or(true, |email| c.body.email == email))
            .cloned()
            .collect())
    }

    async fn insert_cart_item(&self, item: CartItem) -> StoreResult<InsertResult> {
        let id = Uuid::new_v4();
        self.inner.write().await.carts.push(Document::new(id, item));
        Ok(InsertResult::inserted(id))
    }

    async fn delete_cart_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        Ok(remove_by_id(&mut self.inner.write().await.carts, id))
    }

    async fn record_payment(&self, payment: Payment) -> StoreResult<PaymentReceipt> {
        let mut collections = self.inner.write().await;

        let doomed: HashSet<Uuid> = payment.cart_ids.iter().copied().collect();
        let id = Uuid::new_v4();
        collections.payments.push(Document::new(id, payment));

        let before = collections.carts.len();
        collections.carts.retain(|c| !doomed.contains(&c.id));
        let deleted = (before - collections.carts.len()) as u64;

        Ok(PaymentReceipt {
            payment_result: InsertResult::inserted(id),
            delete_result: DeleteResult::new(deleted),
        })
    }

    async fn list_payments_by_email(&self, email: &str) -> StoreResult<Vec<Document<Payment>>> {
        let collections = self.inner.read().await;
        Ok(collections
            .payments
            .iter()
            .filter(|p| p.body.email == email)
            .cloned()
            .collect())
    }

    async fn admin_stats(&self) -> StoreResult<AdminStats> {
        let collections = self.inner.read().await;
        Ok(AdminStats {
            users: collections.users.len() as i64,
            menu_items: collections.menu.len() as i64,
            orders: collections.payments.len() as i64,
            revenue: checked_sum(collections.payments.iter().map(|p| p.body.price), "revenue")?,
        })
    }

    async fn order_stats(&self) -> StoreResult<Vec<CategoryStats>> {
        let collections = self.inner.read().await;
        let menu: HashMap<Uuid, &MenuItem> =
            collections.menu.iter().map(|m| (m.id, &m.body)).collect();

        let mut groups: BTreeMap<&str, (i64, Decimal)> = BTreeMap::new();
        for payment in &collections.payments {
            for item in payment.body.menu_item_ids.iter().filter_map(|id| menu.get(id)) {
                let entry = groups.entry(item.category.as_str()).or_default();
                entry.0 += 1;
                entry.1 = entry
                    .1
                    .checked_add(item.price)
                    .ok_or(DatabaseError::Overflow("category revenue"))?;
            }
        }

        Ok(groups
            .into_iter()
            .map(|(category, (quantity, revenue))| CategoryStats {
                category: category.to_string(),
                quantity,
                revenue,
            })
            .collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        info!("Memory store dropped");
    }
}
