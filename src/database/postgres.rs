use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{
    AdminStats, CartItem, CategoryStats, DeleteResult, Document, InsertResult, MenuItem,
    MenuItemPatch, Payment, PaymentReceipt, Review, UpdateResult, User,
};
use super::{DatabaseError, Store, StoreResult};
use crate::config::DatabaseConfig;

/// Tables created by `migrations/`; the only identifiers ever spliced into SQL.
#[derive(Debug, Clone, Copy)]
enum Collection {
    Users,
    Menu,
    Reviews,
    Carts,
    Payments,
}

impl Collection {
    fn table(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Menu => "menu",
            Collection::Reviews => "reviews",
            Collection::Carts => "carts",
            Collection::Payments => "payments",
        }
    }
}

/// PostgreSQL-backed document store: each collection is a table of
/// `(id UUID, doc JSONB)` rows.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to PostgreSQL (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    async fn fetch_all<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> StoreResult<Vec<Document<T>>> {
        let sql = format!(
            "SELECT id, doc FROM {} ORDER BY created_at, id",
            collection.table()
        );
        let rows: Vec<(Uuid, Value)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        decode_rows(collection, rows)
    }

    async fn fetch_by_id<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> StoreResult<Option<Document<T>>> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", collection.table());
        let row: Option<(Uuid, Value)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(id, doc)| decode(collection, id, doc)).transpose()
    }

    async fn insert<T: Serialize + Sync>(
        &self,
        collection: Collection,
        body: &T,
    ) -> StoreResult<InsertResult> {
        let id = Uuid::new_v4();
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.table());
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(body))
            .execute(&self.pool)
            .await?;
        debug!("Inserted {} into {}", id, collection.table());
        Ok(InsertResult::inserted(id))
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<DeleteResult> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
        let done = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(DeleteResult::new(done.rows_affected()))
    }
}

fn decode<T: DeserializeOwned>(collection: Collection, id: Uuid, doc: Value) -> StoreResult<Document<T>> {
    serde_json::from_value(doc)
        .map(|body| Document::new(id, body))
        .map_err(|e| DatabaseError::Corrupt(format!("{}/{}: {}", collection.table(), id, e)))
}

fn decode_rows<T: DeserializeOwned>(
    collection: Collection,
    rows: Vec<(Uuid, Value)>,
) -> StoreResult<Vec<Document<T>>> {
    rows.into_iter()
        .map(|(id, doc)| decode(collection, id, doc))
        .collect()
}

#[async_trait]
impl Store for PgStore {
    async fn list_users(&self) -> StoreResult<Vec<Document<User>>> {
        self.fetch_all(Collection::Users).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<Document<User>>> {
        let row: Option<(Uuid, Value)> =
            sqlx::query_as("SELECT id, doc FROM users WHERE doc->>'email' = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|(id, doc)| decode(Collection::Users, id, doc)).transpose()
    }

    async fn insert_user_if_absent(&self, user: User) -> StoreResult<Option<Uuid>> {
        // users_email_key turns a concurrent duplicate into a no-op
        let inserted: Option<(Uuid,)> = sqlx::query_as(
            "INSERT INTO users (id, doc) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(Json(&user))
        .fetch_optional(&self.pool)
        .await?;
        Ok(inserted.map(|(id,)| id))
    }

    async fn promote_user(&self, id: Uuid) -> StoreResult<UpdateResult> {
        let (matched, modified): (i64, i64) = sqlx::query_as(
            r#"
            WITH matched AS (
                SELECT id FROM users WHERE id = $1
            ), updated AS (
                UPDATE users SET doc = jsonb_set(doc, '{role}', '"admin"')
                WHERE id = $1 AND doc->>'role' IS DISTINCT FROM 'admin'
                RETURNING id
            )
            SELECT (SELECT COUNT(*) FROM matched), (SELECT COUNT(*) FROM updated)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(UpdateResult::new(matched as u64, modified as u64))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<DeleteResult> {
        self.delete(Collection::Users, id).await
    }

    async fn list_menu(&self) -> StoreResult<Vec<Document<MenuItem>>> {
        self.fetch_all(Collection::Menu).await
    }

    async fn find_menu_item(&self, id: Uuid) -> StoreResult<Option<Document<MenuItem>>> {
        self.fetch_by_id(Collection::Menu, id).await
    }

    async fn insert_menu_item(&self, item: MenuItem) -> StoreResult<InsertResult> {
        self.insert(Collection::Menu, &item).await
    }

    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> StoreResult<UpdateResult> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Value,)> = sqlx::query_as("SELECT doc FROM menu WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((doc,)) = row else {
            return Ok(UpdateResult::new(0, 0));
        };

        let mut item = decode::<MenuItem>(Collection::Menu, id, doc)?.body;
        if !patch.apply(&mut item) {
            return Ok(UpdateResult::new(1, 0));
        }

        sqlx::query("UPDATE menu SET doc = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(&item))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(UpdateResult::new(1, 1))
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        self.delete(Collection::Menu, id).await
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Document<Review>>> {
        self.fetch_all(Collection::Reviews).await
    }

    async fn list_carts(&self, owner: Option<&str>) -> StoreResult<Vec<Document<CartItem>>> {
        let rows: Vec<(Uuid, Value)> = sqlx::query_as(
            "SELECT id, doc FROM carts WHERE ($1::text IS NULL OR doc->>'email' = $1) ORDER BY created_at, id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        decode_rows(Collection::Carts, rows)
    }

    async fn insert_cart_item(&self, item: CartItem) -> StoreResult<InsertResult> {
        self.insert(Collection::Carts, &item).await
    }

    async fn delete_cart_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        self.delete(Collection::Carts, id).await
    }

    async fn record_payment(&self, payment: Payment) -> StoreResult<PaymentReceipt> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO payments (id, doc) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(&payment))
            .execute(&mut *tx)
            .await?;

        let pruned = sqlx::query("DELETE FROM carts WHERE id = ANY($1)")
            .bind(&payment.cart_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!("Recorded payment {} and pruned {} cart items", id, pruned.rows_affected());

        Ok(PaymentReceipt {
            payment_result: InsertResult::inserted(id),
            delete_result: DeleteResult::new(pruned.rows_affected()),
        })
    }

    async fn list_payments_by_email(&self, email: &str) -> StoreResult<Vec<Document<Payment>>> {
        let rows: Vec<(Uuid, Value)> = sqlx::query_as(
            "SELECT id, doc FROM payments WHERE doc->>'email' = $1 ORDER BY created_at, id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        decode_rows(Collection::Payments, rows)
    }

    async fn admin_stats(&self) -> StoreResult<AdminStats> {
        let (users, menu_items, orders, revenue): (i64, i64, i64, Decimal) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM menu),
                (SELECT COUNT(*) FROM payments),
                (SELECT COALESCE(SUM((doc->>'price')::numeric), 0) FROM payments)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AdminStats {
            users,
            menu_items,
            orders,
            revenue,
        })
    }

    async fn order_stats(&self) -> StoreResult<Vec<CategoryStats>> {
        let rows: Vec<(String, i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT
                COALESCE(m.doc->>'category', '') AS category,
                COUNT(*) AS quantity,
                COALESCE(SUM((m.doc->>'price')::numeric), 0) AS revenue
            FROM payments p
            CROSS JOIN LATERAL jsonb_array_elements_text(
                COALESCE(p.doc->'menuItemIds', '[]'::jsonb)
            ) AS item(id)
            JOIN menu m ON m.id::text = item.id
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, quantity, revenue)| CategoryStats {
                category,
                quantity,
                revenue,
            })
            .collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
