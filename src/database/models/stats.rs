use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: i64,
    pub menu_items: i64,
    pub orders: i64,
    pub revenue: Decimal,
}

/// Orders grouped by menu category. The category is the group key and goes
/// out as `_id`, which is what existing dashboard clients read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    #[serde(rename = "_id", alias = "category")]
    pub category: String,
    pub quantity: i64,
    pub revenue: Decimal,
}
