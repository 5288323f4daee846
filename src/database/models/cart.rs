use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Owner of the cart line
    #[serde(alias = "userEmail")]
    pub email: String,
    pub menu_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: Decimal,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
