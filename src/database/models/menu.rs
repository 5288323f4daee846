use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field-level patch for a menu item; absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub recipe: Option<String>,
}

impl MenuItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.recipe.is_none()
    }

    /// Applies the patch, reporting whether anything actually changed.
    pub fn apply(&self, item: &mut MenuItem) -> bool {
        let before = item.clone();
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(image) = &self.image {
            item.image = image.clone();
        }
        if let Some(recipe) = &self.recipe {
            item.recipe = Some(recipe.clone());
        }
        *item != before
    }
}
