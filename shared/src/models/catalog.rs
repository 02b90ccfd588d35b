//! Catalog Models (menu dishes and combos)

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of purchasable a catalog entry (or cart line) refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    /// Single menu dish
    Menu,
    /// Bundled combo with its own price
    Combo,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => write!(f, "MENU"),
            Self::Combo => write!(f, "COMBO"),
        }
    }
}

/// Catalog entry as returned by the remote combo/menu fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub active: bool,
}
