//! The vendor registry, used to resolve expense vendor references to display
//! names.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorCategory {
    FoodSupplier,
    DrinkSupplier,
    Consumable,
    Service,
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub category: VendorCategory,
    pub is_active: bool,
}

/// Lookup access to vendors.
pub trait VendorStore: Send + Sync {
    fn find_by_id(&self, vendor_id: &str) -> Option<Vendor>;
}
