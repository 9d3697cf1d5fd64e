//! Row-shaped view models returned by the repositories. Items travel as JSON
//! text columns, so each view keeps the raw payload and decodes on demand.

use crate::error::Result;
use crate::model::Item;
use chrono::{DateTime, Utc};

/// One send or return event row from the laundry logs.
#[derive(Debug, Clone)]
pub struct EventRow {
    pub shipment_key: String,
    pub items_json: String,
    pub created_at: DateTime<Utc>,
}

impl EventRow {
    pub fn items(&self) -> Result<Vec<Item>> {
        Ok(serde_json::from_str(&self.items_json)?)
    }
}

/// Encode an item list for storage.
pub fn items_to_json(items: &[Item]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Decode a stored item list.
pub fn items_from_json(json: &str) -> Result<Vec<Item>> {
    Ok(serde_json::from_str(json)?)
}
