//! Request and response bodies for the REST surface.

use crate::model::{ContractType, Item, LaundryStatus, LedgerEntry, Worker};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResp {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkerReq {
    pub dni: String,
    pub name: String,
    pub surname: String,
    pub contract_type: ContractType,
}

/// Worker lookup response; carries the contract-type default bundle so the
/// delivery screen can prefill its item list.
#[derive(Debug, Serialize)]
pub struct WorkerResp {
    pub dni: String,
    pub name: String,
    pub surname: String,
    pub contract_type: ContractType,
    pub default_items: Vec<Item>,
}

impl WorkerResp {
    pub fn from_worker(w: Worker) -> Self {
        let default_items = crate::catalog::default_bundle(w.contract_type);
        Self {
            dni: w.dni,
            name: w.name,
            surname: w.surname,
            contract_type: w.contract_type,
            default_items,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDeliveryReq {
    pub dni: String,
    pub items: Vec<Item>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateDeliveryResp {
    pub delivery_id: i64,
    pub acta_url: String,
}

/// Shipment key travels under three names across UI revisions; all are
/// accepted and mean the same thing.
#[derive(Debug, Deserialize)]
pub struct ShipmentReq {
    #[serde(alias = "dni", alias = "guide_number")]
    pub key: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct ShipmentResp {
    pub id: i64,
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct LedgerResp {
    pub entries: Vec<LedgerEntry>,
    pub status: LaundryStatus,
}

#[derive(Debug, Serialize)]
pub struct ReturnResp {
    pub accepted: Vec<Item>,
    pub status: LaundryStatus,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub dni: Option<String>,
    pub key: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl ReportQuery {
    /// Laundry reports filter on the shipment key; older screens pass it as
    /// `dni`, newer ones as `key`.
    pub fn shipment_key(&self) -> Option<&str> {
        self.key.as_deref().or(self.dni.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUniformReturnReq {
    pub dni: String,
    pub items: Vec<Item>,
    #[serde(default)]
    pub observations: String,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}
