use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contract regimes a worker can be hired under. The regime decides the
/// default uniform bundle proposed at delivery time (see `catalog`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContractType {
    #[serde(rename = "Regular Otro sindicato")]
    RegularOtroSindicato,
    #[serde(rename = "Regular PYA")]
    RegularPya,
    #[serde(rename = "Temporal")]
    Temporal,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::RegularOtroSindicato => "Regular Otro sindicato",
            ContractType::RegularPya => "Regular PYA",
            ContractType::Temporal => "Temporal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Regular Otro sindicato" => Some(ContractType::RegularOtroSindicato),
            "Regular PYA" => Some(ContractType::RegularPya),
            "Temporal" => Some(ContractType::Temporal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub dni: String,
    pub name: String,
    pub surname: String,
    pub contract_type: ContractType,
    pub created_at: DateTime<Utc>,
}

/// A garment name with a quantity. Used for deliveries, laundry sends,
/// laundry returns and permanent uniform returns alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub qty: i64,
}

impl Item {
    pub fn new(name: impl Into<String>, qty: i64) -> Self {
        Self {
            name: name.into(),
            qty,
        }
    }
}

/// Aggregate state of a shipment, derived from its ledger entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LaundryStatus {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Parcial")]
    Partial,
    #[serde(rename = "Completado")]
    Complete,
}

impl LaundryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaundryStatus::Pending => "Pendiente",
            LaundryStatus::Partial => "Parcial",
            LaundryStatus::Complete => "Completado",
        }
    }
}

/// Per-garment sent/returned/pending counts for one shipment key.
/// Computed from the event log, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub name: String,
    pub sent: i64,
    pub returned: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    pub id: i64,
    pub dni: String,
    pub items: Vec<Item>,
    pub delivered_at: DateTime<Utc>,
    pub acta_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniformReturnRecord {
    pub id: i64,
    pub dni: String,
    pub items: Vec<Item>,
    pub observations: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the laundry report: a send event joined with the current
/// ledger-derived status of its shipment key.
#[derive(Debug, Clone, Serialize)]
pub struct LaundryReportRow {
    pub shipment_key: String,
    pub items: Vec<Item>,
    pub sent_at: DateTime<Utc>,
    pub status: LaundryStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReportRow {
    pub id: i64,
    pub dni: String,
    pub worker_name: String,
    pub items: Vec<Item>,
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniformReturnReportRow {
    pub id: i64,
    pub dni: String,
    pub worker_name: String,
    pub items: Vec<Item>,
    pub observations: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub users_count: i64,
    pub deliveries_count: i64,
    pub laundry_total_count: i64,
    pub laundry_active_count: i64,
}
