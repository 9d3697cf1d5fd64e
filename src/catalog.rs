//! Static contract-type → default delivery bundle table.
//!
//! These are the bundles proposed when a worker is looked up on the delivery
//! screen; the operator can edit the list before confirming, so the table is
//! only a starting point and never consulted again after that.

use crate::model::{ContractType, Item};

pub const UNIFORM_SET: &str = "Juego de Uniforme (Chaqueta, Pantalon, Polo, Polera)";

/// Default bundle for a contract type.
pub fn default_bundle(contract_type: ContractType) -> Vec<Item> {
    match contract_type {
        ContractType::RegularOtroSindicato => vec![
            Item::new(UNIFORM_SET, 2),
            Item::new("Jabones de tocador", 24),
            Item::new("Toallas", 2),
        ],
        ContractType::RegularPya => vec![
            Item::new(UNIFORM_SET, 3),
            Item::new("Jabones Bolivar", 24),
            Item::new("Jabones de tocador", 22),
            Item::new("Toallas", 2),
        ],
        ContractType::Temporal => vec![
            Item::new(UNIFORM_SET, 3),
            Item::new("Par de zapatos", 1),
            Item::new("Candado", 1),
            Item::new("Casillero", 1),
            Item::new("Jabones Bolivar", 2),
        ],
    }
}
