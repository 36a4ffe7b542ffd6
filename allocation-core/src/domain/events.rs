// allocation-core/src/domain/events.rs

// Les events sont des faits passés, immuables, nommés au passé.
// Ils portent tout ce dont leurs consommateurs ont besoin (aucune relecture en base).

use serde::{Deserialize, Serialize};

use crate::domain::message::Event;

/// Une ligne de commande a été allouée à un lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocated {
    pub orderid: String,
    pub sku: String,
    pub qty: i64,
    pub batchref: String,
}

/// Une ligne de commande a été désallouée de son lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deallocated {
    pub orderid: String,
    pub sku: String,
    pub qty: i64,
}

/// Plus aucun lot ne peut accueillir la ligne demandée pour ce SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfStock {
    pub sku: String,
}

impl Event for Allocated {}
impl Event for Deallocated {}
impl Event for OutOfStock {}
