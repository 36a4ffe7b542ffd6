// allocation-core/src/domain/commands.rs

// Les commands sont des intentions : ce que le système doit faire.
// Elles peuvent échouer, et l'erreur revient à l'appelant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::message::Command;

/// Demande de création d'un nouveau lot de stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBatch {
    pub reference: String,
    pub sku: String,
    pub qty: i64,
    pub eta: Option<NaiveDate>,
}

/// Demande d'allocation d'une ligne de commande.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocate {
    pub orderid: String,
    pub sku: String,
    pub qty: i64,
}

/// Demande de modification de la quantité achetée d'un lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatchQuantity {
    pub reference: String,
    pub qty: i64,
}

impl Command for CreateBatch {}
impl Command for Allocate {}
impl Command for ChangeBatchQuantity {}
