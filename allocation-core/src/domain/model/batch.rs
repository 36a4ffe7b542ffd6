// allocation-core/src/domain/model/batch.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value Object : une ligne de commande.
/// Égalité structurelle, deux lignes identiques sont interchangeables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    pub orderid: String,
    pub sku: String,
    pub qty: i64,
}

impl OrderLine {
    pub fn new(orderid: impl Into<String>, sku: impl Into<String>, qty: i64) -> Self {
        Self {
            orderid: orderid.into(),
            sku: sku.into(),
            qty,
        }
    }
}

/// Entité : un lot de stock, identifié par sa référence.
/// `eta = None` signifie "déjà en entrepôt".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub reference: String,
    pub sku: String,
    pub eta: Option<NaiveDate>,
    purchased_quantity: i64,
    // Ordre d'allocation conservé : deallocate_one() rend la plus récente.
    #[serde(default)]
    allocations: Vec<OrderLine>,
}

impl Batch {
    pub fn new(
        reference: impl Into<String>,
        sku: impl Into<String>,
        qty: i64,
        eta: Option<NaiveDate>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            eta,
            purchased_quantity: qty,
            allocations: Vec::new(),
        }
    }

    pub fn purchased_quantity(&self) -> i64 {
        self.purchased_quantity
    }

    pub fn allocated_quantity(&self) -> i64 {
        self.allocations.iter().map(|line| line.qty).sum()
    }

    pub fn available_quantity(&self) -> i64 {
        self.purchased_quantity - self.allocated_quantity()
    }

    pub fn allocations(&self) -> &[OrderLine] {
        &self.allocations
    }

    pub fn can_allocate(&self, line: &OrderLine) -> bool {
        self.sku == line.sku && self.available_quantity() >= line.qty
    }

    /// Idempotent : une ligne déjà allouée n'est pas comptée deux fois.
    pub fn allocate(&mut self, line: OrderLine) {
        if self.can_allocate(&line) && !self.allocations.contains(&line) {
            self.allocations.push(line);
        }
    }

    pub fn deallocate(&mut self, line: &OrderLine) {
        self.allocations.retain(|allocated| allocated != line);
    }

    pub fn deallocate_one(&mut self) -> Option<OrderLine> {
        self.allocations.pop()
    }

    pub(crate) fn set_purchased_quantity(&mut self, qty: i64) {
        self.purchased_quantity = qty;
    }
}

// Identité = référence (entité), pas les attributs.
impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for Batch {}
