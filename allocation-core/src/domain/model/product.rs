// allocation-core/src/domain/model/product.rs

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::events::{Allocated, Deallocated, OutOfStock};
use crate::domain::message::Event;
use crate::domain::model::batch::{Batch, OrderLine};

/// Agrégat racine : tous les lots d'un SKU.
///
/// Frontière de cohérence : toute allocation passe par ici. L'agrégat
/// accumule ses events dans un buffer que le Unit of Work vide après chaque
/// étape transactionnelle (`take_events`).
#[derive(Debug, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub version_number: u64,
    // Transitoire : jamais persisté.
    #[serde(skip)]
    events: Vec<Box<dyn Event>>,
}

impl Product {
    pub fn new(sku: impl Into<String>, batches: Vec<Batch>) -> Self {
        Self {
            sku: sku.into(),
            batches,
            version_number: 0,
            events: Vec::new(),
        }
    }

    pub fn add_batch(&mut self, batch: Batch) {
        self.batches.push(batch);
        self.version_number += 1;
    }

    pub fn batch(&self, reference: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.reference == reference)
    }

    pub fn has_batch(&self, reference: &str) -> bool {
        self.batch(reference).is_some()
    }

    /// Alloue la ligne au lot le plus approprié et retourne sa référence.
    ///
    /// Stratégie : lots en stock (`eta = None`) d'abord, puis ETA croissante.
    /// À égalité, le premier lot ajouté gagne. `None` + `OutOfStock` si aucun
    /// lot ne peut accueillir la ligne.
    pub fn allocate(&mut self, line: OrderLine) -> Option<String> {
        // Option<NaiveDate> : None < Some(_), ce qui donne exactement l'ordre voulu.
        let chosen = self
            .batches
            .iter_mut()
            .filter(|batch| batch.can_allocate(&line))
            .min_by_key(|batch| batch.eta);

        let Some(batch) = chosen else {
            self.events.push(Box::new(OutOfStock {
                sku: line.sku.clone(),
            }));
            return None;
        };

        let batchref = batch.reference.clone();
        let allocated = Allocated {
            orderid: line.orderid.clone(),
            sku: line.sku.clone(),
            qty: line.qty,
            batchref: batchref.clone(),
        };
        batch.allocate(line);

        self.version_number += 1;
        self.events.push(Box::new(allocated));
        Some(batchref)
    }

    /// Modifie la quantité achetée d'un lot.
    /// Toute mutation de l'agrégat incrémente `version_number` (concurrence optimiste).
    /// Les lignes en excès sont désallouées une par une (`Deallocated` pour chacune).
    pub fn change_batch_quantity(&mut self, reference: &str, qty: i64) -> Result<(), DomainError> {
        let batch = self
            .batches
            .iter_mut()
            .find(|b| b.reference == reference)
            .ok_or_else(|| DomainError::UnknownBatch(reference.to_string()))?;

        batch.set_purchased_quantity(qty);
        self.version_number += 1;

        while batch.available_quantity() < 0 {
            let Some(line) = batch.deallocate_one() else {
                break;
            };
            self.events.push(Box::new(Deallocated {
                orderid: line.orderid,
                sku: line.sku,
                qty: line.qty,
            }));
        }

        Ok(())
    }

    pub fn events(&self) -> &[Box<dyn Event>] {
        &self.events
    }

    /// Vide le buffer d'events (transfert de propriété à l'appelant).
    pub fn take_events(&mut self) -> Vec<Box<dyn Event>> {
        std::mem::take(&mut self.events)
    }
}

// Un clone équivaut à un rechargement depuis le stockage : les events en attente
// ne font pas partie de l'état.
impl Clone for Product {
    fn clone(&self) -> Self {
        Self {
            sku: self.sku.clone(),
            batches: self.batches.clone(),
            version_number: self.version_number,
            events: Vec::new(),
        }
    }
}
