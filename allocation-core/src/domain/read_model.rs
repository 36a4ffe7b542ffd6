// allocation-core/src/domain/read_model.rs

// Côté Query de CQRS : une table dénormalisée orderid -> (sku, batchref),
// maintenue par les handlers d'events, lue sans passer par le domaine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub sku: String,
    pub batchref: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationsView {
    #[serde(default)]
    rows: BTreeMap<String, Vec<AllocationRow>>,
}

impl AllocationsView {
    pub fn insert(&mut self, orderid: &str, sku: &str, batchref: &str) {
        let rows = self.rows.entry(orderid.to_string()).or_default();
        let row = AllocationRow {
            sku: sku.to_string(),
            batchref: batchref.to_string(),
        };
        if !rows.contains(&row) {
            rows.push(row);
        }
    }

    pub fn remove(&mut self, orderid: &str, sku: &str) {
        if let Some(rows) = self.rows.get_mut(orderid) {
            rows.retain(|row| row.sku != sku);
            if rows.is_empty() {
                self.rows.remove(orderid);
            }
        }
    }

    /// Rejoue sur `self` les lignes ajoutées ou retirées entre `base` et `local`.
    ///
    /// Les lignes que `local` n'a pas touchées restent telles quelles dans `self`,
    /// même si un autre processus les a modifiées entre-temps.
    pub fn apply_changes(&mut self, base: &AllocationsView, local: &AllocationsView) {
        let none = Vec::new();
        for (orderid, rows) in &base.rows {
            let kept = local.rows.get(orderid).unwrap_or(&none);
            for row in rows.iter().filter(|row| !kept.contains(row)) {
                self.remove_row(orderid, row);
            }
        }
        for (orderid, rows) in &local.rows {
            let known = base.rows.get(orderid).unwrap_or(&none);
            for row in rows.iter().filter(|row| !known.contains(row)) {
                self.insert(orderid, &row.sku, &row.batchref);
            }
        }
    }

    fn remove_row(&mut self, orderid: &str, row: &AllocationRow) {
        if let Some(rows) = self.rows.get_mut(orderid) {
            rows.retain(|r| r != row);
            if rows.is_empty() {
                self.rows.remove(orderid);
            }
        }
    }

    pub fn for_order(&self, orderid: &str) -> Vec<AllocationRow> {
        self.rows.get(orderid).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
