// allocation-core/src/infrastructure/repository.rs

use std::collections::BTreeMap;

use crate::domain::Event;
use crate::domain::model::Product;
use crate::domain::ports::Repository;

/// Repository en mémoire, indexé par SKU, avec suivi des agrégats "vus".
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    products: BTreeMap<String, Product>,
    seen: Vec<String>,
}

impl InMemoryRepository {
    pub fn new(products: BTreeMap<String, Product>) -> Self {
        Self {
            products,
            seen: Vec::new(),
        }
    }

    /// Remplace tout le contenu (rechargement) et oublie les agrégats vus.
    pub fn replace(&mut self, products: BTreeMap<String, Product>) {
        self.products = products;
        self.seen.clear();
    }

    pub fn products(&self) -> &BTreeMap<String, Product> {
        &self.products
    }

    /// Vide les buffers d'events des agrégats vus, dans l'ordre du premier accès.
    pub fn drain_seen_events(&mut self) -> Vec<Box<dyn Event>> {
        let mut drained = Vec::new();
        for sku in &self.seen {
            if let Some(product) = self.products.get_mut(sku) {
                drained.extend(product.take_events());
            }
        }
        drained
    }

    fn mark_seen(&mut self, sku: &str) {
        if !self.seen.iter().any(|s| s == sku) {
            self.seen.push(sku.to_string());
        }
    }
}

impl Repository for InMemoryRepository {
    fn add(&mut self, product: Product) {
        let sku = product.sku.clone();
        self.mark_seen(&sku);
        self.products.insert(sku, product);
    }

    fn get(&mut self, sku: &str) -> Option<&mut Product> {
        if !self.products.contains_key(sku) {
            return None;
        }
        self.mark_seen(sku);
        self.products.get_mut(sku)
    }

    fn get_by_batchref(&mut self, reference: &str) -> Option<&mut Product> {
        let sku = self
            .products
            .values()
            .find(|product| product.has_batch(reference))
            .map(|product| product.sku.clone())?;
        self.get(&sku)
    }

    fn seen(&self) -> &[String] {
        &self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::OutOfStock;
    use crate::domain::model::{Batch, OrderLine};

    fn repo_with(skus: &[&str]) -> InMemoryRepository {
        let products = skus
            .iter()
            .map(|sku| (sku.to_string(), Product::new(*sku, vec![])))
            .collect();
        InMemoryRepository::new(products)
    }

    #[test]
    fn test_get_marks_seen_once() {
        let mut repo = repo_with(&["A", "B"]);

        repo.get("B");
        repo.get("A");
        repo.get("B");

        assert_eq!(repo.seen(), ["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_missing_product_is_not_seen() {
        let mut repo = InMemoryRepository::default();

        assert!(repo.get("NOPE").is_none());
        assert!(repo.seen().is_empty());
    }

    #[test]
    fn test_get_by_batchref() {
        let mut repo = InMemoryRepository::default();
        repo.add(Product::new("A", vec![Batch::new("b-a", "A", 10, None)]));
        repo.add(Product::new("B", vec![Batch::new("b-b", "B", 10, None)]));

        let found = repo.get_by_batchref("b-b").map(|p| p.sku.clone());

        assert_eq!(found.as_deref(), Some("B"));
        assert!(repo.get_by_batchref("unknown").is_none());
    }

    #[test]
    fn test_drain_seen_events_follows_seen_order() {
        let mut repo = repo_with(&["A", "B"]);

        if let Some(b) = repo.get("B") {
            b.allocate(OrderLine::new("o1", "B", 1));
        }
        if let Some(a) = repo.get("A") {
            a.allocate(OrderLine::new("o2", "A", 1));
        }

        let names: Vec<String> = repo
            .drain_seen_events()
            .iter()
            .filter_map(|e| e.downcast_ref::<OutOfStock>())
            .map(|e| e.sku.clone())
            .collect();
        assert_eq!(names, vec!["B".to_string(), "A".to_string()]);
        assert!(repo.drain_seen_events().is_empty());
    }
}
