// allocation-core/src/domain/ports/repository.rs

// Abstraction "collection" sur la persistance des agrégats Product.
// Tout agrégat qui passe par add/get est marqué comme "vu" : c'est la liste
// que le Unit of Work parcourt pour récupérer les events émis.

use crate::domain::model::Product;

pub trait Repository: Send {
    fn add(&mut self, product: Product);

    fn get(&mut self, sku: &str) -> Option<&mut Product>;

    fn get_by_batchref(&mut self, reference: &str) -> Option<&mut Product>;

    /// SKUs des agrégats touchés depuis le dernier reset, dans l'ordre du premier accès.
    fn seen(&self) -> &[String];
}
