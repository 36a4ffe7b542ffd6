use allocation_core::application::{AllocationBus, bootstrap, bootstrap_from_config, views};
use allocation_core::domain::DomainError;
use allocation_core::domain::commands::{Allocate, ChangeBatchQuantity, CreateBatch};
use allocation_core::domain::configuration::{AppConfig, StoreKind};
use allocation_core::domain::ports::Repository;
use allocation_core::domain::read_model::AllocationRow;
use allocation_core::infrastructure::error::InfrastructureError;
use allocation_core::infrastructure::{MemoryStore, StoreUnitOfWork};
use allocation_core::ports::{AllocationUnitOfWork, Notifications, SnapshotStore};
use allocation_core::{AllocationError, BusError, Message};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

/// Capture les notifications au lieu de les envoyer.
#[derive(Default, Clone)]
struct FakeNotifications {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeNotifications {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifications for FakeNotifications {
    fn send(&self, destination: &str, message: &str) -> Result<(), AllocationError> {
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), message.to_string()));
        Ok(())
    }
}

struct BrokenNotifications;

impl Notifications for BrokenNotifications {
    fn send(&self, destination: &str, _message: &str) -> Result<(), AllocationError> {
        Err(InfrastructureError::Notification {
            destination: destination.to_string(),
            reason: "smtp down".to_string(),
        }
        .into())
    }
}

type TestBus = AllocationBus<StoreUnitOfWork<MemoryStore>>;

fn bus_with(notifications: Arc<dyn Notifications>, config: &AppConfig) -> Result<TestBus> {
    let uow = StoreUnitOfWork::open(MemoryStore::default())?;
    Ok(bootstrap(uow, notifications, config)?)
}

fn test_bus() -> Result<TestBus> {
    bus_with(Arc::new(FakeNotifications::default()), &AppConfig::default())
}

fn create_batch(reference: &str, sku: &str, qty: i64, eta: Option<NaiveDate>) -> Message {
    Message::command(CreateBatch {
        reference: reference.into(),
        sku: sku.into(),
        qty,
        eta,
    })
}

fn allocate(orderid: &str, sku: &str, qty: i64) -> Message {
    Message::command(Allocate {
        orderid: orderid.into(),
        sku: sku.into(),
        qty,
    })
}

fn change_quantity(reference: &str, qty: i64) -> Message {
    Message::command(ChangeBatchQuantity {
        reference: reference.into(),
        qty,
    })
}

// --- Commands ---

#[test]
fn test_add_batch_for_new_product() -> Result<()> {
    let mut bus = test_bus()?;

    bus.handle(create_batch("b1", "TABOURET-ROUGE", 100, None))?;

    let product = bus
        .uow_mut()
        .products()
        .get("TABOURET-ROUGE")
        .context("product should exist")?;
    assert_eq!(product.batches.len(), 1);
    assert_eq!(product.batches[0].reference, "b1");
    assert!(
        bus.uow()
            .store()
            .load()?
            .products
            .contains_key("TABOURET-ROUGE")
    );
    Ok(())
}

#[test]
fn test_add_batch_for_existing_product() -> Result<()> {
    let mut bus = test_bus()?;

    bus.handle(create_batch("b1", "LAMPE-GARDEN", 100, None))?;
    bus.handle(create_batch("b2", "LAMPE-GARDEN", 99, None))?;

    let product = bus
        .uow_mut()
        .products()
        .get("LAMPE-GARDEN")
        .context("product should exist")?;
    let refs: Vec<&str> = product.batches.iter().map(|b| b.reference.as_str()).collect();
    assert_eq!(refs, vec!["b1", "b2"]);
    Ok(())
}

#[test]
fn test_allocate_returns_batch_reference() -> Result<()> {
    let mut bus = test_bus()?;
    bus.handle(create_batch("b1", "LAMPE-DESIGN", 100, None))?;

    let results = bus.handle(allocate("o1", "LAMPE-DESIGN", 10))?;

    assert_eq!(results, vec![Some("b1".to_string())]);
    Ok(())
}

#[test]
fn test_allocate_prefers_earliest_shipment() -> Result<()> {
    let mut bus = test_bus()?;
    let today = NaiveDate::from_ymd_opt(2026, 3, 10).context("valid date")?;
    bus.handle(create_batch("slow", "MIROIR", 100, today.succ_opt()))?;
    bus.handle(create_batch("speedy", "MIROIR", 100, Some(today)))?;

    let results = bus.handle(allocate("o1", "MIROIR", 10))?;

    assert_eq!(results, vec![Some("speedy".to_string())]);
    Ok(())
}

#[test]
fn test_allocate_unknown_sku_is_an_error() -> Result<()> {
    let mut bus = test_bus()?;
    bus.handle(create_batch("b1", "AREALSKU", 100, None))?;

    let result = bus.handle(allocate("o1", "NONEXISTENTSKU", 10));

    assert!(matches!(
        result,
        Err(AllocationError::Domain(DomainError::InvalidSku(ref sku))) if sku == "NONEXISTENTSKU"
    ));
    Ok(())
}

#[test]
fn test_change_quantity_of_unknown_batch_is_an_error() -> Result<()> {
    let mut bus = test_bus()?;

    let result = bus.handle(change_quantity("ghost", 10));

    assert!(matches!(
        result,
        Err(AllocationError::Domain(DomainError::UnknownBatch(_)))
    ));
    Ok(())
}

#[test]
fn test_reducing_quantity_reallocates_excess_lines() -> Result<()> {
    let mut bus = test_bus()?;
    bus.handle(create_batch("lot-001", "CHAISE-BLEUE", 50, None))?;
    bus.handle(create_batch("lot-002", "CHAISE-BLEUE", 50, None))?;
    bus.handle(allocate("cmd-001", "CHAISE-BLEUE", 20))?;
    bus.handle(allocate("cmd-002", "CHAISE-BLEUE", 20))?;

    // 40 unités allouées sur lot-001, ramené à 25.
    let results = bus.handle(change_quantity("lot-001", 25))?;

    // ChangeBatchQuantity puis l'Allocate émis par `reallocate`.
    assert_eq!(results, vec![None, Some("lot-002".to_string())]);

    let product = bus
        .uow_mut()
        .products()
        .get("CHAISE-BLEUE")
        .context("product should exist")?;
    let allocated: Vec<i64> = product.batches.iter().map(|b| b.allocated_quantity()).collect();
    assert_eq!(allocated, vec![20, 20]);

    assert_eq!(
        views::allocations("cmd-002", bus.uow_mut())?,
        vec![AllocationRow {
            sku: "CHAISE-BLEUE".into(),
            batchref: "lot-002".into(),
        }]
    );
    Ok(())
}

// --- Events ---

#[test]
fn test_out_of_stock_sends_one_notification() -> Result<()> {
    let notifications = FakeNotifications::default();
    let mut bus = bus_with(Arc::new(notifications.clone()), &AppConfig::default())?;
    bus.handle(create_batch("b1", "LAMPE-RARE", 10, None))?;
    bus.handle(allocate("o1", "LAMPE-RARE", 10))?;

    let results = bus.handle(allocate("o2", "LAMPE-RARE", 1))?;

    assert_eq!(results, vec![None]);
    let sent = notifications.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "stock@example.com");
    assert!(sent[0].1.contains("LAMPE-RARE"));
    Ok(())
}

#[test]
fn test_recipient_comes_from_config() -> Result<()> {
    let notifications = FakeNotifications::default();
    let mut config = AppConfig::default();
    config.notifications.out_of_stock_recipient = "achats@example.com".into();
    let mut bus = bus_with(Arc::new(notifications.clone()), &config)?;
    bus.handle(create_batch("b1", "VASE", 1, None))?;

    bus.handle(allocate("o1", "VASE", 5))?;

    assert_eq!(notifications.sent()[0].0, "achats@example.com");
    Ok(())
}

#[test]
fn test_failing_notification_does_not_fail_allocation() -> Result<()> {
    let mut bus = bus_with(Arc::new(BrokenNotifications), &AppConfig::default())?;
    bus.handle(create_batch("b1", "VASE", 1, None))?;

    let results = bus.handle(allocate("o1", "VASE", 5))?;

    assert_eq!(results, vec![None]);
    Ok(())
}

#[test]
fn test_read_model_follows_allocations() -> Result<()> {
    let mut bus = test_bus()?;
    bus.handle(create_batch("b1", "TAPIS", 10, None))?;
    bus.handle(create_batch("b2", "COUSSIN", 10, None))?;

    bus.handle(allocate("o1", "TAPIS", 2))?;
    bus.handle(allocate("o1", "COUSSIN", 3))?;

    assert_eq!(
        views::allocations("o1", bus.uow_mut())?,
        vec![
            AllocationRow {
                sku: "TAPIS".into(),
                batchref: "b1".into(),
            },
            AllocationRow {
                sku: "COUSSIN".into(),
                batchref: "b2".into(),
            },
        ]
    );
    assert!(views::allocations("unknown", bus.uow_mut())?.is_empty());
    Ok(())
}

// --- Configuration du bus ---

#[test]
fn test_cascade_limit_from_config() -> Result<()> {
    let mut config = AppConfig::default();
    config.bus.max_messages = Some(2);
    let mut bus = bus_with(Arc::new(FakeNotifications::default()), &config)?;
    bus.handle(create_batch("b1", "HORLOGE", 10, None))?;
    bus.handle(create_batch("b2", "HORLOGE", 10, None))?;
    // Allocate + Allocated : pile à la limite.
    bus.handle(allocate("o1", "HORLOGE", 8))?;

    // ChangeBatchQuantity + Deallocated + Allocate + Allocated : au-delà.
    let result = bus.handle(change_quantity("b1", 1));

    assert!(matches!(
        result,
        Err(AllocationError::Bus(BusError::CascadeLimitExceeded { limit: 2 }))
    ));
    Ok(())
}

#[test]
fn test_state_survives_a_new_bus_with_json_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = AppConfig::default();
    config.store.kind = StoreKind::Json;

    {
        let mut bus = bootstrap_from_config(&config, dir.path())?;
        bus.handle(create_batch("b1", "ETAGERE", 10, None))?;
        bus.handle(allocate("o1", "ETAGERE", 4))?;
    }

    let mut bus = bootstrap_from_config(&config, dir.path())?;
    assert!(dir.path().join(&config.store.path).exists());
    assert_eq!(
        views::allocations("o1", bus.uow_mut())?,
        vec![AllocationRow {
            sku: "ETAGERE".into(),
            batchref: "b1".into(),
        }]
    );
    let results = bus.handle(allocate("o2", "ETAGERE", 6))?;
    assert_eq!(results, vec![Some("b1".to_string())]);
    Ok(())
}
