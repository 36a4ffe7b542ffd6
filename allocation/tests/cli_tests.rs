use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Projet jetable : un dossier temporaire, éventuellement avec un allocation.yaml.
struct ShopEnv {
    dir: TempDir,
}

impl ShopEnv {
    fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    fn with_config(yaml: &str) -> Result<Self> {
        let env = Self::new()?;
        fs::write(env.root().join("allocation.yaml"), yaml)?;
        Ok(env)
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn allocation(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("allocation"));
        cmd.args(args)
            .arg("--project-dir")
            .arg(self.root())
            .env_remove("ALLOCATION_STORE_PATH")
            .env_remove("ALLOCATION_MAX_MESSAGES");
        cmd
    }
}

#[test]
fn test_add_batch_allocate_and_query() -> Result<()> {
    let env = ShopEnv::new()?;

    env.allocation(&["add-batch", "--reference", "b1", "--sku", "LAMPE", "--qty", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch b1 added"));

    env.allocation(&["allocate", "--orderid", "o1", "--sku", "LAMPE", "--qty", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("o1 allocated to batch b1"));

    env.allocation(&["allocations", "--orderid", "o1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LAMPE").and(predicate::str::contains("b1")));

    assert!(env.root().join("target/allocation.json").exists());
    Ok(())
}

#[test]
fn test_allocate_unknown_sku_fails() -> Result<()> {
    let env = ShopEnv::new()?;

    env.allocation(&["allocate", "--orderid", "o1", "--sku", "FANTOME", "--qty", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid sku: FANTOME"));
    Ok(())
}

#[test]
fn test_change_quantity_reallocates() -> Result<()> {
    let env = ShopEnv::new()?;
    env.allocation(&["add-batch", "--reference", "b1", "--sku", "CHAISE", "--qty", "10"])
        .assert()
        .success();
    env.allocation(&[
        "add-batch", "--reference", "b2", "--sku", "CHAISE", "--qty", "10", "--eta", "2026-12-01",
    ])
    .assert()
    .success();
    env.allocation(&["allocate", "--orderid", "o1", "--sku", "CHAISE", "--qty", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("batch b1"));

    env.allocation(&["change-quantity", "--reference", "b1", "--qty", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reallocated to b2"));

    env.allocation(&["allocations", "--orderid", "o1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("b2").and(predicate::str::contains("b1").not()));
    Ok(())
}

#[test]
fn test_out_of_stock_is_written_to_jsonl_notifications() -> Result<()> {
    let env = ShopEnv::with_config(
        "notifications:\n  kind: jsonl\n  path: out/notifications.jsonl\n  out-of-stock-recipient: achats@example.com\n",
    )?;
    env.allocation(&["add-batch", "--reference", "b1", "--sku", "VASE", "--qty", "1"])
        .assert()
        .success();

    env.allocation(&["allocate", "--orderid", "o1", "--sku", "VASE", "--qty", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Out of stock"));

    let log = fs::read_to_string(env.root().join("out/notifications.jsonl"))?;
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("achats@example.com"));
    assert!(log.contains("VASE"));
    Ok(())
}

#[test]
fn test_store_path_env_override() -> Result<()> {
    let env = ShopEnv::new()?;
    let custom = env.root().join("elsewhere/state.json");

    env.allocation(&["add-batch", "--reference", "b1", "--sku", "TAPIS", "--qty", "5"])
        .env("ALLOCATION_STORE_PATH", &custom)
        .assert()
        .success();

    assert!(custom.exists());
    assert!(!env.root().join("target/allocation.json").exists());
    Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> Result<()> {
    let env = ShopEnv::with_config("bus:\n  max-messages: 0\n")?;

    env.allocation(&["allocations", "--orderid", "o1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
    Ok(())
}

#[test]
fn test_allocations_for_unknown_order() -> Result<()> {
    let env = ShopEnv::new()?;

    env.allocation(&["allocations", "--orderid", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No allocation for order nobody"));
    Ok(())
}
