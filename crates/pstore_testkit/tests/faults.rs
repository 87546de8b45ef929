//! Store failures surfacing through transactions.

use pstore_core::{CoreError, PStore};
use pstore_storage::StorageError;
use pstore_testkit::prelude::*;
use std::sync::Arc;

fn setup() -> (Arc<FaultyStore>, PStore) {
    init_tracing();
    let store = Arc::new(FaultyStore::new());
    let db = PStore::new(store.clone(), "faulty");
    (store, db)
}

fn is_injected(err: &CoreError) -> bool {
    matches!(err, CoreError::Storage(StorageError::Injected(_)))
}

fn keys(db: &PStore) -> Vec<String> {
    db.read_transaction(|ctx| ctx.keys::<String>())
        .unwrap()
        .into_value()
        .unwrap()
}

#[test]
fn failed_commit_propagates_and_rolls_back() {
    let (store, db) = setup();
    store.fail(FaultPoint::Commit);

    let result = db.transaction(|ctx| ctx.set("k", 1u32));
    assert!(is_injected(&result.unwrap_err()));
    assert_eq!(store.hits(FaultPoint::Commit), 1);
    assert!(store.inner().active_transactions().is_empty());
    assert!(!db.in_transaction());

    store.heal_all();
    assert!(keys(&db).is_empty());
}

#[test]
fn lost_commit_is_not_rolled_back_twice() {
    let (store, db) = setup();
    store.fail(FaultPoint::CommitLost);
    // Any rollback attempt on the closed transaction would show up here
    store.fail(FaultPoint::Rollback);

    let result = db.transaction(|ctx| ctx.set("k", 1u32));
    assert!(is_injected(&result.unwrap_err()));
    assert_eq!(store.hits(FaultPoint::Rollback), 0);
    assert!(store.inner().active_transactions().is_empty());
}

#[test]
fn failed_early_commit_propagates() {
    let (store, db) = setup();
    store.fail(FaultPoint::Commit);

    let result = db.transaction(|ctx| {
        ctx.set("k", 1u32)?;
        ctx.commit()?;
        Ok::<_, CoreError>(())
    });
    assert!(is_injected(&result.unwrap_err()));
    assert!(store.inner().active_transactions().is_empty());

    store.heal_all();
    assert!(keys(&db).is_empty());
}

#[test]
fn failed_put_aborts_transaction() {
    let (store, db) = setup();
    db.transaction(|ctx| ctx.set("before", 0u32)).unwrap();
    store.fail(FaultPoint::Put);

    let result = db.transaction(|ctx| {
        ctx.delete::<_, u32>("before")?;
        ctx.set("k", 1u32)?;
        Ok::<_, CoreError>(())
    });
    assert!(is_injected(&result.unwrap_err()));
    assert!(store.inner().active_transactions().is_empty());

    store.heal_all();
    assert_eq!(keys(&db), vec!["before"]);
}

#[test]
fn failed_query_surfaces_from_keys() {
    let (store, db) = setup();
    store.fail(FaultPoint::Query);

    let result = db.read_transaction(|ctx| ctx.keys::<String>());
    assert!(is_injected(&result.unwrap_err()));
    assert!(store.inner().active_transactions().is_empty());
}

#[test]
fn failed_get_surfaces_from_reads_but_not_overlay_hits() {
    let (store, db) = setup();
    store.fail(FaultPoint::Get);

    let outcome = db
        .transaction(|ctx| {
            ctx.set("k", 1u32)?;
            // Served from the transaction's own writes
            assert_eq!(ctx.get::<_, u32>("k")?, Some(1));
            let miss = ctx.get::<_, u32>("other");
            assert!(is_injected(&miss.unwrap_err()));
            Ok::<_, CoreError>(())
        })
        .unwrap();
    assert!(outcome.is_committed());
}

#[test]
fn failed_begin_skips_body() {
    let (store, db) = setup();
    store.fail(FaultPoint::Begin);

    let mut ran = false;
    let result = db.transaction(|_| {
        ran = true;
        Ok::<_, CoreError>(())
    });
    assert!(is_injected(&result.unwrap_err()));
    assert!(!ran);
    assert!(!db.in_transaction());
}

#[test]
fn failed_rollback_does_not_mask_body_error() {
    let (store, db) = setup();
    store.fail(FaultPoint::Rollback);

    let result = db.transaction(|ctx| {
        ctx.set("k", 1u32)?;
        Err::<(), _>(CoreError::UnknownKey)
    });
    assert!(matches!(result, Err(CoreError::UnknownKey)));
    assert!(!db.in_transaction());

    // The store kept the transaction it could not roll back
    assert_eq!(store.inner().active_transactions().len(), 1);
}

#[test]
fn failed_abort_propagates() {
    let (store, db) = setup();
    store.fail(FaultPoint::Rollback);

    let result = db.transaction(|ctx| {
        ctx.set("k", 1u32)?;
        ctx.abort()?;
        Ok::<_, CoreError>(())
    });
    assert!(is_injected(&result.unwrap_err()));
    assert!(!db.in_transaction());
}
