//! Property tests: random transaction histories against the reference model.

use proptest::prelude::*;
use pstore_core::{CoreError, PStore, TransactionContext, TransactionOutcome};
use pstore_testkit::prelude::*;

#[derive(Debug)]
enum ScriptError {
    Core(CoreError),
    Planned,
}

impl From<CoreError> for ScriptError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

fn execute(ctx: &mut TransactionContext<'_>, op: &Op) -> Result<Expected, CoreError> {
    Ok(match op {
        Op::Set(key, value) => Expected::Set(ctx.set(key.as_str(), *value)?),
        Op::Delete(key) => Expected::Delete(ctx.delete(key.as_str())?),
        Op::Get(key) => Expected::Get(ctx.get(key.as_str())?),
        Op::Contains(key) => Expected::Contains(ctx.contains(key.as_str())?),
        Op::Keys => {
            let mut keys: Vec<String> = ctx.keys()?;
            keys.sort();
            Expected::Keys(keys)
        }
    })
}

fn run_script(
    db: &PStore,
    script: &TxnScript,
) -> (Vec<Expected>, Result<TransactionOutcome<()>, ScriptError>) {
    let mut observed = Vec::new();
    let result = db.transaction(|ctx| {
        for op in &script.ops {
            observed.push(execute(ctx, op)?);
        }
        match script.end {
            TxnEnd::Return => {}
            TxnEnd::Commit => {
                ctx.commit()?;
            }
            TxnEnd::Abort => {
                ctx.abort()?;
            }
            TxnEnd::Fail => return Err(ScriptError::Planned),
        }
        Ok(())
    });
    (observed, result)
}

fn committed(db: &PStore) -> Vec<(String, i64)> {
    db.read_transaction(|ctx| {
        let keys: Vec<String> = ctx.keys()?;
        keys.into_iter()
            .map(|key| {
                let value: i64 = ctx.fetch(key.as_str())?;
                Ok::<_, CoreError>((key, value))
            })
            .collect::<Result<Vec<_>, _>>()
    })
    .unwrap()
    .into_value()
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn history_matches_model(history in history_strategy()) {
        init_tracing();
        let ns = TestNamespace::new();
        let mut model = NamespaceModel::new();

        for script in &history {
            let expected = model.run(script);
            let (observed, result) = run_script(&ns, script);
            prop_assert_eq!(observed, expected);

            match (script.end, result) {
                (TxnEnd::Return, Ok(TransactionOutcome::Completed(()))) => {}
                (TxnEnd::Commit, Ok(TransactionOutcome::CommittedEarly)) => {}
                (TxnEnd::Abort, Ok(TransactionOutcome::Aborted)) => {}
                (TxnEnd::Fail, Err(ScriptError::Planned)) => {}
                (_, Err(ScriptError::Core(err))) => {
                    prop_assert!(false, "unexpected error: {}", err);
                }
                (end, other) => prop_assert!(false, "{:?} ended with {:?}", end, other),
            }

            let expected_committed: Vec<(String, i64)> = model
                .keys()
                .into_iter()
                .map(|key| {
                    let value = model.get(&key).unwrap();
                    (key, value)
                })
                .collect();
            prop_assert_eq!(committed(&ns), expected_committed);
            prop_assert!(!ns.in_transaction());
        }
    }

    #[test]
    fn keys_never_repeat(script in txn_script_strategy()) {
        let ns = TestNamespace::new();
        ns.transaction(|ctx| {
            for op in &script.ops {
                execute(ctx, op)?;
                let keys: Vec<String> = ctx.keys()?;
                let mut unique = keys.clone();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), keys.len());
                assert_eq!(ctx.len()?, keys.len());
            }
            Ok::<_, CoreError>(())
        })
        .unwrap();
    }

    #[test]
    fn writes_are_visible_then_discarded_by_abort(
        key in key_strategy(),
        value in value_strategy(),
    ) {
        let ns = TestNamespace::new();
        let outcome = ns
            .transaction(|ctx| {
                ctx.set(key.as_str(), value)?;
                assert_eq!(ctx.get::<_, i64>(key.as_str())?, Some(value));
                assert!(ctx.contains(key.as_str())?);
                ctx.abort()?;
                Ok::<_, CoreError>(())
            })
            .unwrap();
        prop_assert!(outcome.is_aborted());
        prop_assert!(committed(&ns).is_empty());
    }

    #[test]
    fn sibling_namespaces_never_see_each_other(
        ops in proptest::collection::vec(op_strategy(), 0..24),
    ) {
        let ns = TestNamespace::named("left");
        let right = ns.sibling("right");

        ns.transaction(|ctx| {
            for op in &ops {
                execute(ctx, op)?;
            }
            Ok::<_, CoreError>(())
        })
        .unwrap();

        prop_assert!(committed(&right).is_empty());
    }
}
