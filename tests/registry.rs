use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    thread,
};

use cucumber_steps::{
    error::ConversionError, Handler, MatchOutcome, RegistryError, StepError,
    StepId, StepRegistry,
};
use derive_more::FromStr;
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Copy, Debug, FromStr)]
struct Cucumbers(u64);

#[test]
fn ids_are_strictly_increasing() {
    let mut registry = StepRegistry::new();

    let ids = (0..20)
        .map(|n| registry.register(&format!("^step {n}$"), Handler::noop()))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(ids.first(), Some(&StepId::FIRST));
    assert_eq!(registry.count(), 20);
}

#[test]
fn forced_ids_never_collide_with_assigned_ones() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut registry = StepRegistry::new();
    let mut used = BTreeSet::new();

    for n in 0..500 {
        let pattern = format!("^step {n}$");
        if rng.gen_bool(0.2) {
            let id = StepId::new(rng.gen_range(1..2_000));
            match registry.register_with_id(id, &pattern, Handler::noop()) {
                Ok(()) => assert!(used.insert(id), "{id} reused"),
                Err(RegistryError::DuplicateId { id: dup }) => {
                    assert_eq!(dup, id);
                    assert!(used.contains(&id));
                }
                Err(e) => panic!("unexpected error: {e}"),
            }
        } else {
            let id = registry.register(&pattern, Handler::noop()).unwrap();
            assert!(
                used.iter().all(|&u| u < id),
                "{id} is not greater than every id in use",
            );
            assert!(used.insert(id));
        }
    }

    assert_eq!(registry.count(), used.len());
}

#[test]
fn clear_forgets_all_steps() {
    let mut registry = StepRegistry::new();
    let ids = ["^a$", "^b$", "^c$"]
        .map(|re| registry.register(re, Handler::noop()).unwrap());

    registry.clear();

    assert_eq!(registry.count(), 0);
    for id in ids {
        assert!(registry.find_by_id(id).is_err());
    }
    assert_eq!(registry.find_by_pattern_text("^a$"), None);
    assert!(matches!(
        registry.matcher().resolve("a"),
        MatchOutcome::Undefined { .. },
    ));
}

#[test]
fn exact_text_lookup() {
    let mut registry = StepRegistry::new();
    let id = registry.register(r"^I am (\w+)$", Handler::noop()).unwrap();

    assert_eq!(registry.find_by_pattern_text(r"^I am (\w+)$"), Some(id));
    assert_eq!(registry.find_by_pattern_text(r"^I am (\d+)$"), None);
    assert_eq!(registry.find_by_pattern_text("I am happy"), None);
}

#[test]
fn same_pattern_twice_is_ambiguous() {
    init_tracing();
    let mut registry = StepRegistry::new();
    let first = registry.register(r"^I am (\w+)$", Handler::noop()).unwrap();
    let second = registry.register(r"^I am (\w+)$", Handler::noop()).unwrap();

    let MatchOutcome::Ambiguous(err) = registry.matcher().resolve("I am happy")
    else {
        panic!("expected ambiguous match");
    };

    assert_eq!(err.ids().collect::<Vec<_>>(), [first, second]);
    assert_eq!(first, StepId::new(1));
    assert_eq!(second, StepId::new(2));
    let message = err.to_string();
    assert!(message.contains(file!()), "no locations in: {message}");

    let err = registry.run_step("I am happy").unwrap_err();
    assert!(err.is_ambiguous());
}

#[test]
fn resolves_and_invokes_summing_step() {
    init_tracing();
    let sum = Arc::new(AtomicI64::new(0));
    let mut registry = StepRegistry::new();
    registry
        .register_with_id(StepId::new(1), "^a$", Handler::noop())
        .unwrap();
    registry
        .register_with_id(StepId::new(2), "^b$", Handler::noop())
        .unwrap();
    let add = registry
        .register(r"^I add (\d+) and (\d+)$", {
            let sum = Arc::clone(&sum);
            move |a: i64, b: i64| sum.store(a + b, Ordering::SeqCst)
        })
        .unwrap();
    assert_eq!(add, StepId::new(3));

    let (step, captures) =
        registry.matcher().resolve("I add 2 and 3").into_result().unwrap();
    assert_eq!(step.id(), StepId::new(3));
    assert_eq!(captures.values(), ["2", "3"]);

    cucumber_steps::Invoker::new().invoke(step, &captures).unwrap();
    assert_eq!(sum.load(Ordering::SeqCst), 5);
}

#[test]
fn verbose_pattern_with_trailing_comment() {
    let mut registry = StepRegistry::new();
    let id = registry
        .register(r"(?x)I \s am \s (\w+) # mood", Handler::noop())
        .unwrap();

    assert_eq!(registry.run_step("I am happy").unwrap(), id);
    assert!(registry.run_step("I am happy now").unwrap_err().is_undefined());
}

#[test]
fn undefined_step() {
    let mut registry = StepRegistry::new();
    assert!(registry.run_step("nonexistent step").unwrap_err().is_undefined());

    _ = registry.register(r"^I am (\w+)$", Handler::noop()).unwrap();
    let err = registry.run_step("nonexistent step").unwrap_err();

    assert!(err.is_undefined());
    assert_eq!(err.step_text(), Some("nonexistent step"));
}

#[test]
fn forced_id_then_register() {
    let mut registry = StepRegistry::new();

    registry
        .register_with_id(StepId::new(100), "^X$", Handler::noop())
        .unwrap();
    let id = registry.register("^Y$", Handler::noop()).unwrap();

    assert_ne!(id, StepId::new(100));
    assert_eq!(id, StepId::new(101));
    assert_eq!(registry.count(), 2);
}

#[test]
fn parameters_parsed_via_from_str() {
    let seen = Arc::new(AtomicI64::new(-1));
    let mut registry = StepRegistry::new();
    _ = registry
        .register(r"^I have (\d+|many) cucumbers$", {
            let seen = Arc::clone(&seen);
            move |c: Cucumbers| {
                seen.store(i64::try_from(c.0).unwrap(), Ordering::SeqCst);
            }
        })
        .unwrap();

    _ = registry.run_step("I have 42 cucumbers").unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 42);

    let err = registry.run_step("I have many cucumbers").unwrap_err();
    assert!(matches!(
        err,
        StepError::ArgumentConversion(ConversionError::Parse { ref value, .. })
            if value == "many",
    ));
    assert_eq!(seen.load(Ordering::SeqCst), 42);
}

#[test]
fn failing_steps_are_reported_not_propagated() {
    let mut registry = StepRegistry::new();
    let id = registry
        .register(r"^I expect (\d+) to be (\d+)$", |a: u32, b: u32| {
            assert_eq!(a, b, "values differ");
        })
        .unwrap();
    _ = registry
        .register("^I give up$", || Err::<(), _>("gave up"))
        .unwrap();

    _ = registry.run_step("I expect 1 to be 1").unwrap();

    let StepError::Invocation { id: failed, message, location } =
        registry.run_step("I expect 1 to be 2").unwrap_err()
    else {
        panic!("expected invocation error");
    };
    assert_eq!(failed, id);
    assert!(message.contains("values differ"));
    assert!(location.is_some());

    let err = registry.run_step("I give up").unwrap_err();
    assert_eq!(err.to_string(), "Step 2 failed: gave up");
}

#[test]
fn parallel_scenarios_share_registry() {
    let sum = Arc::new(AtomicI64::new(0));
    let mut registry = StepRegistry::new();
    _ = registry
        .register(r"^I add (\d+)$", {
            let sum = Arc::clone(&sum);
            move |n: i64| {
                _ = sum.fetch_add(n, Ordering::SeqCst);
            }
        })
        .unwrap();
    let registry = registry;

    thread::scope(|s| {
        for _ in 0..4 {
            _ = s.spawn(|| {
                for n in 1..=100 {
                    _ = registry.run_step(&format!("I add {n}")).unwrap();
                }
            });
        }
    });

    assert_eq!(sum.load(Ordering::SeqCst), 4 * 5050);
}
