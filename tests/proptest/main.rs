//! Property-based tests for the reconciliation core
//!
//! These verify that:
//! 1. The detector emits exactly one record per differing scalar field per
//!    matched component, for any pair of unique-named snapshots
//! 2. Classification is total and deterministic
//! 3. The quota gate never blocks an edit that shrinks every dimension

use proptest::prelude::*;

use db_console::crd::OperationKind;
use db_console::reconcile::detector::{
    COMPARED_FIELDS, ResourceField, ResourceSpec, classify, detect_changes,
};
use db_console::reconcile::quota::{QuotaItem, QuotaKind};
use db_console::reconcile::check_quota;

const COMPONENT_NAMES: [&str; 5] = ["mysql", "proxy", "sentinel", "exporter", "etcd"];

fn spec(name: &str, cpu: i64, memory: i64, replicas: i32, storage: i64) -> ResourceSpec {
    ResourceSpec {
        name: name.to_string(),
        cpu,
        memory,
        replicas,
        storage,
    }
}

/// Base allocation plus per-field change flags for one component.
type ComponentSeed = (i64, i64, i32, i64, bool, bool, bool, bool);

fn arb_seed() -> impl Strategy<Value = ComponentSeed> {
    (
        100i64..4000,
        256i64..8192,
        1i32..5,
        1i64..50,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
}

proptest! {
    #[test]
    fn one_record_per_differing_field(
        names in prop::sample::subsequence(COMPONENT_NAMES.to_vec(), 1..=COMPONENT_NAMES.len()),
        seeds in prop::collection::vec(arb_seed(), COMPONENT_NAMES.len()),
    ) {
        let mut live = Vec::new();
        let mut desired = Vec::new();
        let mut expected = 0usize;

        for (name, (cpu, memory, replicas, storage, d_cpu, d_mem, d_rep, d_sto)) in
            names.iter().zip(seeds)
        {
            live.push(spec(name, cpu, memory, replicas, storage));
            desired.push(spec(
                name,
                if d_cpu { cpu + 100 } else { cpu },
                if d_mem { memory + 256 } else { memory },
                if d_rep { replicas + 1 } else { replicas },
                if d_sto { storage + 1 } else { storage },
            ));
            expected += [d_cpu, d_mem, d_rep, d_sto].iter().filter(|d| **d).count();
        }

        let changes = detect_changes(&desired, &live);
        prop_assert_eq!(changes.records.len(), expected);
        prop_assert!(changes.unmatched.is_empty());
        for record in &changes.records {
            prop_assert!(names.contains(&record.component.as_str()));
        }
    }

    #[test]
    fn desired_only_components_yield_no_records(
        split in 1usize..COMPONENT_NAMES.len(),
        seeds in prop::collection::vec(arb_seed(), COMPONENT_NAMES.len()),
    ) {
        // Live holds the first `split` components, desired holds them all
        // unchanged; the extras surface only as unmatched.
        let specs: Vec<ResourceSpec> = COMPONENT_NAMES
            .iter()
            .zip(&seeds)
            .map(|(name, (cpu, memory, replicas, storage, ..))| {
                spec(name, *cpu, *memory, *replicas, *storage)
            })
            .collect();

        let live = &specs[..split];
        let changes = detect_changes(&specs, live);

        prop_assert!(changes.records.is_empty());
        let expected_unmatched: Vec<String> = COMPONENT_NAMES[split..]
            .iter()
            .map(|n| n.to_string())
            .collect();
        prop_assert_eq!(changes.unmatched, expected_unmatched);
    }

    #[test]
    fn quota_gate_passes_shrinking_edits(
        seeds in prop::collection::vec(arb_seed(), 1..=3),
        used in 0.0f64..100.0,
        headroom in 0.0f64..100.0,
    ) {
        let previous: Vec<ResourceSpec> = seeds
            .iter()
            .enumerate()
            .map(|(i, (cpu, memory, replicas, storage, ..))| {
                spec(COMPONENT_NAMES[i], *cpu, *memory, *replicas, *storage)
            })
            .collect();

        // Shrink every dimension of every component.
        let desired: Vec<ResourceSpec> = previous
            .iter()
            .map(|r| ResourceSpec {
                name: r.name.clone(),
                cpu: r.cpu / 2,
                memory: r.memory / 2,
                replicas: r.replicas,
                storage: (r.storage / 2).max(1).min(r.storage),
            })
            .collect();

        let quota = [
            QuotaItem { kind: QuotaKind::Cpu, used, limit: used + headroom },
            QuotaItem { kind: QuotaKind::Memory, used, limit: used + headroom },
            QuotaItem { kind: QuotaKind::Storage, used, limit: used + headroom },
        ];

        prop_assert_eq!(check_quota(&desired, Some(&previous), &quota), None);
    }
}

#[test]
fn classifier_is_total_and_deterministic() {
    for field in COMPARED_FIELDS {
        assert_eq!(classify(field), classify(field));
    }

    assert_eq!(classify(ResourceField::Cpu), OperationKind::VerticalScaling);
    assert_eq!(classify(ResourceField::Memory), OperationKind::VerticalScaling);
    assert_eq!(
        classify(ResourceField::Replicas),
        OperationKind::HorizontalScaling
    );
    assert_eq!(
        classify(ResourceField::Storage),
        OperationKind::VolumeExpansion
    );
}
