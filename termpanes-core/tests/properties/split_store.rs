//! Property-based tests for the split group store
//!
//! Drives a store with generated operation sequences over a fixed pane
//! pool and checks the invariants every committed state must uphold:
//! ratio/pane array lengths match, no group has fewer than two panes, no
//! pane belongs to two groups, and the persisted blob restores to an
//! equivalent layout.

use std::rc::Rc;

use proptest::prelude::*;
use termpanes_core::split::{
    FocusDirection, GroupId, MemoryBackend, PaneId, RATIO_SUM_TOLERANCE, SplitDirection,
    SplitGroupStore, normalize,
};

// ============================================================================
// Test Strategies
// ============================================================================

const POOL_SIZE: usize = 8;

/// Deterministic pane pool shared by all generated operations.
fn pane_pool() -> Vec<PaneId> {
    (1..=POOL_SIZE as u128)
        .map(|seed| PaneId::from_uuid(uuid::Uuid::from_u128(seed)))
        .collect()
}

fn direction_strategy() -> impl Strategy<Value = SplitDirection> {
    prop_oneof![
        Just(SplitDirection::Horizontal),
        Just(SplitDirection::Vertical),
    ]
}

fn focus_direction_strategy() -> impl Strategy<Value = FocusDirection> {
    prop_oneof![
        Just(FocusDirection::Left),
        Just(FocusDirection::Right),
        Just(FocusDirection::Up),
        Just(FocusDirection::Down),
    ]
}

/// An operation the harness can apply to a store.
#[derive(Debug, Clone)]
enum StoreOperation {
    /// Split a pool pane, adding another pool pane next to it.
    Split {
        existing: usize,
        new_pane: usize,
        direction: SplitDirection,
    },
    /// Close a pool pane.
    Close { pane: usize },
    /// Overwrite one ratio of a tracked group.
    UpdateRatio {
        group_pick: usize,
        index: usize,
        value: f64,
    },
    /// Reset a tracked group to an equal split.
    ResetEqual { group_pick: usize },
    /// Change a tracked group's axis.
    ChangeDirection {
        group_pick: usize,
        direction: SplitDirection,
    },
    /// Reconcile against a subset of the pool, selected by bitmask.
    Reconcile { keep_mask: u8 },
    /// Focus a pool pane.
    SetFocus { pane: usize },
    /// Cycle focus forward.
    FocusNext,
    /// Cycle focus backward.
    FocusPrev,
    /// Move focus directionally.
    FocusDirectional { direction: FocusDirection },
}

fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    prop_oneof![
        (0..POOL_SIZE, 0..POOL_SIZE, direction_strategy()).prop_map(
            |(existing, new_pane, direction)| StoreOperation::Split {
                existing,
                new_pane,
                direction,
            }
        ),
        (0..POOL_SIZE).prop_map(|pane| StoreOperation::Close { pane }),
        (0usize..4, 0usize..6, 0.01f64..1.0).prop_map(|(group_pick, index, value)| {
            StoreOperation::UpdateRatio {
                group_pick,
                index,
                value,
            }
        }),
        (0usize..4).prop_map(|group_pick| StoreOperation::ResetEqual { group_pick }),
        (0usize..4, direction_strategy()).prop_map(|(group_pick, direction)| {
            StoreOperation::ChangeDirection {
                group_pick,
                direction,
            }
        }),
        any::<u8>().prop_map(|keep_mask| StoreOperation::Reconcile { keep_mask }),
        (0..POOL_SIZE).prop_map(|pane| StoreOperation::SetFocus { pane }),
        Just(StoreOperation::FocusNext),
        Just(StoreOperation::FocusPrev),
        focus_direction_strategy().prop_map(|direction| StoreOperation::FocusDirectional {
            direction
        }),
    ]
}

fn operations_strategy(max_ops: usize) -> impl Strategy<Value = Vec<StoreOperation>> {
    proptest::collection::vec(store_operation_strategy(), 0..=max_ops)
}

// ============================================================================
// Harness
// ============================================================================

/// Picks a tracked group deterministically, by sorted id.
fn pick_group(store: &SplitGroupStore, group_pick: usize) -> Option<GroupId> {
    let mut ids: Vec<_> = store.state().groups.keys().copied().collect();
    if ids.is_empty() {
        return None;
    }
    ids.sort_by_key(GroupId::as_uuid);
    Some(ids[group_pick % ids.len()])
}

/// Applies one operation; unsatisfiable picks degrade to no-ops, which
/// the store itself must also tolerate.
fn apply_operation(store: &mut SplitGroupStore, pool: &[PaneId], op: &StoreOperation) {
    match op {
        StoreOperation::Split {
            existing,
            new_pane,
            direction,
        } => {
            // The lifecycle collaborator never splits a pane with itself.
            if existing != new_pane {
                store.split_pane(pool[*existing], *direction, pool[*new_pane]);
            }
        }
        StoreOperation::Close { pane } => store.close_pane(pool[*pane]),
        StoreOperation::UpdateRatio {
            group_pick,
            index,
            value,
        } => {
            if let Some(group_id) = pick_group(store, *group_pick) {
                store.update_ratio(group_id, *index, *value);
            }
        }
        StoreOperation::ResetEqual { group_pick } => {
            if let Some(group_id) = pick_group(store, *group_pick) {
                store.reset_equal(group_id);
            }
        }
        StoreOperation::ChangeDirection {
            group_pick,
            direction,
        } => {
            if let Some(group_id) = pick_group(store, *group_pick) {
                store.change_direction(group_id, *direction);
            }
        }
        StoreOperation::Reconcile { keep_mask } => {
            let live: Vec<PaneId> = pool
                .iter()
                .enumerate()
                .filter(|(i, _)| keep_mask & (1 << i) != 0)
                .map(|(_, &id)| id)
                .collect();
            store.reconcile(&live);
        }
        StoreOperation::SetFocus { pane } => store.set_focused_pane(Some(pool[*pane])),
        StoreOperation::FocusNext => store.focus_next(),
        StoreOperation::FocusPrev => store.focus_prev(),
        StoreOperation::FocusDirectional { direction } => store.focus_directional(*direction),
    }
}

/// True for operations after which every group's ratio sum must hold.
///
/// `UpdateRatio` commits one half of a drag pair and the other
/// renormalizing mutations only touch their own group, so only a
/// reconcile pass guarantees the sum invariant store-wide.
const fn renormalizes_all(op: &StoreOperation) -> bool {
    matches!(op, StoreOperation::Reconcile { .. })
}

fn check_structural_invariants(store: &SplitGroupStore, check_sums: bool) {
    let state = store.state();
    let mut seen: Vec<PaneId> = Vec::new();

    for group in store.groups() {
        assert!(
            group.pane_ids.len() >= 2,
            "group {} has fewer than two panes",
            group.id
        );
        assert_eq!(
            group.ratios.len(),
            group.pane_ids.len(),
            "ratio array length diverged in group {}",
            group.id
        );
        assert!(group.parent_group_id.is_none());
        for ratio in &group.ratios {
            assert!(ratio.is_finite() && *ratio > 0.0, "bad ratio {ratio}");
        }
        if check_sums {
            let sum: f64 = group.ratios.iter().sum();
            assert!(
                (sum - 1.0).abs() < RATIO_SUM_TOLERANCE,
                "ratios of group {} sum to {sum}",
                group.id
            );
        }
        for pane in &group.pane_ids {
            assert!(!seen.contains(pane), "pane {pane} appears in two groups");
            seen.push(*pane);
        }
    }

    if let Some(active) = state.active_group_id {
        assert!(
            state.groups.contains_key(&active),
            "active pointer {active} dangles"
        );
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every committed state keeps the structural invariants: array
    /// lengths match, groups hold at least two panes, panes are unique
    /// across groups, and the active pointer resolves.
    #[test]
    fn prop_invariants_hold_after_every_operation(ops in operations_strategy(30)) {
        let pool = pane_pool();
        let mut store = SplitGroupStore::new(Box::new(MemoryBackend::new()), "prop-layout");

        for op in &ops {
            apply_operation(&mut store, &pool, op);
            check_structural_invariants(&store, renormalizes_all(op));
        }
    }

    /// Without direct ratio writes, every committed state keeps every
    /// group's ratios summing to one.
    #[test]
    fn prop_sums_hold_without_direct_ratio_writes(ops in operations_strategy(30)) {
        let pool = pane_pool();
        let mut store = SplitGroupStore::new(Box::new(MemoryBackend::new()), "prop-sums");

        for op in &ops {
            if matches!(op, StoreOperation::UpdateRatio { .. }) {
                continue;
            }
            apply_operation(&mut store, &pool, op);
            check_structural_invariants(&store, true);
        }
    }

    /// The focused pane, when it belongs to a group, is always present
    /// in that group, and focus navigation never invents a pane outside
    /// the pool.
    #[test]
    fn prop_focus_stays_within_tracked_panes(ops in operations_strategy(30)) {
        let pool = pane_pool();
        let mut store = SplitGroupStore::new(Box::new(MemoryBackend::new()), "prop-focus");

        for op in &ops {
            apply_operation(&mut store, &pool, op);
            if let Some(pane) = store.focused_pane() {
                prop_assert!(pool.contains(&pane));
                if let Some(group) = store.group_of_pane(pane) {
                    prop_assert!(group.contains(pane));
                }
            }
        }
    }

    /// A fresh store over the same backend restores an equivalent
    /// layout: same groups, pane order, and direction, with ratios
    /// renormalized and focus cleared.
    #[test]
    fn prop_restore_is_equivalent_modulo_normalization(ops in operations_strategy(30)) {
        let pool = pane_pool();
        let backend = Rc::new(MemoryBackend::new());
        let mut store = SplitGroupStore::new(Box::new(Rc::clone(&backend)), "prop-restore");

        for op in &ops {
            apply_operation(&mut store, &pool, op);
        }

        let restored = SplitGroupStore::new(Box::new(backend), "prop-restore");
        prop_assert_eq!(restored.state().groups.len(), store.state().groups.len());
        prop_assert_eq!(restored.focused_pane(), None);

        for (group_id, group) in &store.state().groups {
            let restored_group = restored.group(*group_id).expect("group should restore");
            prop_assert_eq!(&restored_group.pane_ids, &group.pane_ids);
            prop_assert_eq!(restored_group.direction, group.direction);
            let expected = normalize(&group.ratios);
            for (restored_ratio, expected_ratio) in
                restored_group.ratios.iter().zip(expected.iter())
            {
                prop_assert!((restored_ratio - expected_ratio).abs() < RATIO_SUM_TOLERANCE);
            }
        }
    }

    /// Reconciling against the pane set the store already tracks is a
    /// layout-preserving no-op, up to ratio renormalization.
    #[test]
    fn prop_reconcile_with_live_set_is_stable(ops in operations_strategy(20)) {
        let pool = pane_pool();
        let mut store = SplitGroupStore::new(Box::new(MemoryBackend::new()), "prop-reconcile");

        for op in &ops {
            apply_operation(&mut store, &pool, op);
        }

        let before: Vec<_> = store
            .state()
            .groups
            .values()
            .map(|g| (g.id, g.pane_ids.clone(), g.direction, normalize(&g.ratios)))
            .collect();

        store.reconcile(&pool);

        prop_assert_eq!(store.state().groups.len(), before.len());
        for (group_id, pane_ids, direction, ratios) in before {
            let group = store.group(group_id).expect("group should survive");
            prop_assert_eq!(&group.pane_ids, &pane_ids);
            prop_assert_eq!(group.direction, direction);
            for (after, expected) in group.ratios.iter().zip(ratios.iter()) {
                prop_assert!((after - expected).abs() < RATIO_SUM_TOLERANCE);
            }
        }
    }

    /// Cycling focus forward then backward returns to the same pane.
    #[test]
    fn prop_focus_next_prev_round_trips(ops in operations_strategy(20)) {
        let pool = pane_pool();
        let mut store = SplitGroupStore::new(Box::new(MemoryBackend::new()), "prop-cycle");

        for op in &ops {
            apply_operation(&mut store, &pool, op);
        }

        // Only meaningful when focus sits inside a group.
        if let Some(pane) = store.focused_pane()
            && store.group_of_pane(pane).is_some()
        {
            store.focus_next();
            store.focus_prev();
            prop_assert_eq!(store.focused_pane(), Some(pane));
        }
    }
}
