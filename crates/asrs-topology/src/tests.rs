//! Unit tests for asrs-topology.
//!
//! All tests build small racks in memory; no fixtures are needed.

#[cfg(test)]
mod helpers {
    use asrs_core::{TopologyMode, WarehouseConfig};

    /// Rack with 10 m aisles, 5 m levels, 1 m/s and 0.5 m/s² on both axes.
    pub fn config(aisles: u32, levels: u32) -> WarehouseConfig {
        WarehouseConfig {
            aisles,
            levels,
            aisle_length_m: 10.0,
            level_height_m: 5.0,
            speed_x:        1.0,
            speed_z:        1.0,
            accel_x:        0.5,
            accel_z:        0.5,
            mode:           TopologyMode::Grid,
        }
    }
}

// ── Graph structure ───────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use asrs_core::{NodeId, Slot, TopologyMode};

    use crate::{TopologyError, WarehouseGraphBuilder, build_warehouse};

    #[test]
    fn node_numbering() {
        let g = build_warehouse(&super::helpers::config(3, 4), None).unwrap();
        assert_eq!(g.node_count(), 13);
        assert_eq!(g.depot(), NodeId(12));
        assert_eq!(g.storage_node(Slot::new(2, 1)), Some(NodeId(9)));
        assert_eq!(g.slot_of(NodeId(9)), Some(Slot::new(2, 1)));
        assert_eq!(g.storage_node(Slot::new(3, 0)), None);
        assert_eq!(g.slot_of(g.depot()), None);
    }

    #[test]
    fn grid_edge_counts() {
        // 2×2: 2 vertical + 2 horizontal + 4 depot links, both directions.
        let g = build_warehouse(&super::helpers::config(2, 2), None).unwrap();
        assert_eq!(g.edge_count(), 16);

        // 3×3: 6 vertical + 4 horizontal + 6 depot links.
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        assert_eq!(g.edge_count(), 32);
    }

    #[test]
    fn middle_levels_have_no_transfer_or_depot_edges() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let mid = g.storage_node(Slot::new(1, 1)).unwrap();
        // Only up and down.
        assert_eq!(g.out_degree(mid), 2);
        assert!(g.edge_between(mid, g.depot()).is_none());
        let left = g.storage_node(Slot::new(0, 1)).unwrap();
        assert!(g.edge_between(mid, left).is_none());
    }

    #[test]
    fn single_level_rack_has_one_depot_link_per_aisle() {
        let g = build_warehouse(&super::helpers::config(3, 1), None).unwrap();
        assert_eq!(g.out_degree(g.depot()), 3);
    }

    #[test]
    fn direct_mode_links_every_slot_to_depot() {
        let mut cfg = super::helpers::config(3, 4);
        cfg.mode = TopologyMode::Direct;
        let g = build_warehouse(&cfg, None).unwrap();
        assert_eq!(g.out_degree(g.depot()), 12);
        for node in g.storage_nodes() {
            assert_eq!(g.out_degree(node), 1);
        }
    }

    #[test]
    fn weights_are_non_negative_and_loop_free() {
        let g = build_warehouse(&super::helpers::config(4, 5), None).unwrap();
        for e in 0..g.edge_count() {
            assert!(g.edge_secs[e] >= 0.0);
            assert_ne!(g.edge_from[e], g.edge_to[e]);
        }
    }

    #[test]
    fn self_loop_rejected() {
        let mut b = WarehouseGraphBuilder::new(2, 2);
        let a = b.storage_node(Slot::new(0, 0));
        assert!(matches!(b.add_directed_edge(a, a, 1.0, 1.0), Err(TopologyError::SelfLoop { .. })));
    }

    #[test]
    fn negative_or_nan_weight_rejected() {
        let mut b = WarehouseGraphBuilder::new(2, 2);
        let a = b.storage_node(Slot::new(0, 0));
        let c = b.storage_node(Slot::new(0, 1));
        assert!(matches!(b.add_directed_edge(a, c, -1.0, 1.0), Err(TopologyError::InvalidWeight { .. })));
        assert!(matches!(b.add_directed_edge(a, c, f64::NAN, 1.0), Err(TopologyError::InvalidWeight { .. })));
        assert_eq!(b.edge_count(), 0);
    }

    #[test]
    fn unknown_node_rejected() {
        let mut b = WarehouseGraphBuilder::new(2, 2);
        let a = b.storage_node(Slot::new(0, 0));
        assert!(matches!(
            b.add_directed_edge(a, NodeId(99), 1.0, 1.0),
            Err(TopologyError::NodeNotFound(NodeId(99)))
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = super::helpers::config(2, 2);
        cfg.speed_x = 0.0;
        assert!(matches!(build_warehouse(&cfg, None), Err(TopologyError::Config(_))));
    }

    #[test]
    fn rack_overflowing_node_ids_rejected_before_allocation() {
        let cfg = super::helpers::config(65_536, 65_536);
        assert!(matches!(build_warehouse(&cfg, None), Err(TopologyError::Config(_))));
    }

    #[test]
    fn builder_ids_saturate_instead_of_wrapping() {
        let b = WarehouseGraphBuilder::new(u32::MAX, 2);
        assert_eq!(b.depot(), NodeId(u32::MAX));
        assert_eq!(b.storage_node(Slot::new(u32::MAX - 1, 1)), NodeId(u32::MAX));
    }
}

// ── Connectivity ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod connectivity {
    use asrs_core::{Slot, TopologyMode};

    use crate::{DijkstraRouter, Router, BlockedNodes, TopologyError, WarehouseGraphBuilder, build_warehouse, validate_connectivity};

    #[test]
    fn every_slot_reaches_depot() {
        for mode in [TopologyMode::Grid, TopologyMode::Direct] {
            for (a, l) in [(1, 1), (1, 4), (5, 1), (6, 7)] {
                let mut cfg = super::helpers::config(a, l);
                cfg.mode = mode;
                let g = build_warehouse(&cfg, None).unwrap();
                let blocked = BlockedNodes::new();
                for node in g.storage_nodes() {
                    assert!(DijkstraRouter.route(&g, node, g.depot(), &blocked).is_ok());
                }
            }
        }
    }

    #[test]
    fn missing_edges_reported_as_disconnected() {
        let mut b = WarehouseGraphBuilder::new(2, 2);
        let depot = b.depot();
        let a = b.storage_node(Slot::new(0, 0));
        b.add_link(a, depot, 1.0, 1.0).unwrap();
        let g = b.build();
        match validate_connectivity(&g) {
            Err(TopologyError::Disconnected { slot }) => assert_eq!(slot, Slot::new(0, 1)),
            other => panic!("expected Disconnected, got {other:?}"),
        }
    }

    #[test]
    fn one_way_edge_toward_depot_is_enough() {
        let mut b = WarehouseGraphBuilder::new(1, 1);
        let depot = b.depot();
        let a = b.storage_node(Slot::new(0, 0));
        b.add_directed_edge(a, depot, 1.0, 1.0).unwrap();
        validate_connectivity(&b.build()).unwrap();
    }
}

// ── Heatmap ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod heatmap {
    use asrs_core::{SimRng, Slot};

    use crate::{DemandHeatmap, build_warehouse, depot_edge_secs};

    #[test]
    fn sampled_factors_in_range_and_reproducible() {
        let a = DemandHeatmap::sample(4, 3, &mut SimRng::new(9));
        let b = DemandHeatmap::sample(4, 3, &mut SimRng::new(9));
        assert_eq!(a, b);
        for aisle in 0..4 {
            for level in 0..3 {
                let f = a.factor(Slot::new(aisle, level));
                assert!((1.0..3.0).contains(&f));
            }
        }
    }

    #[test]
    fn outside_slots_default_to_one() {
        let h = DemandHeatmap::uniform(2, 2);
        assert_eq!(h.factor(Slot::new(5, 5)), 1.0);
    }

    #[test]
    fn factor_below_one_behaves_like_one() {
        let cfg = super::helpers::config(3, 3);
        let low  = DemandHeatmap::from_fn(3, 3, |_| 0.5);
        let unit = DemandHeatmap::uniform(3, 3);
        let g_low  = build_warehouse(&cfg, Some(&low)).unwrap();
        let g_unit = build_warehouse(&cfg, Some(&unit)).unwrap();
        assert_eq!(g_low.edge_secs, g_unit.edge_secs);
    }

    #[test]
    fn factor_scales_depot_edge() {
        let cfg = super::helpers::config(2, 2);
        let slot = Slot::new(1, 1);
        let mut h = DemandHeatmap::uniform(2, 2);
        assert!(h.set(slot, 2.0));
        let g = build_warehouse(&cfg, Some(&h)).unwrap();
        let node = g.storage_node(slot).unwrap();
        let e = g.edge_between(node, g.depot()).unwrap();
        let base = depot_edge_secs(&cfg, slot, 1.0);
        assert!((g.edge_secs[e.index()] - 2.0 * base).abs() < 1e-12);
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use asrs_core::{NodeId, Slot};
    use proptest::prelude::*;

    use crate::{
        BlockedNodes, DijkstraRouter, Router, TopologyError, build_warehouse, hop_distances,
        is_legal_path, route,
    };

    #[test]
    fn golden_travel_time_to_depot() {
        // 2 aisles × 2 levels.  (1,1) sits on the top boundary level with its
        // own depot edge: dx = 10·½ = 5 m, dz = 5·½ = 2.5 m at 0.5 m/s².
        let g = build_warehouse(&super::helpers::config(2, 2), None).unwrap();
        let from = g.storage_node(Slot::new(1, 1)).unwrap();
        let path = route(&g, from, g.depot(), &BlockedNodes::new()).unwrap();

        let expected = 2.0 * 5.0_f64.sqrt() + 2.0 * 2.5_f64.sqrt();
        assert!((path.total_secs - expected).abs() < 1e-9, "got {}", path.total_secs);
        assert_eq!(path.nodes, vec![from, g.depot()]);
        assert!((path.length_m - 7.5).abs() < 1e-12);
    }

    #[test]
    fn trivial_same_node() {
        let g = build_warehouse(&super::helpers::config(2, 2), None).unwrap();
        let p = route(&g, g.depot(), g.depot(), &BlockedNodes::new()).unwrap();
        assert!(p.is_trivial());
        assert_eq!(p.total_secs, 0.0);
        assert_eq!(p.hop_count(), 0);
    }

    #[test]
    fn middle_level_reached_by_lift() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let mid = g.storage_node(Slot::new(1, 1)).unwrap();
        let p = route(&g, g.depot(), mid, &BlockedNodes::new()).unwrap();
        assert_eq!(p.hop_count(), 2);
        assert!(is_legal_path(&g, &p.nodes));
    }

    #[test]
    fn blocked_node_forces_detour() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let mid    = g.storage_node(Slot::new(1, 1)).unwrap();
        let bottom = g.storage_node(Slot::new(1, 0)).unwrap();
        let top    = g.storage_node(Slot::new(1, 2)).unwrap();

        let open = route(&g, g.depot(), mid, &BlockedNodes::new()).unwrap();
        assert!(open.contains(bottom), "cheapest entry is from the bottom level");

        let blocked: BlockedNodes = [bottom].into_iter().collect();
        let detour = route(&g, g.depot(), mid, &blocked).unwrap();
        assert!(!detour.contains(bottom));
        assert!(detour.contains(top));
        assert!(detour.total_secs >= open.total_secs);
    }

    #[test]
    fn fully_blocked_target_has_no_path() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let mid = g.storage_node(Slot::new(1, 1)).unwrap();
        let blocked: BlockedNodes = [
            g.storage_node(Slot::new(1, 0)).unwrap(),
            g.storage_node(Slot::new(1, 2)).unwrap(),
        ]
        .into_iter()
        .collect();
        let err = route(&g, g.depot(), mid, &blocked).unwrap_err();
        assert!(matches!(err, TopologyError::NoPath { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn blocked_endpoint_has_no_path() {
        let g = build_warehouse(&super::helpers::config(2, 2), None).unwrap();
        let blocked: BlockedNodes = [g.depot()].into_iter().collect();
        let from = g.storage_node(Slot::new(0, 0)).unwrap();
        assert!(route(&g, from, g.depot(), &blocked).is_err());
    }

    #[test]
    fn shared_graph_untouched_by_blocking() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let edges_before = g.edge_secs.clone();
        let blocked: BlockedNodes = g.storage_nodes().take(4).collect();
        let _ = route(&g, g.depot(), NodeId(8), &blocked);
        assert_eq!(g.edge_secs, edges_before);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let g = build_warehouse(&super::helpers::config(2, 2), None).unwrap();
        assert!(matches!(
            route(&g, NodeId(50), g.depot(), &BlockedNodes::new()),
            Err(TopologyError::NodeNotFound(_))
        ));
    }

    #[test]
    fn hop_distances_count_edges() {
        let g = build_warehouse(&super::helpers::config(4, 3), None).unwrap();
        let blocked = BlockedNodes::new();
        let hops = hop_distances(&g, g.depot(), &blocked).unwrap();
        assert_eq!(hops[g.depot().index()], 0.0);
        for node in g.storage_nodes() {
            let p = route(&g, g.depot(), node, &blocked).unwrap();
            assert!(hops[node.index()] <= p.hop_count() as f64);
            assert!(hops[node.index()] >= 1.0);
        }
        // (0,1) sits between the two depot-linked boundary levels.
        let mid = g.storage_node(Slot::new(0, 1)).unwrap();
        assert_eq!(hops[mid.index()], 2.0);
    }

    #[test]
    fn hop_distances_respect_blocking() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let mid = g.storage_node(Slot::new(1, 1)).unwrap();
        let blocked: BlockedNodes = [mid].into_iter().collect();
        let hops = hop_distances(&g, g.depot(), &blocked).unwrap();
        assert!(hops[mid.index()].is_infinite());

        let from_blocked = hop_distances(&g, mid, &blocked).unwrap();
        assert!(from_blocked.iter().all(|d| d.is_infinite()));

        assert!(matches!(
            hop_distances(&g, NodeId(99), &blocked),
            Err(TopologyError::NodeNotFound(NodeId(99)))
        ));
    }

    #[test]
    fn distances_match_routes() {
        let g = build_warehouse(&super::helpers::config(4, 3), None).unwrap();
        let blocked = BlockedNodes::new();
        let dist = DijkstraRouter.distances_from(&g, g.depot(), &blocked).unwrap();
        for node in g.storage_nodes() {
            let p = route(&g, g.depot(), node, &blocked).unwrap();
            assert!((dist[node.index()] - p.total_secs).abs() < 1e-9);
        }
    }

    proptest! {
        #[test]
        fn routes_avoid_blocked_and_stay_legal(
            mask in proptest::collection::vec(any::<bool>(), 16),
            target in 0u32..16,
        ) {
            let g = build_warehouse(&super::helpers::config(4, 4), None).unwrap();
            let blocked: BlockedNodes = mask
                .iter()
                .enumerate()
                .filter(|&(i, &b)| b && i as u32 != target)
                .map(|(i, _)| NodeId(i as u32))
                .collect();
            if let Ok(p) = route(&g, g.depot(), NodeId(target), &blocked) {
                for n in &p.nodes {
                    prop_assert!(!blocked.contains(*n));
                }
                prop_assert!(is_legal_path(&g, &p.nodes));
            }
        }
    }
}

// ── Legality ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod legality {
    use asrs_core::Slot;

    use crate::{TopologyError, build_warehouse, validate_path};

    #[test]
    fn aisle_change_on_middle_level_is_illegal() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let a = g.storage_node(Slot::new(0, 1)).unwrap();
        let b = g.storage_node(Slot::new(1, 1)).unwrap();
        assert!(matches!(validate_path(&g, &[a, b]), Err(TopologyError::IllegalMove { .. })));
    }

    #[test]
    fn diagonal_is_illegal() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let a = g.storage_node(Slot::new(0, 0)).unwrap();
        let b = g.storage_node(Slot::new(1, 1)).unwrap();
        assert!(validate_path(&g, &[a, b]).is_err());
    }

    #[test]
    fn depot_hops_and_repeats_are_exempt() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let a = g.storage_node(Slot::new(0, 1)).unwrap();
        let b = g.storage_node(Slot::new(2, 1)).unwrap();
        validate_path(&g, &[a, g.depot(), b, b, g.depot()]).unwrap();
    }

    #[test]
    fn boundary_level_transfer_is_legal() {
        let g = build_warehouse(&super::helpers::config(3, 3), None).unwrap();
        let a = g.storage_node(Slot::new(0, 2)).unwrap();
        let b = g.storage_node(Slot::new(1, 2)).unwrap();
        validate_path(&g, &[a, b]).unwrap();
    }
}
