//! Unit tests for asrs-sim.

#[cfg(test)]
mod helpers {
    use asrs_core::{AssignmentPolicy, NodeId, OrderId, SimConfig, TopologyMode};
    use asrs_orders::Order;
    use asrs_topology::{DijkstraRouter, WarehouseGraph, build_warehouse};

    use crate::{Sim, SimBuilder};

    pub fn config(aisles: u32, levels: u32, robots: u32, policy: AssignmentPolicy) -> SimConfig {
        let mut cfg = SimConfig::default();
        cfg.warehouse.aisles         = aisles;
        cfg.warehouse.levels         = levels;
        cfg.warehouse.aisle_length_m = 10.0;
        cfg.warehouse.level_height_m = 5.0;
        cfg.warehouse.mode           = TopologyMode::Grid;
        cfg.fleet.robot_count        = robots;
        cfg.fleet.extraction_secs    = 2.0;
        cfg.fleet.policy             = policy;
        cfg.workload.demand_heatmap  = false;
        cfg
    }

    pub fn graph(cfg: &SimConfig) -> WarehouseGraph {
        build_warehouse(&cfg.warehouse, None).unwrap()
    }

    pub fn orders(graph: &WarehouseGraph, targets: &[u32]) -> Vec<Order> {
        targets
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let target = NodeId(n);
                Order::new(OrderId(i as u32), target, graph.slot_of(target).unwrap())
            })
            .collect()
    }

    pub fn sim(cfg: SimConfig, targets: &[u32]) -> Sim<DijkstraRouter> {
        let g = graph(&cfg);
        let orders = orders(&g, targets);
        SimBuilder::new(cfg, g, DijkstraRouter).orders(orders).build().unwrap()
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use asrs_core::{AssignmentPolicy, CoreError, NodeId};
    use asrs_orders::{BatchPlan, SkippedOrder};
    use asrs_topology::{BlockedNodes, DijkstraRouter};

    use crate::{IssueKind, NoopObserver, SimBuilder, SimError};

    #[test]
    fn zero_robots_rejected() {
        let mut cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let g = super::helpers::graph(&cfg);
        cfg.fleet.robot_count = 0;
        let err = SimBuilder::new(cfg, g, DijkstraRouter).build().err().unwrap();
        assert!(matches!(
            err,
            SimError::Config(CoreError::InvalidConfig { field: "fleet.robot_count", .. })
        ));
    }

    #[test]
    fn zero_batch_size_rejected() {
        let mut cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let g = super::helpers::graph(&cfg);
        cfg.workload.batch_size = 0;
        let err = SimBuilder::new(cfg, g, DijkstraRouter).build().err().unwrap();
        assert!(matches!(
            err,
            SimError::Config(CoreError::InvalidConfig { field: "workload.batch_size", .. })
        ));
    }

    #[test]
    fn unknown_blocked_node_rejected() {
        let cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let g = super::helpers::graph(&cfg);
        let blocked: BlockedNodes = [NodeId(99)].into_iter().collect();
        let err = SimBuilder::new(cfg, g, DijkstraRouter).blocked(blocked).build().err().unwrap();
        assert!(matches!(err, SimError::Topology(_)));
    }

    #[test]
    fn empty_run_logs_no_orders() {
        let cfg = super::helpers::config(2, 2, 2, AssignmentPolicy::RoundRobin);
        let g = super::helpers::graph(&cfg);
        let mut sim = SimBuilder::new(cfg, g, DijkstraRouter).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.records().is_empty());
        assert_eq!(sim.issues().len(), 1);
        assert_eq!(sim.issues()[0].kind, IssueKind::NoOrders);
    }

    #[test]
    fn unbatched_orders_become_issues() {
        let cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let g = super::helpers::graph(&cfg);
        let orders = super::helpers::orders(&g, &[0, 3]);
        let mut plan = BatchPlan::singletons(vec![orders[0]]);
        plan.skipped.push(SkippedOrder { order: orders[1], anchor: NodeId(0) });

        let mut sim = SimBuilder::new(cfg, g, DijkstraRouter).plan(plan).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.records().len(), 1);
        assert_eq!(sim.issues().len(), 1);
        assert_eq!(sim.issues()[0].kind, IssueKind::Unbatched);
        assert_eq!(sim.issues()[0].order, Some(orders[1].id));
    }
}

// ── Timing ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod timing {
    use asrs_core::{AssignmentPolicy, NodeId, TopologyMode};
    use asrs_topology::{BlockedNodes, DijkstraRouter, Router};

    use crate::NoopObserver;

    #[test]
    fn single_robot_single_order() {
        let cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let g = super::helpers::graph(&cfg);
        let depot = g.depot();
        let target = NodeId(3);
        let none = BlockedNodes::new();
        let out  = DijkstraRouter.route(&g, depot, target, &none).unwrap();
        let back = DijkstraRouter.route(&g, target, depot, &none).unwrap();

        let mut sim = super::helpers::sim(cfg, &[3]);
        sim.run(&mut NoopObserver).unwrap();
        let r = sim.records()[0];

        assert_eq!(r.overlap_count, 0);
        assert_eq!(r.delay_secs, 0.0);
        assert_eq!(r.start_node, depot);
        assert!((r.travel_secs - (out.total_secs + back.total_secs + 2.0)).abs() < 1e-9);
        assert!((r.distance_m - (out.length_m + back.length_m)).abs() < 1e-9);
        assert_eq!(r.total_secs, r.travel_secs);
        assert_eq!(r.dispatched_at, 0.0);
        assert!((r.completed_at - r.total_secs).abs() < 1e-9);
        assert!((r.movement_secs() - (out.total_secs + back.total_secs)).abs() < 1e-9);
    }

    #[test]
    fn traffic_scales_movement_not_extraction() {
        let mut cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let mut base = super::helpers::sim(cfg.clone(), &[3]);
        base.run(&mut NoopObserver).unwrap();
        cfg.workload.traffic_multiplier = 2.0;
        let mut slow = super::helpers::sim(cfg, &[3]);
        slow.run(&mut NoopObserver).unwrap();

        let b = base.records()[0];
        let s = slow.records()[0];
        assert!((s.movement_secs() - 2.0 * b.movement_secs()).abs() < 1e-9);
        assert_eq!(s.extraction_secs, b.extraction_secs);
    }

    #[test]
    fn traffic_below_one_is_floored() {
        let mut cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let mut base = super::helpers::sim(cfg.clone(), &[3]);
        base.run(&mut NoopObserver).unwrap();
        cfg.workload.traffic_multiplier = 0.5;
        let mut low = super::helpers::sim(cfg, &[3]);
        low.run(&mut NoopObserver).unwrap();
        assert_eq!(low.records()[0].travel_secs, base.records()[0].travel_secs);
    }

    #[test]
    fn direct_mode_counts_path_nodes() {
        let mut cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        cfg.warehouse.mode = TopologyMode::Direct;
        cfg.workload.traffic_multiplier = 2.0;
        let mut sim = super::helpers::sim(cfg, &[3]);
        sim.run(&mut NoopObserver).unwrap();
        // depot → slot and slot → depot: two nodes each.
        assert!((sim.records()[0].travel_secs - (4.0 * 2.0 + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn single_robot_runs_back_to_back() {
        let cfg = super::helpers::config(3, 3, 1, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[4, 8, 4]);
        sim.run(&mut NoopObserver).unwrap();
        let rs = sim.records();
        for pair in rs.windows(2) {
            assert!((pair[1].dispatched_at - pair[0].completed_at).abs() < 1e-9);
        }
        assert!(rs.iter().all(|r| r.overlap_count == 0 && r.delay_secs == 0.0));
        assert!((sim.fleet().horizon() - rs[2].completed_at).abs() < 1e-9);
    }

    #[test]
    fn dispatch_times_never_decrease() {
        let cfg = super::helpers::config(3, 3, 3, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[8, 0, 4, 2, 6, 8, 1, 7]);
        sim.run(&mut NoopObserver).unwrap();
        for pair in sim.records().windows(2) {
            assert!(pair[1].dispatched_at >= pair[0].dispatched_at);
        }
        for r in sim.records() {
            assert!((r.completed_at - r.dispatched_at - r.total_secs).abs() < 1e-9);
        }
    }
}

// ── Assignment policies ───────────────────────────────────────────────────────

#[cfg(test)]
mod policy {
    use asrs_core::{AssignmentPolicy, NodeId, RobotId};
    use proptest::prelude::*;

    use crate::{Fleet, NoopObserver};

    #[test]
    fn round_robin_cycles() {
        let cfg = super::helpers::config(3, 3, 3, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[0, 1, 2, 3, 4]);
        sim.run(&mut NoopObserver).unwrap();
        let robots: Vec<u32> = sim.records().iter().map(|r| r.robot.0).collect();
        assert_eq!(robots, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn earliest_available_prefers_idle_robot() {
        // Order 0 goes far, order 1 to the slot beside the depot.
        let cfg = super::helpers::config(3, 3, 2, AssignmentPolicy::EarliestAvailable);
        let mut sim = super::helpers::sim(cfg, &[7, 0, 5]);
        sim.run(&mut NoopObserver).unwrap();
        let rs = sim.records();
        assert_eq!(rs[0].robot, RobotId(0));
        assert_eq!(rs[1].robot, RobotId(1));
        assert!(rs[1].completed_at < rs[0].completed_at);
        assert_eq!(rs[2].robot, RobotId(1));
        assert!((rs[2].dispatched_at - rs[1].completed_at).abs() < 1e-9);
    }

    #[test]
    fn earliest_available_ties_go_to_lowest_index() {
        let fleet = Fleet::new(4, NodeId(0), AssignmentPolicy::EarliestAvailable);
        assert_eq!(fleet.select(), Some(RobotId(0)));
    }

    #[test]
    fn commit_updates_robot() {
        let mut fleet = Fleet::new(2, NodeId(9), AssignmentPolicy::RoundRobin);
        fleet.commit(RobotId(0), NodeId(9), 12.5);
        let r = fleet.get(RobotId(0)).unwrap();
        assert_eq!(r.available_at, 12.5);
        assert_eq!(r.assigned, 1);
        assert_eq!(fleet.select(), Some(RobotId(1)));
        assert_eq!(fleet.horizon(), 12.5);
    }

    proptest! {
        #[test]
        fn round_robin_is_balanced(
            robots  in 1u32..6,
            targets in proptest::collection::vec(0u32..9, 0..40),
        ) {
            let cfg = super::helpers::config(3, 3, robots, AssignmentPolicy::RoundRobin);
            let mut sim = super::helpers::sim(cfg, &targets);
            sim.run(&mut NoopObserver).unwrap();
            let counts = sim.fleet().assignment_counts();
            let max = counts.iter().copied().max().unwrap_or(0);
            let min = counts.iter().copied().min().unwrap_or(0);
            prop_assert!(max - min <= 1);
            prop_assert_eq!(counts.iter().sum::<u32>() as usize, targets.len());
        }
    }
}

// ── Congestion ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod congestion {
    use asrs_core::{AssignmentPolicy, NodeId, SimRng};

    use crate::{CongestionModel, NoopObserver};

    #[test]
    fn overlaps_count_prior_visits() {
        let cfg = super::helpers::config(3, 3, 2, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[4, 4, 2, 4]);
        sim.run(&mut NoopObserver).unwrap();
        let overlaps: Vec<u32> = sim.records().iter().map(|r| r.overlap_count).collect();
        assert_eq!(overlaps, vec![0, 1, 0, 2]);
        for r in sim.records() {
            let o = r.overlap_count as f64;
            assert!(r.delay_secs >= 1.5 * o && r.delay_secs <= 3.5 * o);
            assert!((r.total_secs - r.travel_secs - r.delay_secs).abs() < 1e-9);
        }
    }

    #[test]
    fn single_robot_never_overlaps() {
        let cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[3, 3, 3]);
        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.records().iter().all(|r| r.overlap_count == 0 && r.delay_secs == 0.0));
    }

    #[test]
    fn disabled_model_is_silent() {
        let mut cfg = super::helpers::config(2, 2, 3, AssignmentPolicy::RoundRobin);
        cfg.workload.congestion = false;
        let mut model = CongestionModel::new(&cfg.workload, 3, SimRng::new(1));
        model.record(NodeId(1));
        assert!(!model.is_enabled());
        assert_eq!(model.overlap(NodeId(1)), 0);
        assert_eq!(model.delay(5), 0.0);
    }

    #[test]
    fn fixed_jitter_gives_exact_delay() {
        let mut cfg = super::helpers::config(2, 2, 2, AssignmentPolicy::RoundRobin);
        cfg.workload.delay_jitter_min_secs = 2.0;
        cfg.workload.delay_jitter_max_secs = 2.0;
        cfg.workload.traffic_multiplier    = 1.5;
        let mut model = CongestionModel::new(&cfg.workload, 2, SimRng::new(1));
        model.record(NodeId(0));
        model.record(NodeId(0));
        assert_eq!(model.overlap(NodeId(0)), 2);
        assert!((model.delay(2) - 2.0 * 2.0 * 1.5).abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_run() {
        let cfg = super::helpers::config(3, 3, 3, AssignmentPolicy::EarliestAvailable);
        let targets = [4, 4, 4, 1, 4, 1, 8, 8];
        let mut a = super::helpers::sim(cfg.clone(), &targets);
        let mut b = super::helpers::sim(cfg, &targets);
        a.run(&mut NoopObserver).unwrap();
        b.run(&mut NoopObserver).unwrap();
        assert_eq!(a.records(), b.records());
    }
}

// ── Rerouting and skipped orders ──────────────────────────────────────────────

#[cfg(test)]
mod reroute {
    use asrs_core::{AssignmentPolicy, NodeId, Slot};
    use asrs_topology::{DijkstraRouter, WarehouseGraphBuilder};

    use crate::{IssueKind, NoopObserver, SimBuilder, SimError, SimIssue, SimObserver, SimOutcome, StepOutcome, TransactionRecord};

    #[test]
    fn blocked_target_is_skipped_then_recovers() {
        let cfg = super::helpers::config(3, 3, 2, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[4, 4, 0]);

        assert!(sim.block_node(NodeId(4)).unwrap());
        let first = sim.step(&mut NoopObserver).unwrap().unwrap();
        assert!(matches!(first, StepOutcome::Skipped(SimIssue { kind: IssueKind::RerouteFailed, .. })));

        assert!(sim.unblock_node(NodeId(4)));
        let second = sim.step(&mut NoopObserver).unwrap().unwrap();
        assert!(matches!(second, StepOutcome::Dispatched(_)));

        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.records().len(), 2);
        assert_eq!(sim.issues().len(), 1);
        assert_eq!(sim.pending(), 0);
        assert_eq!(sim.step(&mut NoopObserver).unwrap(), None);
    }

    #[test]
    fn blocked_corridor_forces_detour() {
        // 3×3: (1,1) is normally reached through (1,0).  Blocking it leaves
        // the route through (1,2).
        let cfg = super::helpers::config(3, 3, 1, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[4]);
        sim.block_node(NodeId(3)).unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.records().len(), 1);
        assert!(sim.issues().is_empty());
    }

    #[test]
    fn unknown_node_cannot_be_blocked() {
        let cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[0]);
        assert!(matches!(sim.block_node(NodeId(42)), Err(SimError::Topology(_))));
        sim.clear_blocked();
        assert!(sim.blocked().is_empty());
    }

    #[test]
    fn unreachable_target_is_no_path() {
        // (1,0) can leave for the depot but nothing leads to it.
        let cfg = super::helpers::config(2, 1, 1, AssignmentPolicy::RoundRobin);
        let mut b = WarehouseGraphBuilder::new(2, 1);
        let depot = b.depot();
        let n0 = b.storage_node(Slot::new(0, 0));
        let n1 = b.storage_node(Slot::new(1, 0));
        b.add_link(n0, depot, 1.0, 1.0).unwrap();
        b.add_directed_edge(n1, depot, 1.0, 1.0).unwrap();
        let g = b.build();
        let orders = super::helpers::orders(&g, &[1, 0]);

        let mut sim = SimBuilder::new(cfg, g, DijkstraRouter).orders(orders).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.records().len(), 1);
        assert_eq!(sim.issues()[0].kind, IssueKind::NoPath);
        assert_eq!(sim.records()[0].id.0, 0);
    }

    #[test]
    fn diagonal_route_is_illegal() {
        let cfg = super::helpers::config(2, 2, 1, AssignmentPolicy::RoundRobin);
        let mut b = WarehouseGraphBuilder::new(2, 2);
        let depot = b.depot();
        let n00 = b.storage_node(Slot::new(0, 0));
        let n11 = b.storage_node(Slot::new(1, 1));
        b.add_link(n00, depot, 1.0, 1.0).unwrap();
        b.add_link(n00, n11, 1.0, 1.0).unwrap();
        let g = b.build();
        let orders = super::helpers::orders(&g, &[n11.0]);

        let mut sim = SimBuilder::new(cfg, g, DijkstraRouter).orders(orders).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.records().is_empty());
        assert_eq!(sim.issues()[0].kind, IssueKind::IllegalPath);
    }

    #[derive(Default)]
    struct Counter {
        dispatched: usize,
        issues:     usize,
        ends:       usize,
        last_total: usize,
    }

    impl SimObserver for Counter {
        fn on_dispatch(&mut self, _record: &TransactionRecord) {
            self.dispatched += 1;
        }
        fn on_issue(&mut self, _issue: &SimIssue) {
            self.issues += 1;
        }
        fn on_run_end(&mut self, outcome: &SimOutcome) {
            self.ends += 1;
            self.last_total = outcome.records.len() + outcome.skipped();
        }
    }

    #[test]
    fn observer_sees_every_event_once() {
        let cfg = super::helpers::config(3, 3, 2, AssignmentPolicy::RoundRobin);
        let mut sim = super::helpers::sim(cfg, &[4, 1, 4, 2]);
        sim.block_node(NodeId(4)).unwrap();

        let mut obs = Counter::default();
        sim.step(&mut obs).unwrap();
        sim.run(&mut obs).unwrap();

        assert_eq!(obs.dispatched, 2);
        assert_eq!(obs.issues, 2);
        assert_eq!(obs.ends, 1);
        assert_eq!(obs.last_total, 4);

        let outcome = sim.into_outcome();
        assert_eq!(outcome.assignments.iter().sum::<u32>(), 2);
    }
}
