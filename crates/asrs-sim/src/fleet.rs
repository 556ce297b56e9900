//! Robot fleet state and assignment policies.

use asrs_core::{AssignmentPolicy, NodeId, RobotId};

/// One shuttle robot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    pub id:           RobotId,
    /// Node the robot will start its next order from.
    pub position:     NodeId,
    /// Logical time (seconds) at which the robot is free again.
    pub available_at: f64,
    /// Orders completed by this robot so far.
    pub assigned:     u32,
}

/// The fleet plus the selection state of its assignment policy.
///
/// Selection and commitment are separate: [`select`](Self::select) only
/// looks, [`commit`](Self::commit) moves the robot and advances the
/// round-robin cursor.  An order that is skipped after selection therefore
/// does not consume a robot's turn.
#[derive(Debug, Clone)]
pub struct Fleet {
    robots: Vec<Robot>,
    policy: AssignmentPolicy,
    cursor: usize,
}

impl Fleet {
    /// `count` robots, all idle at `home` at time zero.
    pub fn new(count: u32, home: NodeId, policy: AssignmentPolicy) -> Self {
        let robots = (0..count)
            .map(|i| Robot { id: RobotId(i), position: home, available_at: 0.0, assigned: 0 })
            .collect();
        Self { robots, policy, cursor: 0 }
    }

    /// Robot that should take the next order, or `None` for an empty fleet.
    pub fn select(&self) -> Option<RobotId> {
        if self.robots.is_empty() {
            return None;
        }
        let idx = match self.policy {
            AssignmentPolicy::RoundRobin => self.cursor % self.robots.len(),
            AssignmentPolicy::EarliestAvailable => self
                .robots
                .iter()
                .enumerate()
                .min_by(|(ia, a), (ib, b)| {
                    a.available_at.total_cmp(&b.available_at).then(ia.cmp(ib))
                })
                .map_or(0, |(i, _)| i),
        };
        Some(RobotId(idx as u32))
    }

    /// Record a completed assignment for `robot`.
    pub fn commit(&mut self, robot: RobotId, position: NodeId, available_at: f64) {
        let Some(r) = self.robots.get_mut(robot.index()) else {
            return;
        };
        r.position     = position;
        r.available_at = available_at;
        r.assigned    += 1;
        if self.policy == AssignmentPolicy::RoundRobin {
            self.cursor = (robot.index() + 1) % self.robots.len();
        }
    }

    pub fn get(&self, robot: RobotId) -> Option<&Robot> {
        self.robots.get(robot.index())
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn policy(&self) -> AssignmentPolicy {
        self.policy
    }

    /// Completed assignments per robot, indexed by `RobotId`.
    pub fn assignment_counts(&self) -> Vec<u32> {
        self.robots.iter().map(|r| r.assigned).collect()
    }

    /// Latest `available_at` across the fleet (0 for an idle fleet).
    pub fn horizon(&self) -> f64 {
        self.robots.iter().map(|r| r.available_at).fold(0.0, f64::max)
    }
}
