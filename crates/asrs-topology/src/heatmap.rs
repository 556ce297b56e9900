//! Per-slot demand factors ("SKU heatmap").
//!
//! Popular slots see more traffic at the depot interface, which the topology
//! builder models by scaling each depot edge by the slot's demand factor.

use asrs_core::{SimRng, Slot};

/// Lower bound of sampled demand factors (inclusive).
pub const SAMPLE_MIN: f64 = 1.0;
/// Upper bound of sampled demand factors (exclusive).
pub const SAMPLE_MAX: f64 = 3.0;

/// Dense `aisles × levels` grid of demand factors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemandHeatmap {
    aisles:  u32,
    levels:  u32,
    factors: Vec<f64>,
}

impl DemandHeatmap {
    /// Every slot at factor 1.0.
    pub fn uniform(aisles: u32, levels: u32) -> Self {
        Self {
            aisles,
            levels,
            factors: vec![1.0; aisles as usize * levels as usize],
        }
    }

    /// Draw each slot's factor uniformly from `[1.0, 3.0)`.
    ///
    /// Slots are visited aisle-major so a given seed always maps to the same
    /// heatmap.
    pub fn sample(aisles: u32, levels: u32, rng: &mut SimRng) -> Self {
        let factors = (0..aisles as usize * levels as usize)
            .map(|_| rng.gen_range(SAMPLE_MIN..SAMPLE_MAX))
            .collect();
        Self { aisles, levels, factors }
    }

    /// Build from a function of the slot.
    pub fn from_fn(aisles: u32, levels: u32, mut f: impl FnMut(Slot) -> f64) -> Self {
        let mut factors = Vec::with_capacity(aisles as usize * levels as usize);
        for aisle in 0..aisles {
            for level in 0..levels {
                factors.push(f(Slot::new(aisle, level)));
            }
        }
        Self { aisles, levels, factors }
    }

    /// Raw factor of `slot`; 1.0 for slots outside the map.
    ///
    /// Not clamped here — the travel-time model floors it at use.
    pub fn factor(&self, slot: Slot) -> f64 {
        self.index(slot).map_or(1.0, |i| self.factors[i])
    }

    /// Overwrite one slot's factor.  Returns `false` if the slot is outside
    /// the map.
    pub fn set(&mut self, slot: Slot, factor: f64) -> bool {
        match self.index(slot) {
            Some(i) => {
                self.factors[i] = factor;
                true
            }
            None => false,
        }
    }

    pub fn aisles(&self) -> u32 {
        self.aisles
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    fn index(&self, slot: Slot) -> Option<usize> {
        (slot.aisle < self.aisles && slot.level < self.levels)
            .then(|| slot.aisle as usize * self.levels as usize + slot.level as usize)
    }
}
