use crate::foundation::error::{ScrollyteError, ScrollyteResult};
use crate::foundation::math::Rng64;

/// Ordering of per-element offsets within a staggered segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StaggerFrom {
    /// First element starts first.
    #[default]
    Start,
    /// Elements nearest the group midpoint start first.
    Center,
    /// Last element starts first.
    End,
    /// Deterministic shuffled order.
    Random {
        /// Seed for the shuffle; same seed, same order.
        seed: u64,
    },
}

/// Per-element time offsets distributed over a shared segment.
///
/// `amount` is the total spread: the last element to start does so `amount`
/// time units (or progress fraction, in scrub mode) after the first.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaggerSpec {
    /// Total spread across the group.
    pub amount: f64,
    /// Distribution of offsets over element indices.
    pub from: StaggerFrom,
}

impl StaggerSpec {
    /// Evenly spread `amount` from the first element to the last.
    pub fn linear(amount: f64) -> Self {
        Self {
            amount,
            from: StaggerFrom::Start,
        }
    }

    /// Validate the spread.
    pub fn validate(&self) -> ScrollyteResult<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ScrollyteError::configuration(
                "stagger amount must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Offset for each of `count` elements, in element order.
    ///
    /// Offsets lie in `[0, amount]` and at least one element has offset 0.
    pub fn offsets(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        if count == 1 || self.amount == 0.0 {
            return vec![0.0; count];
        }

        let last = (count - 1) as f64;
        match self.from {
            StaggerFrom::Start => (0..count)
                .map(|i| i as f64 / last * self.amount)
                .collect(),
            StaggerFrom::End => (0..count)
                .map(|i| (last - i as f64) / last * self.amount)
                .collect(),
            StaggerFrom::Center => {
                let mid = last / 2.0;
                // Normalize so the farthest element lands exactly at `amount`.
                let reach = mid.max(last - mid);
                (0..count)
                    .map(|i| (i as f64 - mid).abs() / reach * self.amount)
                    .collect()
            }
            StaggerFrom::Random { seed } => {
                let mut order: Vec<usize> = (0..count).collect();
                let mut rng = Rng64::new(seed);
                for i in (1..count).rev() {
                    let j = rng.next_usize(i + 1);
                    order.swap(i, j);
                }
                let mut offsets = vec![0.0; count];
                for (rank, &index) in order.iter().enumerate() {
                    offsets[index] = rank as f64 / last * self.amount;
                }
                offsets
            }
        }
    }
}
