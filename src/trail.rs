use std::collections::VecDeque;

use crate::foundation::core::Point;
use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// One recorded pointer position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrailSample {
    /// Pointer position in host coordinates.
    pub position: Point,
    /// Engine time the sample was recorded at, in seconds.
    pub time: f64,
}

/// Visual attenuation for one trail follower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowerStyle {
    /// Follower opacity, decreasing with index.
    pub opacity: f64,
    /// Follower scale, decreasing with index.
    pub scale: f64,
}

/// Default follower count of the cursor trail.
pub const DEFAULT_TRAIL_CAPACITY: usize = 10;

/// Bounded FIFO of recent pointer samples, newest first.
///
/// Pushes happen on pointer-move ingestion; renders read a per-tick
/// snapshot so several followers never observe a half-updated history.
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    samples: VecDeque<TrailSample>,
    capacity: usize,
}

impl TrailBuffer {
    /// Buffer holding at most `capacity` samples.
    pub fn new(capacity: usize) -> ScrollyteResult<Self> {
        if capacity == 0 {
            return Err(ScrollyteError::configuration(
                "trail capacity must be >= 1",
            ));
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Insert the newest sample at index 0, evicting the oldest beyond
    /// capacity.
    pub fn push(&mut self, sample: TrailSample) {
        self.samples.push_front(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_back();
        }
    }

    /// Ordered copy of the history, newest first.
    pub fn snapshot(&self) -> Vec<TrailSample> {
        self.samples.iter().copied().collect()
    }

    /// Attenuation for the follower at `index`: opacity `(N - i) / N`,
    /// scale `(N - i) / (N * 1.5)`, both monotonically decreasing.
    pub fn follower_style(&self, index: usize) -> FollowerStyle {
        let n = self.capacity as f64;
        let rank = (self.capacity.saturating_sub(index)) as f64;
        FollowerStyle {
            opacity: rank / n,
            scale: rank / (n * 1.5),
        }
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
