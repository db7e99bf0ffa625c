use serde::{Deserialize, Serialize};

/// Construction options for a [`Recycler`](super::Recycler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecyclerConfig {
    /// Free-list slots reserved up front (default: 0). No instances are built.
    pub initial_capacity: usize,

    /// Enable usage instrumentation (default: false)
    pub tracking: bool,

    /// Run `dispose` on instances built by `expand` (default: false)
    pub dispose_fresh: bool,
}

impl Default for RecyclerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            tracking: false,
            dispose_fresh: false,
        }
    }
}

impl RecyclerConfig {
    /// Config with storage for `capacity` free instances reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            ..Default::default()
        }
    }

    /// Config with instrumentation enabled.
    pub fn tracked() -> Self {
        Self {
            tracking: true,
            ..Default::default()
        }
    }

    pub fn tracking(mut self, enabled: bool) -> Self {
        self.tracking = enabled;
        self
    }

    pub fn dispose_fresh(mut self, enabled: bool) -> Self {
        self.dispose_fresh = enabled;
        self
    }
}
