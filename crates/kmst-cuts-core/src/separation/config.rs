use crate::separation::{Family, SeparationContext};
use crate::ConfigError;

/// Which families may be separated at fractional relaxation points.
///
/// Integral candidates are always separated; the inequalities found there
/// become lazy constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutPolicy {
    /// Separate only at integral candidates.
    LazyOnly,
    /// Cycle-elimination cuts also at fractional points; connection cuts only lazily.
    #[default]
    CycleCutsEarly,
    /// Both families at fractional points.
    AllEarly,
}

impl CutPolicy {
    pub fn from_early_cutting(enabled: bool) -> Self {
        if enabled {
            CutPolicy::AllEarly
        } else {
            CutPolicy::CycleCutsEarly
        }
    }

    pub fn admits(self, family: Family, context: SeparationContext) -> bool {
        match (context, self, family) {
            (SeparationContext::Integral, _, _) => true,
            (SeparationContext::Fractional, CutPolicy::LazyOnly, _) => false,
            (SeparationContext::Fractional, CutPolicy::CycleCutsEarly, Family::CycleElimination) => {
                true
            }
            (SeparationContext::Fractional, CutPolicy::CycleCutsEarly, Family::Connection) => false,
            (SeparationContext::Fractional, CutPolicy::AllEarly, _) => true,
        }
    }
}

/// How candidates covered by an earlier inequality of the same round are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dedup {
    /// Probe every candidate.
    Off,
    /// Skip edges on an accepted cycle and nodes on the source side of an
    /// accepted cut.
    #[default]
    CoveredElements,
}

impl Dedup {
    pub fn is_enabled(self) -> bool {
        matches!(self, Dedup::CoveredElements)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeparationConfig {
    /// Number of tree edges; source sides larger than `k` are discarded.
    pub k: usize,
    /// Violation tolerance.
    pub eps: f64,
    /// Arcs valued above this get capacity 1 in the connection network.
    pub support_tolerance: f64,
    /// Maximum inequalities per call.
    pub max_cuts: usize,
    /// A cut is accepted when the capped flow stays below this value.
    pub connection_threshold: f64,
    pub dedup: Dedup,
    /// Skip connection candidates whose node value is below `eps`.
    pub skip_unselected_nodes: bool,
    pub policy: CutPolicy,
    pub seed: u64,
}

impl SeparationConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            eps: 1e-6,
            support_tolerance: 1e-6,
            max_cuts: 1,
            connection_threshold: 1.0,
            dedup: Dedup::default(),
            skip_unselected_nodes: true,
            policy: CutPolicy::default(),
            seed: 0,
        }
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_support_tolerance(mut self, tolerance: f64) -> Self {
        self.support_tolerance = tolerance;
        self
    }

    pub fn with_max_cuts(mut self, max_cuts: usize) -> Self {
        self.max_cuts = max_cuts;
        self
    }

    pub fn with_connection_threshold(mut self, threshold: f64) -> Self {
        self.connection_threshold = threshold;
        self
    }

    pub fn with_dedup(mut self, dedup: Dedup) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_skip_unselected_nodes(mut self, skip: bool) -> Self {
        self.skip_unselected_nodes = skip;
        self
    }

    pub fn with_policy(mut self, policy: CutPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_early_cutting(self, enabled: bool) -> Self {
        self.with_policy(CutPolicy::from_early_cutting(enabled))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self, node_count: usize) -> Result<(), ConfigError> {
        if self.k == 0 || self.k >= node_count {
            return Err(ConfigError::InvalidK {
                k: self.k,
                node_count,
            });
        }
        if self.max_cuts == 0 {
            return Err(ConfigError::ZeroBudget);
        }
        for (name, value) in [
            ("eps", self.eps),
            ("support tolerance", self.support_tolerance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidTolerance { name, value });
            }
        }
        if !(self.connection_threshold.is_finite() && self.connection_threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(self.connection_threshold));
        }
        Ok(())
    }
}
