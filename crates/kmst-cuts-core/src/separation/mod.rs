//! Separation rounds driven by the external branch-and-cut engine.
//!
//! A [`Separator`] owns the reusable oracle buffers and a seeded RNG. Each
//! call is a single pass over a shuffled candidate set; nothing but counters
//! survives between calls. Run one separator per search worker.

mod config;
mod connection;
mod cycle;
mod stats;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::Graph;
use crate::inequality::{Assignment, Inequality};
use crate::oracle::{DirectionWeights, FlowNetwork};
use crate::{ConfigError, SeparationError};

pub use config::{CutPolicy, Dedup, SeparationConfig};
pub use stats::SeparationStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    CycleElimination,
    Connection,
}

/// Where in the search the engine asks for inequalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeparationContext {
    /// Integral candidate; results are lazy constraints.
    Integral,
    /// Fractional relaxation point; results are user cuts.
    Fractional,
}

#[derive(Debug, Clone)]
struct Workspace {
    weights: DirectionWeights,
    network: FlowNetwork,
    partition: Vec<bool>,
    stats: SeparationStats,
}

impl Workspace {
    fn round<R: Rng + ?Sized>(
        &mut self,
        graph: &Graph,
        config: &SeparationConfig,
        family: Family,
        context: SeparationContext,
        assignment: &Assignment<'_>,
        rng: &mut R,
    ) -> Result<Vec<Inequality>, SeparationError> {
        self.stats.rounds += 1;
        if !config.policy.admits(family, context) {
            self.stats.skipped_rounds += 1;
            debug!("{family:?} separation not admitted at {context:?} point");
            return Ok(Vec::new());
        }

        let result = match family {
            Family::CycleElimination => cycle::separate(
                graph,
                config,
                &mut self.weights,
                assignment,
                rng,
                &mut self.stats,
            ),
            Family::Connection => connection::separate(
                graph,
                config,
                &mut self.network,
                &mut self.partition,
                assignment,
                rng,
                &mut self.stats,
            ),
        };

        match result {
            Ok(cuts) => {
                self.stats.record(family, cuts.len());
                debug!(
                    "{family:?} round at {context:?} point: {} inequalities",
                    cuts.len()
                );
                Ok(cuts)
            }
            Err(err) => {
                self.stats.aborted_rounds += 1;
                warn!("{family:?} round aborted: {err}");
                Err(err)
            }
        }
    }
}

pub struct Separator<'g> {
    graph: &'g Graph,
    config: SeparationConfig,
    workspace: Workspace,
    rng: StdRng,
}

impl<'g> Separator<'g> {
    pub fn new(graph: &'g Graph, config: SeparationConfig) -> Result<Self, ConfigError> {
        config.validate(graph.node_count())?;
        let network = FlowNetwork::from_graph(graph)
            .map_err(|err| ConfigError::InvalidGraph(err.to_string()))?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            graph,
            workspace: Workspace {
                weights: DirectionWeights::new(graph.edge_count()),
                network,
                partition: vec![false; graph.node_count()],
                stats: SeparationStats::default(),
            },
            config,
            rng,
        })
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn config(&self) -> &SeparationConfig {
        &self.config
    }

    pub fn stats(&self) -> &SeparationStats {
        &self.workspace.stats
    }

    /// Restarts the internal RNG as if freshly built with `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Runs one round using the separator's own RNG.
    ///
    /// An empty vector means nothing violated was found. A connection round
    /// may return `0 >= 1` (no terms) when no arc leaves the nodes reachable
    /// from the root: the subproblem has no rooted k-tree and the engine should
    /// treat the inequality as an infeasibility proof.
    ///
    /// Non-finite assignment values fail the round with
    /// [`SeparationError::InvalidValue`].
    pub fn separate(
        &mut self,
        family: Family,
        context: SeparationContext,
        assignment: &Assignment<'_>,
    ) -> Result<Vec<Inequality>, SeparationError> {
        let Self {
            graph,
            config,
            workspace,
            rng,
        } = self;
        workspace.round(*graph, config, family, context, assignment, rng)
    }

    /// Runs one round drawing the candidate order from `rng`.
    pub fn separate_with_rng<R: Rng + ?Sized>(
        &mut self,
        family: Family,
        context: SeparationContext,
        assignment: &Assignment<'_>,
        rng: &mut R,
    ) -> Result<Vec<Inequality>, SeparationError> {
        self.workspace
            .round(self.graph, &self.config, family, context, assignment, rng)
    }

    /// Runs one round and hands every inequality to `lazy` at integral points
    /// or to `user` at fractional points. A failed round hands over nothing.
    pub fn separate_into<L, U>(
        &mut self,
        family: Family,
        context: SeparationContext,
        assignment: &Assignment<'_>,
        mut lazy: L,
        mut user: U,
    ) -> Result<usize, SeparationError>
    where
        L: FnMut(Inequality),
        U: FnMut(Inequality),
    {
        let cuts = self.separate(family, context, assignment)?;
        let count = cuts.len();
        for cut in cuts {
            match context {
                SeparationContext::Integral => lazy(cut),
                SeparationContext::Fractional => user(cut),
            }
        }
        Ok(count)
    }
}
