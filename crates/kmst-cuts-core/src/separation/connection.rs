use log::{debug, trace, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::graph::{Graph, NodeId};
use crate::inequality::{Assignment, Inequality, Sense, Term, Var};
use crate::oracle::FlowNetwork;
use crate::separation::{Family, SeparationConfig, SeparationStats};
use crate::SeparationError;

/// Directed connection separation.
///
/// Arcs in the support graph get capacity 1, all others 0. For each non-root
/// node `i` in shuffled order the flow from the root to `i` is pushed up to
/// the configured threshold. A cut below the threshold whose source side `S`
/// has at most `k` nodes yields `sum_{a in delta+(S)} x_a >= 1`: a tree with
/// `k + 1` nodes cannot fit inside `S`, so it must leave it.
///
/// With dedup on, nodes inside an accepted `S` are not probed again and a
/// source side already cut off in this round is not emitted twice.
pub(crate) fn separate<R: Rng + ?Sized>(
    graph: &Graph,
    config: &SeparationConfig,
    network: &mut FlowNetwork,
    partition: &mut [bool],
    assignment: &Assignment<'_>,
    rng: &mut R,
    stats: &mut SeparationStats,
) -> Result<Vec<Inequality>, SeparationError> {
    let n = graph.node_count();
    let arc_values = assignment.arc_values(graph.arc_count())?;
    let node_values = assignment.node_values(n)?;
    let capacities: Vec<f64> = arc_values
        .iter()
        .map(|&x| if x > config.support_tolerance { 1.0 } else { 0.0 })
        .collect();

    let root = graph.root();
    let mut used = vec![false; n];
    let mut order: Vec<usize> = (0..n).filter(|&v| v != root.0).collect();
    order.shuffle(rng);

    let mut fresh_capacities = Some(capacities.as_slice());
    let mut accepted: Vec<Vec<bool>> = Vec::new();
    let mut found = Vec::new();
    for i in order {
        if found.len() >= config.max_cuts {
            break;
        }
        if config.dedup.is_enabled() && used[i] {
            continue;
        }
        if config.skip_unselected_nodes && node_values[i] < config.eps {
            continue;
        }
        stats.candidates_scanned += 1;

        network.update(root, NodeId(i), fresh_capacities.take())?;
        let cut_value = network.min_cut(config.connection_threshold, partition)?;
        stats.oracle_calls += 1;
        trace!("root -> {}: capped flow {}", i, cut_value);
        if cut_value >= config.connection_threshold {
            continue;
        }

        let source_side = partition.iter().filter(|&&side| side).count();
        if source_side > config.k {
            trace!(
                "root -> {}: source side of {} nodes exceeds k = {}",
                i,
                source_side,
                config.k
            );
            continue;
        }

        if config.dedup.is_enabled() && accepted.iter().any(|side| side[..] == partition[..]) {
            trace!("root -> {}: source side already cut off this round", i);
            continue;
        }

        let crossing = network.crossing_arcs(partition);
        if crossing.is_empty() {
            warn!(
                "no arc leaves the {} nodes reachable from the root; the instance has no {}-tree",
                source_side, config.k
            );
        }
        let terms = crossing
            .into_iter()
            .map(|arc| Term::unit(Var::Arc(arc)))
            .collect();
        if config.dedup.is_enabled() {
            for (node, &side) in partition.iter().enumerate() {
                if side {
                    used[node] = true;
                }
            }
            accepted.push(partition.to_vec());
        }

        let cut = Inequality::new(Family::Connection, terms, Sense::Ge, 1.0);
        debug!(
            "connection cut for node {} (z = {:.6}, |S| = {}): {}",
            i, node_values[i], source_side, cut
        );
        found.push(cut);
    }
    Ok(found)
}
