use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::graph::{EdgeId, Graph};
use crate::inequality::{Assignment, Inequality, Sense, Term, Var};
use crate::oracle::shortest_path::{shortest_path, DirectionWeights};
use crate::separation::{Family, SeparationConfig, SeparationStats};
use crate::SeparationError;

/// Cycle-elimination separation.
///
/// For each edge `e = (v1, v2)` in shuffled order, `e` is removed and the
/// cheapest `v1 -> v2` path under weights `1 - x` closes a cycle `C`. When
/// `w(path) + (1 - x_e) < 1 - eps`, the inequality
/// `sum_{f in C} x_f <= |C| - 1` is violated.
pub(crate) fn separate<R: Rng + ?Sized>(
    graph: &Graph,
    config: &SeparationConfig,
    weights: &mut DirectionWeights,
    assignment: &Assignment<'_>,
    rng: &mut R,
    stats: &mut SeparationStats,
) -> Result<Vec<Inequality>, SeparationError> {
    let m = graph.edge_count();
    let values = assignment.edge_values(m)?;
    weights.reset_from(values)?;

    let mut used = vec![false; m];
    let mut order: Vec<usize> = (0..m).collect();
    order.shuffle(rng);

    let mut found = Vec::new();
    for e in order {
        if found.len() >= config.max_cuts {
            break;
        }
        if config.dedup.is_enabled() && used[e] {
            continue;
        }
        stats.candidates_scanned += 1;

        let edge = graph.edge_list()[e];
        let edge_id = EdgeId(e);
        let own_weight = weights.exclude(edge_id)?;
        let path = shortest_path(graph, weights.as_slice(), edge.v1, edge.v2);
        weights.restore(edge_id, own_weight)?;
        let path = path?;
        stats.oracle_calls += 1;
        trace!(
            "edge {} ({} - {}): path of {} arcs, weight {:.6}",
            e,
            edge.v1.0,
            edge.v2.0,
            path.len(),
            path.weight
        );

        if path.is_empty() || path.weight + own_weight >= 1.0 - config.eps {
            continue;
        }

        let mut terms = Vec::with_capacity(path.len() + 1);
        for path_edge in path.edges(m) {
            terms.push(Term::unit(Var::Edge(path_edge)));
            used[path_edge.0] = true;
        }
        terms.push(Term::unit(Var::Edge(edge_id)));
        used[e] = true;

        let cut = Inequality::new(
            Family::CycleElimination,
            terms,
            Sense::Le,
            path.len() as f64,
        );
        debug!(
            "cycle-elimination cut through edge {}: {} (cycle weight {:.6})",
            e,
            cut,
            path.weight + own_weight
        );
        found.push(cut);
    }
    Ok(found)
}
