use kmst_cuts_core::graph::{ArcId, EdgeId, Graph};
use kmst_cuts_core::{
    Assignment, ConfigError, CutPolicy, Dedup, Family, Inequality, SeparationConfig,
    SeparationContext, SeparationError, Sense, Separator, Var,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Root 0 with a path 0-1-2-4 and a pendant 0-3.
fn pendant_graph() -> Graph {
    Graph::from_edges(5, &[(0, 1, 1), (1, 2, 1), (2, 4, 1), (0, 3, 1)]).unwrap()
}

fn complete_graph(n: usize) -> Graph {
    let mut edges = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            edges.push((u, v, (u + 2 * v) as i64));
        }
    }
    Graph::from_edges(n, &edges).unwrap()
}

#[test]
fn detached_node_yields_connection_cut() {
    let graph = pendant_graph();
    // only 0 -> 1 carries value; node 4 is selected without a path from the root
    let mut arcs = vec![0.0; graph.arc_count()];
    arcs[0] = 1.0;
    let nodes = [1.0, 1.0, 0.0, 0.0, 0.9];
    let assignment = Assignment::directed(&arcs, &nodes);

    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert_eq!(cuts.len(), 1);
    let cut = &cuts[0];
    assert_eq!(cut.family, Family::Connection);
    assert_eq!(cut.sense, Sense::Ge);
    assert_eq!(cut.rhs, 1.0);
    // arcs leaving {0, 1}: 1 -> 2 and 0 -> 3
    let mut crossing = cut.arc_ids();
    crossing.sort();
    assert_eq!(crossing, vec![ArcId(1), ArcId(5)]);
    assert_eq!(cut.lhs(&assignment), Some(0.0));
    assert!(cut.is_violated(&assignment, 1e-6));

    let stats = separator.stats();
    assert_eq!(stats.rounds, 1);
    assert_eq!(stats.connection_cuts, 1);
    assert_eq!(stats.cycle_elimination_cuts, 0);
}

#[test]
fn oversized_source_side_is_discarded() {
    let graph = pendant_graph();
    let mut arcs = vec![0.0; graph.arc_count()];
    arcs[0] = 1.0;
    arcs[1] = 1.0;
    let nodes = [1.0, 1.0, 1.0, 0.0, 0.9];
    let assignment = Assignment::directed(&arcs, &nodes);

    // {0, 1, 2} is reachable from the root and has more than k nodes
    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert!(cuts.is_empty());
}

#[test]
fn unselected_nodes_are_skipped_unless_configured() {
    let graph = pendant_graph();
    let arcs = vec![0.0; graph.arc_count()];
    let nodes = [1.0, 0.0, 0.0, 0.0, 0.0];
    let assignment = Assignment::directed(&arcs, &nodes);

    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert!(cuts.is_empty());
    assert_eq!(separator.stats().oracle_calls, 0);

    let config = SeparationConfig::new(2).with_skip_unselected_nodes(false);
    let mut separator = Separator::new(&graph, config).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert_eq!(cuts.len(), 1);
    // the root alone is the source side
    let mut crossing = cuts[0].arc_ids();
    crossing.sort();
    assert_eq!(crossing, vec![ArcId(0), ArcId(5)]);
}

#[test]
fn integral_cycle_is_cut_off() {
    // triangle 0-1-2 selected as a whole, plus an unused edge 2-3
    let graph = Graph::from_edges(4, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (2, 3, 1)]).unwrap();
    let edges = [1.0, 1.0, 1.0, 0.0];
    let nodes = [1.0, 1.0, 1.0, 0.0];
    let assignment = Assignment::undirected(&edges, &nodes);

    let config = SeparationConfig::new(3).with_max_cuts(10);
    let mut separator = Separator::new(&graph, config).unwrap();
    let cuts = separator
        .separate(
            Family::CycleElimination,
            SeparationContext::Integral,
            &assignment,
        )
        .unwrap();
    // all triangle edges are covered by the first cycle
    assert_eq!(cuts.len(), 1);
    let cut = &cuts[0];
    assert_eq!(cut.sense, Sense::Le);
    assert_eq!(cut.rhs, 2.0);
    let mut cycle = cut.edge_ids();
    cycle.sort();
    assert_eq!(cycle, vec![EdgeId(0), EdgeId(1), EdgeId(2)]);
    assert!((cut.violation(&assignment).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn dedup_off_reports_each_cycle_edge() {
    let graph = Graph::from_edges(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();
    let edges = [1.0, 1.0, 1.0];
    let nodes = [1.0, 1.0, 1.0];
    let assignment = Assignment::undirected(&edges, &nodes);

    let config = SeparationConfig::new(2)
        .with_max_cuts(10)
        .with_dedup(Dedup::Off);
    let mut separator = Separator::new(&graph, config).unwrap();
    let cuts = separator
        .separate(
            Family::CycleElimination,
            SeparationContext::Integral,
            &assignment,
        )
        .unwrap();
    assert_eq!(cuts.len(), 3);
    for cut in &cuts {
        assert_eq!(cut.terms.len(), 3);
    }
}

#[test]
fn budget_bounds_inequalities_per_round() {
    let graph = complete_graph(6);
    let edges = vec![0.9; graph.edge_count()];
    let nodes = vec![1.0; graph.node_count()];
    let assignment = Assignment::undirected(&edges, &nodes);

    for budget in [1usize, 2, 4] {
        let config = SeparationConfig::new(3)
            .with_max_cuts(budget)
            .with_dedup(Dedup::Off);
        let mut separator = Separator::new(&graph, config).unwrap();
        let cuts = separator
            .separate(
                Family::CycleElimination,
                SeparationContext::Fractional,
                &assignment,
            )
            .unwrap();
        assert_eq!(cuts.len(), budget);
        for cut in &cuts {
            assert!(cut.is_violated(&assignment, 1e-6), "{cut} not violated");
        }
    }
}

#[test]
fn same_seed_gives_same_inequalities() {
    let graph = complete_graph(7);
    let edges: Vec<f64> = (0..graph.edge_count())
        .map(|e| 0.3 + 0.05 * (e % 12) as f64)
        .collect();
    let nodes = vec![1.0; graph.node_count()];
    let assignment = Assignment::undirected(&edges, &nodes);
    let config = SeparationConfig::new(4).with_max_cuts(5).with_seed(42);

    let run = |config: SeparationConfig| -> Vec<Inequality> {
        let mut separator = Separator::new(&graph, config).unwrap();
        separator
            .separate(
                Family::CycleElimination,
                SeparationContext::Fractional,
                &assignment,
            )
            .unwrap()
    };
    let first = run(config.clone());
    let second = run(config.clone());
    assert!(!first.is_empty());
    assert_eq!(first, second);

    let mut separator = Separator::new(&graph, config).unwrap();
    let once = separator
        .separate(
            Family::CycleElimination,
            SeparationContext::Fractional,
            &assignment,
        )
        .unwrap();
    separator.reseed(42);
    let again = separator
        .separate(
            Family::CycleElimination,
            SeparationContext::Fractional,
            &assignment,
        )
        .unwrap();
    assert_eq!(once, again);

    let mut rng = StdRng::seed_from_u64(42);
    let explicit = separator
        .separate_with_rng(
            Family::CycleElimination,
            SeparationContext::Fractional,
            &assignment,
            &mut rng,
        )
        .unwrap();
    assert_eq!(explicit, once);
}

#[test]
fn policy_skips_connection_at_fractional_points() {
    let graph = pendant_graph();
    let mut arcs = vec![0.0; graph.arc_count()];
    arcs[0] = 1.0;
    let nodes = [1.0, 1.0, 0.0, 0.0, 0.9];
    let assignment = Assignment::directed(&arcs, &nodes);

    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let cuts = separator
        .separate(
            Family::Connection,
            SeparationContext::Fractional,
            &assignment,
        )
        .unwrap();
    assert!(cuts.is_empty());
    assert_eq!(separator.stats().skipped_rounds, 1);

    let config = SeparationConfig::new(2).with_policy(CutPolicy::AllEarly);
    let mut separator = Separator::new(&graph, config).unwrap();
    let cuts = separator
        .separate(
            Family::Connection,
            SeparationContext::Fractional,
            &assignment,
        )
        .unwrap();
    assert_eq!(cuts.len(), 1);
}

#[test]
fn sinks_receive_cuts_by_context() {
    let graph = Graph::from_edges(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();
    let edges = [1.0, 1.0, 1.0];
    let nodes = [1.0, 1.0, 1.0];
    let assignment = Assignment::undirected(&edges, &nodes);

    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let mut lazy = Vec::new();
    let mut user = Vec::new();
    let count = separator
        .separate_into(
            Family::CycleElimination,
            SeparationContext::Integral,
            &assignment,
            |cut| lazy.push(cut),
            |cut| user.push(cut),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(lazy.len(), 1);
    assert!(user.is_empty());

    let count = separator
        .separate_into(
            Family::CycleElimination,
            SeparationContext::Fractional,
            &assignment,
            |cut| lazy.push(cut),
            |cut| user.push(cut),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(lazy.len(), 1);
    assert_eq!(user.len(), 1);
    assert_eq!(separator.stats().cycle_elimination_cuts, 2);
}

#[test]
fn malformed_assignment_aborts_round() {
    let graph = pendant_graph();
    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let nodes = [1.0; 5];
    let short = Assignment::directed(&[1.0, 0.0], &nodes);
    let result = separator.separate(Family::Connection, SeparationContext::Integral, &short);
    assert_eq!(
        result,
        Err(SeparationError::AssignmentLength {
            what: "arc",
            expected: graph.arc_count(),
            actual: 2,
        })
    );

    // cycle elimination needs edge values
    let directed = Assignment::directed(&[0.0; 6], &nodes);
    assert!(separator
        .separate(
            Family::CycleElimination,
            SeparationContext::Integral,
            &directed
        )
        .is_err());
    assert_eq!(separator.stats().aborted_rounds, 2);
    assert_eq!(separator.stats().total_cuts(), 0);
}

#[test]
fn setup_rejects_bad_parameters() {
    let graph = pendant_graph();
    assert!(matches!(
        Separator::new(&graph, SeparationConfig::new(5)),
        Err(ConfigError::InvalidK { k: 5, node_count: 5 })
    ));
    assert!(matches!(
        Separator::new(&graph, SeparationConfig::new(2).with_max_cuts(0)),
        Err(ConfigError::ZeroBudget)
    ));
}

#[test]
fn cuts_render_as_text() {
    let graph = Graph::from_edges(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();
    let edges = [1.0, 1.0, 1.0];
    let nodes = [1.0, 1.0, 1.0];
    let assignment = Assignment::undirected(&edges, &nodes);
    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let cuts = separator
        .separate(
            Family::CycleElimination,
            SeparationContext::Integral,
            &assignment,
        )
        .unwrap();
    let text = cuts[0].to_string();
    assert!(text.ends_with("<= 2"), "{text}");
    assert_eq!(
        cuts[0]
            .terms
            .iter()
            .filter(|term| matches!(term.var, Var::Edge(_)))
            .count(),
        3
    );
}

#[test]
fn shared_source_side_is_cut_once_per_round() {
    let graph = pendant_graph();
    // nodes 2, 3 and 4 are all detached from the support 0 -> 1
    let mut arcs = vec![0.0; graph.arc_count()];
    arcs[0] = 1.0;
    let nodes = [1.0, 1.0, 0.9, 0.9, 0.9];
    let assignment = Assignment::directed(&arcs, &nodes);

    let config = SeparationConfig::new(2).with_max_cuts(10);
    let mut separator = Separator::new(&graph, config).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert_eq!(cuts.len(), 1);
    let mut crossing = cuts[0].arc_ids();
    crossing.sort();
    assert_eq!(crossing, vec![ArcId(1), ArcId(5)]);
    assert_eq!(separator.stats().connection_cuts, 1);

    let config = SeparationConfig::new(2)
        .with_max_cuts(10)
        .with_dedup(Dedup::Off);
    let mut separator = Separator::new(&graph, config).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert_eq!(cuts.len(), 3);
    assert!(cuts.iter().all(|cut| cut.arc_ids().len() == 2));
}

#[test]
fn connection_budget_bounds_inequalities_per_round() {
    let graph = pendant_graph();
    let mut arcs = vec![0.0; graph.arc_count()];
    arcs[0] = 1.0;
    let nodes = [1.0, 1.0, 0.9, 0.9, 0.9];
    let assignment = Assignment::directed(&arcs, &nodes);

    let config = SeparationConfig::new(2)
        .with_max_cuts(2)
        .with_dedup(Dedup::Off);
    let mut separator = Separator::new(&graph, config).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert_eq!(cuts.len(), 2);
    for cut in &cuts {
        assert!(cut.is_violated(&assignment, 1e-6));
    }
}

#[test]
fn threshold_two_accepts_single_unit_paths() {
    let graph = pendant_graph();
    // node 1 is reached by one unit of flow through 0 -> 1
    let mut arcs = vec![0.0; graph.arc_count()];
    arcs[0] = 1.0;
    let nodes = [1.0, 1.0, 0.0, 0.0, 0.0];
    let assignment = Assignment::directed(&arcs, &nodes);

    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert!(cuts.is_empty());
    assert_eq!(separator.stats().oracle_calls, 1);

    let config = SeparationConfig::new(2).with_connection_threshold(2.0);
    let mut separator = Separator::new(&graph, config).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert_eq!(cuts.len(), 1);
    // the saturated 0 -> 1 leaves only the root on the source side
    let mut crossing = cuts[0].arc_ids();
    crossing.sort();
    assert_eq!(crossing, vec![ArcId(0), ArcId(5)]);
    assert_eq!(cuts[0].lhs(&assignment), Some(1.0));
    assert!(!cuts[0].is_violated(&assignment, 1e-6));
}

#[test]
fn non_finite_values_abort_round() {
    let triangle = Graph::from_edges(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();
    let edges = [f64::NAN; 3];
    let nodes = [1.0; 3];
    let mut separator = Separator::new(&triangle, SeparationConfig::new(2)).unwrap();
    let result = separator.separate(
        Family::CycleElimination,
        SeparationContext::Integral,
        &Assignment::undirected(&edges, &nodes),
    );
    assert!(matches!(
        result,
        Err(SeparationError::InvalidValue {
            what: "edge",
            index: 0,
            ..
        })
    ));

    let graph = pendant_graph();
    let mut separator = Separator::new(&graph, SeparationConfig::new(2)).unwrap();
    let mut arcs = vec![0.0; graph.arc_count()];
    arcs[3] = f64::INFINITY;
    let nodes = [1.0; 5];
    assert!(matches!(
        separator.separate(
            Family::Connection,
            SeparationContext::Integral,
            &Assignment::directed(&arcs, &nodes)
        ),
        Err(SeparationError::InvalidValue {
            what: "arc",
            index: 3,
            ..
        })
    ));

    let arcs = vec![0.0; graph.arc_count()];
    let nodes = [1.0, 1.0, f64::NAN, 0.0, 0.0];
    assert!(matches!(
        separator.separate(
            Family::Connection,
            SeparationContext::Integral,
            &Assignment::directed(&arcs, &nodes)
        ),
        Err(SeparationError::InvalidValue {
            what: "node",
            index: 2,
            ..
        })
    ));
    assert_eq!(separator.stats().aborted_rounds, 2);
    assert_eq!(separator.stats().total_cuts(), 0);
}

#[test]
fn isolated_root_yields_empty_connection_cut() {
    let graph = Graph::from_edges(3, &[(1, 2, 1)]).unwrap();
    let arcs = vec![1.0; graph.arc_count()];
    let nodes = [1.0, 1.0, 1.0];
    let assignment = Assignment::directed(&arcs, &nodes);

    let mut separator = Separator::new(&graph, SeparationConfig::new(1)).unwrap();
    let cuts = separator
        .separate(Family::Connection, SeparationContext::Integral, &assignment)
        .unwrap();
    assert_eq!(cuts.len(), 1);
    assert!(cuts[0].terms.is_empty());
    assert_eq!(cuts[0].to_string(), "0 >= 1");
    assert_eq!(cuts[0].violation(&assignment), Some(1.0));
}
