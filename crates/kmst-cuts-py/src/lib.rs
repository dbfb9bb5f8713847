#![allow(clippy::useless_conversion)]

use kmst_cuts_core::{
    Assignment, CutPolicy, Dedup, Family, Graph, Inequality, SeparationConfig,
    SeparationContext, SeparationError, Sense, Separator, Var,
};
use numpy::PyReadonlyArray1;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

fn build_graph(
    n: usize,
    v1: PyReadonlyArray1<'_, i64>,
    v2: PyReadonlyArray1<'_, i64>,
    weight: PyReadonlyArray1<'_, i64>,
) -> PyResult<Graph> {
    let v1_slice = v1.as_slice()?;
    let v2_slice = v2.as_slice()?;
    let weight_slice = weight.as_slice()?;
    if v1_slice.len() != v2_slice.len() || weight_slice.len() != v1_slice.len() {
        return Err(pyo3::exceptions::PyValueError::new_err(
            "v1, v2 and weight arrays must match length",
        ));
    }
    let mut edges = Vec::with_capacity(v1_slice.len());
    for ((&a, &b), &w) in v1_slice.iter().zip(v2_slice.iter()).zip(weight_slice.iter()) {
        let a = usize::try_from(a)
            .map_err(|_| pyo3::exceptions::PyValueError::new_err("v1 index out of range"))?;
        let b = usize::try_from(b)
            .map_err(|_| pyo3::exceptions::PyValueError::new_err("v2 index out of range"))?;
        edges.push((a, b, w));
    }
    Graph::from_edges(n, &edges).map_err(|err| pyo3::exceptions::PyValueError::new_err(err.to_string()))
}

#[allow(clippy::too_many_arguments)]
fn build_config(
    k: usize,
    eps: Option<f64>,
    support_tolerance: Option<f64>,
    max_cuts: Option<usize>,
    connection_threshold: Option<f64>,
    dedup: Option<bool>,
    skip_unselected_nodes: Option<bool>,
    policy: Option<String>,
    seed: Option<u64>,
) -> PyResult<SeparationConfig> {
    let mut config = SeparationConfig::new(k);
    if let Some(value) = eps {
        config.eps = value;
    }
    if let Some(value) = support_tolerance {
        config.support_tolerance = value;
    }
    if let Some(value) = max_cuts {
        config.max_cuts = value;
    }
    if let Some(value) = connection_threshold {
        config.connection_threshold = value;
    }
    if let Some(value) = dedup {
        config.dedup = if value { Dedup::CoveredElements } else { Dedup::Off };
    }
    if let Some(value) = skip_unselected_nodes {
        config.skip_unselected_nodes = value;
    }
    if let Some(value) = seed {
        config.seed = value;
    }
    if let Some(mode) = policy {
        let normalized = mode.to_ascii_lowercase();
        config.policy = match normalized.as_str() {
            "lazy_only" | "lazy-only" | "lazyonly" => CutPolicy::LazyOnly,
            "cycle_cuts_early" | "cycle-cuts-early" | "cyclecutsearly" => {
                CutPolicy::CycleCutsEarly
            }
            "all_early" | "all-early" | "allearly" => CutPolicy::AllEarly,
            _ => {
                return Err(pyo3::exceptions::PyValueError::new_err(
                    "policy must be 'lazy_only', 'cycle_cuts_early', or 'all_early'",
                ))
            }
        };
    }
    Ok(config)
}

fn parse_context(fractional: bool) -> SeparationContext {
    if fractional {
        SeparationContext::Fractional
    } else {
        SeparationContext::Integral
    }
}

fn family_label(family: Family) -> &'static str {
    match family {
        Family::CycleElimination => "cycle_elimination",
        Family::Connection => "connection",
    }
}

fn inequality_to_dict(py: Python<'_>, cut: &Inequality) -> PyResult<PyObject> {
    let dict = PyDict::new_bound(py);
    dict.set_item("family", family_label(cut.family))?;
    dict.set_item(
        "sense",
        match cut.sense {
            Sense::Le => "<=",
            Sense::Ge => ">=",
        },
    )?;
    dict.set_item("rhs", cut.rhs)?;
    let mut edges = Vec::new();
    let mut arcs = Vec::new();
    let mut nodes = Vec::new();
    let mut coefficients = Vec::with_capacity(cut.terms.len());
    for term in &cut.terms {
        match term.var {
            Var::Edge(edge) => edges.push(edge.0),
            Var::Arc(arc) => arcs.push(arc.0),
            Var::Node(node) => nodes.push(node.0),
        }
        coefficients.push(term.coef);
    }
    dict.set_item("edges", edges)?;
    dict.set_item("arcs", arcs)?;
    dict.set_item("nodes", nodes)?;
    dict.set_item("coefficients", coefficients)?;
    dict.set_item("text", cut.to_string())?;
    Ok(dict.to_object(py))
}

fn run_round(
    py: Python<'_>,
    graph: &Graph,
    config: SeparationConfig,
    family: Family,
    context: SeparationContext,
    assignment: &Assignment<'_>,
) -> PyResult<PyObject> {
    let mut separator = Separator::new(graph, config)
        .map_err(|err| pyo3::exceptions::PyValueError::new_err(err.to_string()))?;
    let cuts = separator
        .separate(family, context, assignment)
        .map_err(|err| match err {
            SeparationError::AssignmentLength { .. } | SeparationError::InvalidValue { .. } => {
                pyo3::exceptions::PyValueError::new_err(err.to_string())
            }
            SeparationError::Oracle(_) => pyo3::exceptions::PyRuntimeError::new_err(err.to_string()),
        })?;
    let list = PyList::empty_bound(py);
    for cut in &cuts {
        list.append(inequality_to_dict(py, cut)?)?;
    }
    Ok(list.to_object(py))
}

#[allow(clippy::too_many_arguments, clippy::useless_conversion)]
#[pyfunction]
#[pyo3(signature = (
    n,
    v1,
    v2,
    weight,
    edge_values,
    node_values,
    k,
    *,
    fractional = false,
    eps = None,
    support_tolerance = None,
    max_cuts = None,
    dedup = None,
    policy = None,
    seed = None
))]
fn separate_cycle_elimination(
    py: Python<'_>,
    n: usize,
    v1: PyReadonlyArray1<'_, i64>,
    v2: PyReadonlyArray1<'_, i64>,
    weight: PyReadonlyArray1<'_, i64>,
    edge_values: PyReadonlyArray1<'_, f64>,
    node_values: PyReadonlyArray1<'_, f64>,
    k: usize,
    fractional: bool,
    eps: Option<f64>,
    support_tolerance: Option<f64>,
    max_cuts: Option<usize>,
    dedup: Option<bool>,
    policy: Option<String>,
    seed: Option<u64>,
) -> PyResult<PyObject> {
    let graph = build_graph(n, v1, v2, weight)?;
    let config = build_config(
        k,
        eps,
        support_tolerance,
        max_cuts,
        None,
        dedup,
        None,
        policy,
        seed,
    )?;
    let edge_slice = edge_values.as_slice()?;
    let node_slice = node_values.as_slice()?;
    let assignment = Assignment::undirected(edge_slice, node_slice);
    run_round(
        py,
        &graph,
        config,
        Family::CycleElimination,
        parse_context(fractional),
        &assignment,
    )
}

#[allow(clippy::too_many_arguments, clippy::useless_conversion)]
#[pyfunction]
#[pyo3(signature = (
    n,
    v1,
    v2,
    weight,
    arc_values,
    node_values,
    k,
    *,
    fractional = false,
    eps = None,
    support_tolerance = None,
    max_cuts = None,
    connection_threshold = None,
    dedup = None,
    skip_unselected_nodes = None,
    policy = None,
    seed = None
))]
fn separate_connection(
    py: Python<'_>,
    n: usize,
    v1: PyReadonlyArray1<'_, i64>,
    v2: PyReadonlyArray1<'_, i64>,
    weight: PyReadonlyArray1<'_, i64>,
    arc_values: PyReadonlyArray1<'_, f64>,
    node_values: PyReadonlyArray1<'_, f64>,
    k: usize,
    fractional: bool,
    eps: Option<f64>,
    support_tolerance: Option<f64>,
    max_cuts: Option<usize>,
    connection_threshold: Option<f64>,
    dedup: Option<bool>,
    skip_unselected_nodes: Option<bool>,
    policy: Option<String>,
    seed: Option<u64>,
) -> PyResult<PyObject> {
    let graph = build_graph(n, v1, v2, weight)?;
    let config = build_config(
        k,
        eps,
        support_tolerance,
        max_cuts,
        connection_threshold,
        dedup,
        skip_unselected_nodes,
        policy,
        seed,
    )?;
    let arc_slice = arc_values.as_slice()?;
    let node_slice = node_values.as_slice()?;
    let assignment = Assignment::directed(arc_slice, node_slice);
    run_round(
        py,
        &graph,
        config,
        Family::Connection,
        parse_context(fractional),
        &assignment,
    )
}

/// Arc list `(tail, head)` in the order connection values are indexed by.
#[pyfunction]
fn arc_endpoints(
    n: usize,
    v1: PyReadonlyArray1<'_, i64>,
    v2: PyReadonlyArray1<'_, i64>,
    weight: PyReadonlyArray1<'_, i64>,
) -> PyResult<Vec<(usize, usize)>> {
    let graph = build_graph(n, v1, v2, weight)?;
    Ok(graph.arc_endpoints())
}

#[pymodule]
fn _core(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add("__version__", env!("CARGO_PKG_VERSION"))?;
    module.add_function(wrap_pyfunction!(separate_cycle_elimination, module)?)?;
    module.add_function(wrap_pyfunction!(separate_connection, module)?)?;
    module.add_function(wrap_pyfunction!(arc_endpoints, module)?)?;
    module.add("__doc__", "Rust core bindings for kmst-cuts")?;
    module.add(
        "__all__",
        vec![
            "separate_cycle_elimination",
            "separate_connection",
            "arc_endpoints",
            "__version__",
        ],
    )?;
    Ok(())
}
