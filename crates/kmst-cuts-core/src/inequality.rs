use std::fmt;

use crate::graph::{ArcId, EdgeId, NodeId};
use crate::separation::Family;
use crate::SeparationError;

/// A selection variable of one of the k-MST formulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Var {
    Edge(EdgeId),
    Arc(ArcId),
    Node(NodeId),
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Edge(edge) => write!(f, "x_e{}", edge.0),
            Var::Arc(arc) => write!(f, "x_a{}", arc.0),
            Var::Node(node) => write!(f, "z_{}", node.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub var: Var,
    pub coef: f64,
}

impl Term {
    pub fn new(var: Var, coef: f64) -> Self {
        Self { var, coef }
    }

    pub fn unit(var: Var) -> Self {
        Self::new(var, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
}

/// Current values of the selection variables, as read from the engine.
///
/// Formulations without arc (or edge) variables pass an empty slice; a
/// separation family that needs the missing slice fails the round.
#[derive(Debug, Clone, Copy)]
pub struct Assignment<'a> {
    edges: &'a [f64],
    arcs: &'a [f64],
    nodes: &'a [f64],
}

impl<'a> Assignment<'a> {
    pub fn new(edges: &'a [f64], arcs: &'a [f64], nodes: &'a [f64]) -> Self {
        Self { edges, arcs, nodes }
    }

    /// Edge and node values only (cycle-elimination formulation).
    pub fn undirected(edges: &'a [f64], nodes: &'a [f64]) -> Self {
        Self::new(edges, &[], nodes)
    }

    /// Arc and node values only (directed connection formulation).
    pub fn directed(arcs: &'a [f64], nodes: &'a [f64]) -> Self {
        Self::new(&[], arcs, nodes)
    }

    pub fn edges(&self) -> &'a [f64] {
        self.edges
    }

    pub fn arcs(&self) -> &'a [f64] {
        self.arcs
    }

    pub fn nodes(&self) -> &'a [f64] {
        self.nodes
    }

    pub fn value(&self, var: Var) -> Option<f64> {
        match var {
            Var::Edge(edge) => self.edges.get(edge.0).copied(),
            Var::Arc(arc) => self.arcs.get(arc.0).copied(),
            Var::Node(node) => self.nodes.get(node.0).copied(),
        }
    }

    pub(crate) fn edge_values(&self, expected: usize) -> Result<&'a [f64], SeparationError> {
        checked("edge", self.edges, expected)
    }

    pub(crate) fn arc_values(&self, expected: usize) -> Result<&'a [f64], SeparationError> {
        checked("arc", self.arcs, expected)
    }

    pub(crate) fn node_values(&self, expected: usize) -> Result<&'a [f64], SeparationError> {
        checked("node", self.nodes, expected)
    }
}

fn checked<'a>(
    what: &'static str,
    values: &'a [f64],
    expected: usize,
) -> Result<&'a [f64], SeparationError> {
    if values.len() != expected {
        return Err(SeparationError::AssignmentLength {
            what,
            expected,
            actual: values.len(),
        });
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SeparationError::InvalidValue { what, index, value });
    }
    Ok(values)
}

/// Linear inequality over selection variables, valid for every integral
/// rooted k-tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Inequality {
    pub family: Family,
    pub terms: Vec<Term>,
    pub sense: Sense,
    pub rhs: f64,
}

impl Inequality {
    pub fn new(family: Family, terms: Vec<Term>, sense: Sense, rhs: f64) -> Self {
        Self {
            family,
            terms,
            sense,
            rhs,
        }
    }

    /// Left-hand side at `assignment`, or `None` if a variable has no value.
    pub fn lhs(&self, assignment: &Assignment<'_>) -> Option<f64> {
        self.terms.iter().try_fold(0.0, |acc, term| {
            assignment.value(term.var).map(|value| acc + term.coef * value)
        })
    }

    /// Amount by which `assignment` violates the inequality; positive means violated.
    pub fn violation(&self, assignment: &Assignment<'_>) -> Option<f64> {
        let lhs = self.lhs(assignment)?;
        Some(match self.sense {
            Sense::Le => lhs - self.rhs,
            Sense::Ge => self.rhs - lhs,
        })
    }

    pub fn is_violated(&self, assignment: &Assignment<'_>, tol: f64) -> bool {
        self.violation(assignment)
            .map(|violation| violation > tol)
            .unwrap_or(false)
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.terms
            .iter()
            .filter_map(|term| match term.var {
                Var::Edge(edge) => Some(edge),
                _ => None,
            })
            .collect()
    }

    pub fn arc_ids(&self) -> Vec<ArcId> {
        self.terms
            .iter()
            .filter_map(|term| match term.var {
                Var::Arc(arc) => Some(arc),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Inequality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (idx, term) in self.terms.iter().enumerate() {
            let magnitude = term.coef.abs();
            if idx == 0 {
                if term.coef < 0.0 {
                    write!(f, "-")?;
                }
            } else if term.coef < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            if magnitude != 1.0 {
                write!(f, "{magnitude}*")?;
            }
            write!(f, "{}", term.var)?;
        }
        let op = match self.sense {
            Sense::Le => "<=",
            Sense::Ge => ">=",
        };
        write!(f, " {op} {}", self.rhs)
    }
}
