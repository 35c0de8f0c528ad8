//! Hand-built graphs for exercising the search drivers.
use crate::engine::Move;
use crate::heuristics::Heuristic;
use crate::model::StateModel;
use std::hash::{Hash, Hasher};

/// Outgoing edge per move (`Move::ALL` order): target vertex and cost.
pub(crate) type Edges = [Option<(u8, f64)>; 4];

/// A vertex of a static graph. Vertices without edges are terminal.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GraphState {
    graph: &'static [Edges],
    at: u8,
}

impl GraphState {
    pub(crate) fn new(graph: &'static [Edges], at: u8) -> Self {
        GraphState { graph, at }
    }

    pub(crate) fn at(&self) -> u8 {
        self.at
    }
}

impl PartialEq for GraphState {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl Eq for GraphState {}

impl Hash for GraphState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.at.hash(state);
    }
}

impl StateModel for GraphState {
    type Move = Move;

    const MOVES: &'static [Move] = &Move::ALL;

    fn apply(&mut self, mv: Move) -> bool {
        let slot = Move::ALL.iter().position(|&m| m == mv).unwrap_or(0);
        match self.graph[self.at as usize][slot] {
            Some((to, _)) => {
                self.at = to;
                true
            }
            None => false,
        }
    }

    fn is_terminal(&self) -> bool {
        self.graph[self.at as usize].iter().all(Option::is_none)
    }

    fn edge_cost(&self, successor: &Self) -> f64 {
        self.graph[self.at as usize]
            .iter()
            .flatten()
            .find(|(to, _)| *to == successor.at)
            .map_or(0.0, |&(_, cost)| cost)
    }
}

/// Per-vertex heuristic values.
pub(crate) struct TableHeuristic(pub &'static [f64]);

impl Heuristic<GraphState> for TableHeuristic {
    fn evaluate(&self, state: &GraphState) -> f64 {
        self.0[state.at() as usize]
    }
}

const NONE: Edges = [None; 4];

/// 0 -Up-> 1 -Down-> 0. No terminal vertex is reachable.
pub(crate) static LOOP_GRAPH: [Edges; 2] = [
    [Some((1, 1.0)), None, None, None],
    [None, None, Some((0, 1.0)), None],
];

/// Two routes to vertex 3; the one found second is cheaper.
///
/// ```text
/// 0 -Up(5)-> 1 -Up(1)-> 3 -Up(1)-> 4
/// 0 -Right(1)-> 2 -Up(10)-> 3
/// ```
pub(crate) static DIAMOND: [Edges; 5] = [
    [Some((1, 5.0)), Some((2, 1.0)), None, None],
    [Some((3, 1.0)), None, None, None],
    [Some((3, 10.0)), None, None, None],
    [Some((4, 1.0)), None, None, None],
    NONE,
];

/// Vertex 3 is cheap to reach through 1 and dear through 2; 3 -> 4 is very expensive.
pub(crate) static TRAP: [Edges; 5] = [
    [Some((1, 1.0)), Some((2, 1.0)), None, None],
    [Some((3, 1.0)), None, None, None],
    [Some((3, 5.0)), None, None, None],
    [Some((4, 200.0)), None, None, None],
    NONE,
];

/// A direct edge to 3, or a three-step route whose last edge is the same price.
///
/// ```text
/// 0 -Up(3)-> 3
/// 0 -Right(1)-> 1 -Up(1)-> 2 -Up(3)-> 3
/// ```
pub(crate) static DISCOUNT: [Edges; 4] = [
    [Some((3, 3.0)), Some((1, 1.0)), None, None],
    [Some((2, 1.0)), None, None, None],
    [Some((3, 3.0)), None, None, None],
    NONE,
];

/// A single edge with a negative cost.
pub(crate) static NEGATIVE: [Edges; 2] = [[Some((1, -2.0)), None, None, None], NONE];
