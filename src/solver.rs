use crate::error::{Error, Result};
use crate::frontier::{Discipline, Frontier, VisitedSet};
use crate::heuristics::{Heuristic, ZeroHeuristic};
use crate::model::StateModel;
use crate::node::{Node, NodeId, SearchTree};
use std::fmt;
use tracing::{debug, info, warn};

/// Expansion cap used when none is configured.
pub const DEFAULT_MAX_EXPANSIONS: usize = 200_000;

/// Search strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Algorithm {
    /// Depth-first: LIFO frontier, first path found wins.
    #[value(name = "dfs")]
    DepthFirst,
    /// Breadth-first: FIFO frontier, first path found wins.
    #[value(name = "bfs")]
    BreadthFirst,
    /// Steepest descent on the heuristic without backtracking.
    Greedy,
    /// Lowest `g + h` first.
    #[value(name = "astar")]
    AStar,
    /// Highest `g + h` first, keeping the costlier path to each state.
    #[value(name = "astar-max")]
    AStarMax,
    /// Lowest `g` first, each edge cost divided by one plus the depth it
    /// leaves from. Always runs with the zero heuristic.
    #[value(name = "astar-discounted")]
    AStarDepthDiscounted,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::DepthFirst,
        Algorithm::BreadthFirst,
        Algorithm::Greedy,
        Algorithm::AStar,
        Algorithm::AStarMax,
        Algorithm::AStarDepthDiscounted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::DepthFirst => "dfs",
            Algorithm::BreadthFirst => "bfs",
            Algorithm::Greedy => "greedy",
            Algorithm::AStar => "astar",
            Algorithm::AStarMax => "astar-max",
            Algorithm::AStarDepthDiscounted => "astar-discounted",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Knobs shared by every driver.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Suppresses per-iteration progress logging.
    pub headless: bool,
    /// Stop with `FailureReason::BudgetExhausted` after this many expansions.
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            headless: false,
            max_expansions: Some(DEFAULT_MAX_EXPANSIONS),
        }
    }
}

impl SearchConfig {
    /// Quiet, with a budget small enough for unit tests.
    pub fn for_testing() -> Self {
        Self {
            headless: true,
            max_expansions: Some(20_000),
        }
    }
}

/// Counters reported after a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Frontier insertions, re-insertions after a cost update included.
    pub opened: usize,
    /// Nodes expanded (moved to the closed set).
    pub closed: usize,
    /// Deepest node generated.
    pub max_depth: usize,
}

/// Why a search ended without a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The frontier emptied.
    Exhausted,
    /// Greedy descent reached a node without admissible successors.
    DeadEnd,
    /// `max_expansions` was reached.
    BudgetExhausted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::Exhausted => "search space exhausted",
            FailureReason::DeadEnd => "dead end",
            FailureReason::BudgetExhausted => "expansion budget exhausted",
        };
        f.write_str(text)
    }
}

/// Root-to-goal path found by a search.
#[derive(Clone, Debug)]
pub struct Solution<S: StateModel> {
    /// Nodes from the root (first) to the terminal node (last).
    pub path: Vec<Node<S>>,
    /// `moves[i]` leads from `path[i]` to `path[i + 1]`.
    pub moves: Vec<S::Move>,
}

impl<S: StateModel> Solution<S> {
    fn extract(tree: &SearchTree<S>, goal: NodeId) -> Self {
        Solution {
            path: tree.path(goal).into_iter().map(|id| tree.get(id).clone()).collect(),
            moves: tree.moves_list(goal),
        }
    }

    /// Accumulated edge cost of the path.
    pub fn cost(&self) -> f64 {
        self.path.last().map_or(0.0, |node| node.g_cost)
    }

    pub fn final_state(&self) -> Option<&S> {
        self.path.last().map(|node| &node.state)
    }
}

#[derive(Clone, Debug)]
pub enum SearchResult<S: StateModel> {
    Success(Solution<S>),
    Failure(FailureReason),
}

impl<S: StateModel> SearchResult<S> {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchResult::Success(_))
    }

    pub fn solution(&self) -> Option<&Solution<S>> {
        match self {
            SearchResult::Success(solution) => Some(solution),
            SearchResult::Failure(_) => None,
        }
    }

    pub fn moves(&self) -> &[S::Move] {
        match self.solution() {
            Some(solution) => &solution.moves,
            None => &[],
        }
    }
}

/// How a successor whose state is already open competes with the open node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Admission {
    /// The first node to reach a state keeps it.
    FirstFound,
    /// A strictly cheaper path re-parents the open node.
    Minimize,
    /// A strictly costlier path re-parents the open node.
    Maximize,
}

impl Admission {
    fn improves(self, tentative_g: f64, open_g: f64) -> bool {
        match self {
            Admission::FirstFound => false,
            Admission::Minimize => tentative_g < open_g,
            Admission::Maximize => tentative_g > open_g,
        }
    }
}

fn budget_spent(config: &SearchConfig, stats: &SearchStats) -> bool {
    config.max_expansions.map_or(false, |limit| stats.closed >= limit)
}

/// Shared open/closed loop behind DFS, BFS and the A* variants.
///
/// With `discount_by_depth` an edge leaving a node at depth `d` costs
/// `edge_cost / (1 + d)`.
fn graph_search<S: StateModel>(
    initial: S,
    heuristic: &dyn Heuristic<S>,
    discipline: Discipline,
    admission: Admission,
    discount_by_depth: bool,
    config: &SearchConfig,
    stats: &mut SearchStats,
) -> Result<SearchResult<S>> {
    let uses_heuristic = admission != Admission::FirstFound;
    let mut tree = SearchTree::new(initial);
    let mut frontier = Frontier::new(discipline);
    let mut visited = VisitedSet::new();

    let root = tree.root();
    let h = if uses_heuristic {
        heuristic.evaluate(&tree.get(root).state)
    } else {
        0.0
    };
    tree.get_mut(root).update_f_cost(0.0, h);
    frontier.insert(tree.get(root).state.clone(), root, h);
    stats.opened += 1;

    while let Some(entry) = frontier.pop() {
        let node = tree.get(entry.id);
        if node.revision != entry.revision || visited.contains(&node.state) {
            continue;
        }
        if budget_spent(config, stats) {
            warn!(limit = stats.closed, "expansion budget reached");
            return Ok(SearchResult::Failure(FailureReason::BudgetExhausted));
        }

        let state = node.state.clone();
        frontier.close(&state);
        visited.insert(state);
        stats.closed += 1;
        if !config.headless {
            debug!(
                opened = stats.opened,
                closed = stats.closed,
                queued = frontier.len(),
                open = frontier.open_len(),
                depth = node.depth,
                f = node.f_cost,
                "expanding"
            );
        }

        if node.state.is_terminal() {
            return Ok(SearchResult::Success(Solution::extract(&tree, entry.id)));
        }

        for mut child in tree.successors(entry.id) {
            let parent = tree.get(entry.id);
            let mut cost = parent.state.edge_cost(&child.state);
            if discount_by_depth {
                cost /= 1.0 + parent.depth as f64;
            }
            if admission == Admission::Maximize && cost < 0.0 {
                return Err(Error::NegativeEdgeCost {
                    cost,
                    depth: child.depth,
                });
            }
            if visited.contains(&child.state) {
                continue;
            }

            let tentative_g = parent.g_cost + cost;
            let h = if uses_heuristic {
                heuristic.evaluate(&child.state)
            } else {
                0.0
            };
            child.update_f_cost(tentative_g, h);
            let (f, depth) = (child.f_cost, child.depth);

            match frontier.open_node(&child.state) {
                None => {
                    let key = child.state.clone();
                    let id = tree.allocate(child);
                    frontier.insert(key, id, f);
                }
                Some(open_id) if admission.improves(tentative_g, tree.get(open_id).g_cost) => {
                    tree.reparent(open_id, child);
                    frontier.requeue(open_id, tree.get(open_id).revision, f);
                }
                Some(_) => continue,
            }
            stats.opened += 1;
            stats.max_depth = stats.max_depth.max(depth);
        }
    }

    Ok(SearchResult::Failure(FailureReason::Exhausted))
}

/// Steepest descent: always step to the successor with the lowest estimate,
/// the first one in move order on ties, never backtracking.
fn greedy_descent<S: StateModel>(
    initial: S,
    heuristic: &dyn Heuristic<S>,
    config: &SearchConfig,
    stats: &mut SearchStats,
) -> SearchResult<S> {
    let mut tree = SearchTree::new(initial);
    let mut current = tree.root();
    stats.opened += 1;

    loop {
        if budget_spent(config, stats) {
            warn!(limit = stats.closed, "expansion budget reached");
            return SearchResult::Failure(FailureReason::BudgetExhausted);
        }
        stats.closed += 1;

        let node = tree.get(current);
        stats.max_depth = stats.max_depth.max(node.depth);
        if !config.headless {
            debug!(depth = node.depth, h = node.f_cost - node.g_cost, "descending");
        }
        if node.state.is_terminal() {
            return SearchResult::Success(Solution::extract(&tree, current));
        }

        let mut best: Option<Node<S>> = None;
        for mut child in tree.successors_excluding_ancestors(current) {
            stats.opened += 1;
            let g = node.g_cost + node.state.edge_cost(&child.state);
            child.update_f_cost(g, heuristic.evaluate(&child.state));
            let h = child.f_cost - child.g_cost;
            if best.as_ref().map_or(true, |b| h < b.f_cost - b.g_cost) {
                best = Some(child);
            }
        }

        match best {
            Some(child) => current = tree.allocate(child),
            None => return SearchResult::Failure(FailureReason::DeadEnd),
        }
    }
}

/// Runs `algorithm` from `initial` to completion.
///
/// # Returns
/// * `Ok((result, stats))`; a search that finds no terminal state still returns `Ok`.
/// * `Err(Error::NegativeEdgeCost)` if A*-max meets an edge with negative cost.
pub fn search<S: StateModel>(
    algorithm: Algorithm,
    initial: S,
    heuristic: &dyn Heuristic<S>,
    config: &SearchConfig,
) -> Result<(SearchResult<S>, SearchStats)> {
    let mut stats = SearchStats::default();
    let result = match algorithm {
        Algorithm::DepthFirst => graph_search(
            initial,
            heuristic,
            Discipline::Lifo,
            Admission::FirstFound,
            false,
            config,
            &mut stats,
        )?,
        Algorithm::BreadthFirst => graph_search(
            initial,
            heuristic,
            Discipline::Fifo,
            Admission::FirstFound,
            false,
            config,
            &mut stats,
        )?,
        Algorithm::Greedy => greedy_descent(initial, heuristic, config, &mut stats),
        Algorithm::AStar => graph_search(
            initial,
            heuristic,
            Discipline::LowestCost,
            Admission::Minimize,
            false,
            config,
            &mut stats,
        )?,
        Algorithm::AStarMax => graph_search(
            initial,
            heuristic,
            Discipline::HighestCost,
            Admission::Maximize,
            false,
            config,
            &mut stats,
        )?,
        Algorithm::AStarDepthDiscounted => graph_search(
            initial,
            &ZeroHeuristic,
            Discipline::LowestCost,
            Admission::Minimize,
            true,
            config,
            &mut stats,
        )?,
    };
    Ok((result, stats))
}

/// A finished search whose plan is handed out one move at a time.
///
/// # Examples
/// ```
/// use threes_solver::engine::ThreesState;
/// use threes_solver::heuristics::ZeroHeuristic;
/// use threes_solver::solver::{Algorithm, SearchConfig, Solver};
///
/// let state: ThreesState<2> = ThreesState::new(1);
/// let mut solver = Solver::new(Algorithm::BreadthFirst, state, &ZeroHeuristic, &SearchConfig::for_testing()).unwrap();
/// let planned = solver.result().moves().len();
/// let mut played = 0;
/// while solver.get_next_move().is_some() {
///     played += 1;
/// }
/// assert_eq!(played, planned);
/// ```
#[derive(Debug)]
pub struct Solver<S: StateModel> {
    algorithm: Algorithm,
    result: SearchResult<S>,
    stats: SearchStats,
    cursor: usize,
}

impl<S: StateModel> Solver<S> {
    /// Runs the whole search before returning.
    pub fn new(
        algorithm: Algorithm,
        initial: S,
        heuristic: &dyn Heuristic<S>,
        config: &SearchConfig,
    ) -> Result<Self> {
        let (result, stats) = search(algorithm, initial, heuristic, config)?;
        match &result {
            SearchResult::Success(solution) => info!(
                %algorithm,
                heuristic = heuristic.name(),
                moves = solution.moves.len(),
                cost = solution.cost(),
                opened = stats.opened,
                closed = stats.closed,
                max_depth = stats.max_depth,
                "search succeeded"
            ),
            SearchResult::Failure(reason) => info!(
                %algorithm,
                heuristic = heuristic.name(),
                %reason,
                opened = stats.opened,
                closed = stats.closed,
                max_depth = stats.max_depth,
                "search failed"
            ),
        }
        Ok(Solver {
            algorithm,
            result,
            stats,
            cursor: 0,
        })
    }

    /// Next planned move, or `None` once the plan is used up or if the search failed.
    pub fn get_next_move(&mut self) -> Option<S::Move> {
        let mv = self.result.moves().get(self.cursor).copied()?;
        self.cursor += 1;
        Some(mv)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn result(&self) -> &SearchResult<S> {
        &self.result
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}
