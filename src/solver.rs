//! State-space search over board positions.
//!
//! Two strategies share one loop: depth-first exploration with a LIFO
//! stack, and A* with a cost-ordered heap. Every state generated during
//! a run lives in an append-only arena until the run ends; parent links
//! are arena indices, and the solution path is recovered by walking
//! them back to the root. Visited positions are pruned with an
//! FxHashSet of board fingerprints.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::grid::{Board, Direction, Fingerprint};
use crate::pieces::Coord;

/// Search strategy selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Uninformed depth-first search; finds a path, not necessarily a
    /// shortest one.
    DepthFirst,
    /// A* with the Manhattan-distance heuristic; finds a shortest path.
    AStar,
}

/// Counters reported alongside every search outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier and expanded.
    pub nodes_expanded: usize,
    /// States created and pushed onto the frontier, root included.
    pub nodes_generated: usize,
}

/// Terminal result of one search run.
///
/// An exhausted search is a valid outcome, not an error; callers must
/// handle it separately from board-construction failures.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    /// The goal block reached the target region. The path runs from the
    /// initial board to the goal board, one slide per step.
    Solved { path: Vec<Board>, stats: SearchStats },
    /// The reachable state space was exhausted without a solution.
    Exhausted { stats: SearchStats },
}

impl SearchOutcome {
    /// The solution path, if one was found.
    pub fn path(&self) -> Option<&[Board]> {
        match self {
            SearchOutcome::Solved { path, .. } => Some(path),
            SearchOutcome::Exhausted { .. } => None,
        }
    }

    pub fn stats(&self) -> SearchStats {
        match self {
            SearchOutcome::Solved { stats, .. } => *stats,
            SearchOutcome::Exhausted { stats } => *stats,
        }
    }
}

/// One node of the implicit search tree.
struct SearchState {
    board: Board,
    /// Path length from the root.
    depth: u32,
    /// f-value under A* (depth plus heuristic); zero under depth-first.
    cost: u32,
    /// Arena index of the state this one was generated from.
    parent: Option<usize>,
}

/// Heap entry for the A* frontier.
///
/// Comparisons are reversed so `BinaryHeap` pops the lowest cost first;
/// the sequence number breaks cost ties first-in-first-out, which keeps
/// results deterministic.
#[derive(PartialEq, Eq)]
struct HeapEntry {
    cost: u32,
    seq: u64,
    index: usize,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Frontier of pending states: LIFO for depth-first, cost-ordered with
/// FIFO tie-breaking for A*.
enum Frontier {
    Stack(Vec<usize>),
    Heap { heap: BinaryHeap<HeapEntry>, seq: u64 },
}

impl Frontier {
    fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::DepthFirst => Frontier::Stack(Vec::new()),
            Algorithm::AStar => Frontier::Heap {
                heap: BinaryHeap::new(),
                seq: 0,
            },
        }
    }

    fn push(&mut self, index: usize, cost: u32) {
        match self {
            Frontier::Stack(stack) => stack.push(index),
            Frontier::Heap { heap, seq } => {
                heap.push(HeapEntry {
                    cost,
                    seq: *seq,
                    index,
                });
                *seq += 1;
            }
        }
    }

    fn pop(&mut self) -> Option<usize> {
        match self {
            Frontier::Stack(stack) => stack.pop(),
            Frontier::Heap { heap, .. } => heap.pop().map(|entry| entry.index),
        }
    }
}

/// Admissible estimate of the remaining moves: Manhattan distance from
/// the goal block's anchor to the target anchor. Never overestimates,
/// since every slide moves an anchor by exactly one cell.
pub fn heuristic(board: &Board, target: Coord) -> u32 {
    let (gx, gy) = board.goal_anchor();
    ((gx - target.0).abs() + (gy - target.1).abs()) as u32
}

/// Every board reachable from `board` by sliding exactly one piece one
/// cell: piece-list order first, then up, down, left, right.
///
/// States already seen via a different move order are not suppressed
/// here; the engine's explored set resolves duplicates.
pub fn successors(board: &Board) -> Vec<Board> {
    let mut next = Vec::new();
    for piece_index in 0..board.pieces().len() {
        for direction in Direction::ALL {
            if let Some(moved) = board.slide(piece_index, direction) {
                next.push(moved);
            }
        }
    }
    next
}

/// Searches from `initial` until the goal block covers the 2x2 region
/// anchored at `target`, or the reachable state space is exhausted.
pub fn solve(initial: Board, target: Coord, algorithm: Algorithm) -> SearchOutcome {
    let mut stats = SearchStats::default();
    let mut arena: Vec<SearchState> = Vec::new();
    let mut explored: FxHashSet<Fingerprint> = FxHashSet::default();
    let mut frontier = Frontier::new(algorithm);

    let root = SearchState {
        cost: match algorithm {
            Algorithm::DepthFirst => 0,
            Algorithm::AStar => heuristic(&initial, target),
        },
        board: initial,
        depth: 0,
        parent: None,
    };
    let root_cost = root.cost;
    arena.push(root);
    frontier.push(0, root_cost);
    stats.nodes_generated = 1;

    while let Some(index) = frontier.pop() {
        if !explored.insert(arena[index].board.fingerprint()) {
            continue;
        }
        if arena[index].board.goal_reached(target) {
            log::debug!(
                "goal reached at depth {} after {} expansions",
                arena[index].depth,
                stats.nodes_expanded
            );
            return SearchOutcome::Solved {
                path: extract_path(&arena, index),
                stats,
            };
        }
        stats.nodes_expanded += 1;

        let depth = arena[index].depth + 1;
        for board in successors(&arena[index].board) {
            let state = SearchState {
                cost: match algorithm {
                    Algorithm::DepthFirst => 0,
                    Algorithm::AStar => depth + heuristic(&board, target),
                },
                board,
                depth,
                parent: Some(index),
            };
            let cost = state.cost;
            arena.push(state);
            frontier.push(arena.len() - 1, cost);
            stats.nodes_generated += 1;
        }
    }

    log::debug!(
        "state space exhausted after {} expansions",
        stats.nodes_expanded
    );
    SearchOutcome::Exhausted { stats }
}

/// Walks parent links from the goal state back to the root, then
/// reverses the chain into root-to-goal order.
fn extract_path(arena: &[SearchState], goal_index: usize) -> Vec<Board> {
    let mut path = Vec::new();
    let mut current = Some(goal_index);
    while let Some(index) = current {
        path.push(arena[index].board.clone());
        current = arena[index].parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::parse_board;

    /// Goal at (1, 0) hemmed in by vertical dominoes, two horizontal
    /// dominoes filling row 2, two singles in row 3. Solvable in 29
    /// moves.
    const OPEN_BOARD: &str = "\
^11^
v11v
<><>
2..2
....
";

    /// The classic Hua Rong Dao starting layout, solvable in 116
    /// single-cell slides.
    const CLASSIC_BOARD: &str = "\
^11^
v11v
^<>^
v22v
2..2
";

    /// Goal already parked in the bottom-center target region.
    const SOLVED_BOARD: &str = "\
....
....
....
.11.
.11.
";

    /// A board with no empty cell at all.
    const PACKED_BOARD: &str = "\
11
11
<>
";

    const TARGET: (i32, i32) = (1, 3);

    #[test]
    fn test_heuristic_is_anchor_distance() {
        let board = parse_board(OPEN_BOARD).unwrap();
        assert_eq!(heuristic(&board, TARGET), 3);
        let solved = parse_board(SOLVED_BOARD).unwrap();
        assert_eq!(heuristic(&solved, TARGET), 0);
    }

    #[test]
    fn test_successors_differ_by_one_piece_one_cell() {
        let board = parse_board(OPEN_BOARD).unwrap();
        let next = successors(&board);
        assert!(!next.is_empty());

        for succ in &next {
            let moved: Vec<_> = board
                .pieces()
                .iter()
                .zip(succ.pieces())
                .filter(|(before, after)| before != after)
                .collect();
            assert_eq!(moved.len(), 1, "exactly one piece moved");
            let (before, after) = moved[0];
            assert_eq!(before.kind, after.kind);
            let step = (before.x - after.x).abs() + (before.y - after.y).abs();
            assert_eq!(step, 1, "moved by exactly one cell along one axis");

            // every newly covered cell was empty in the parent board
            for (x, y) in after.cells() {
                if !before.covers(x, y) {
                    assert_eq!(board.cell(x, y), crate::grid::Cell::Empty);
                }
            }
        }
    }

    #[test]
    fn test_open_board_successor_count() {
        let board = parse_board(OPEN_BOARD).unwrap();
        let next = successors(&board);
        // only the row-3 singles can move, two directions each; the
        // dominoes and the goal block are all pinned
        assert_eq!(next.len(), 4);
    }

    #[test]
    fn test_solve_open_board_both_strategies() {
        let board = parse_board(OPEN_BOARD).unwrap();

        let astar = solve(board.clone(), TARGET, Algorithm::AStar);
        let astar_path = astar.path().expect("A* solves the open board");
        assert!(astar_path.last().unwrap().goal_reached(TARGET));
        assert_eq!(astar_path.len(), 30, "29 moves is optimal");

        let dfs = solve(board, TARGET, Algorithm::DepthFirst);
        let dfs_path = dfs.path().expect("DFS solves the open board");
        assert!(dfs_path.last().unwrap().goal_reached(TARGET));
        assert!(astar_path.len() <= dfs_path.len());
    }

    #[test]
    fn test_solution_path_is_a_valid_chain() {
        let board = parse_board(OPEN_BOARD).unwrap();
        let outcome = solve(board.clone(), TARGET, Algorithm::AStar);
        let path = outcome.path().unwrap();

        assert_eq!(path[0].fingerprint(), board.fingerprint());
        for pair in path.windows(2) {
            let next_prints: Vec<_> =
                successors(&pair[0]).iter().map(|b| b.fingerprint()).collect();
            assert!(
                next_prints.contains(&pair[1].fingerprint()),
                "consecutive boards differ by one legal slide"
            );
        }
    }

    #[test]
    fn test_astar_finds_minimal_path_on_classic_board() {
        let board = parse_board(CLASSIC_BOARD).unwrap();
        let outcome = solve(board, TARGET, Algorithm::AStar);
        let path = outcome.path().expect("the classic layout is solvable");
        assert_eq!(path.len(), 117, "116 moves is the known minimum");
    }

    #[test]
    fn test_astar_minimal_on_tiny_board() {
        // lone goal block on a 3x3 board, two moves from the target
        let board = parse_board("11.\n11.\n...\n").unwrap();
        let outcome = solve(board, (1, 1), Algorithm::AStar);
        assert_eq!(outcome.path().unwrap().len(), 3);
    }

    #[test]
    fn test_solved_at_root_expands_nothing() {
        let board = parse_board(SOLVED_BOARD).unwrap();
        for algorithm in [Algorithm::DepthFirst, Algorithm::AStar] {
            let outcome = solve(board.clone(), TARGET, algorithm);
            let path = outcome.path().expect("already solved");
            assert_eq!(path.len(), 1);
            assert_eq!(outcome.stats().nodes_expanded, 0);
        }
    }

    #[test]
    fn test_packed_board_exhausts_immediately() {
        let board = parse_board(PACKED_BOARD).unwrap();
        for algorithm in [Algorithm::DepthFirst, Algorithm::AStar] {
            let outcome = solve(board.clone(), (0, 1), algorithm);
            assert!(outcome.path().is_none(), "no cell is empty, no move exists");
            // only the root was ever generated
            assert_eq!(outcome.stats().nodes_generated, 1);
        }
    }

}
