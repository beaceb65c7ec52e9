#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement system that answers reachability and path-length questions.
//!
//! Two terrain predicates drive every search. A neighbour is expanded only if
//! it is free and the archetype may cross its terrain; a visited cell is
//! reported as a destination only if the archetype may also occupy it. Flying
//! agents therefore traverse water and rock without ever landing there.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use hex_tactics_core::{Archetype, BoardView, HexCoord};

/// Breadth-first planner bound to one board snapshot and one archetype.
#[derive(Clone, Copy, Debug)]
pub struct MovementPlanner<'a> {
    board: BoardView<'a>,
    archetype: Archetype,
}

impl<'a> MovementPlanner<'a> {
    /// Creates a planner evaluating moves for the provided archetype.
    #[must_use]
    pub const fn new(board: BoardView<'a>, archetype: Archetype) -> Self {
        Self { board, archetype }
    }

    /// Cells the agent could legally end a move on.
    ///
    /// The origin itself is never included, so a budget of zero always yields
    /// an empty set.
    #[must_use]
    pub fn reachable_cells(&self, origin: HexCoord, moves_remaining: u32) -> BTreeSet<HexCoord> {
        self.explore(origin, moves_remaining)
            .into_iter()
            .filter(|&(cell, distance)| distance > 0 && self.can_stop_at(cell))
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Cells the agent may pass over within the budget but never stop on.
    #[must_use]
    pub fn passable_cells(&self, origin: HexCoord, moves_remaining: u32) -> BTreeSet<HexCoord> {
        self.explore(origin, moves_remaining)
            .into_iter()
            .filter(|&(cell, distance)| distance > 0 && !self.can_stop_at(cell))
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Number of hops on the shortest path from `from` to `to`.
    ///
    /// The destination is always eligible for expansion even when it would
    /// fail the crossing rules, because callers validate destinations before
    /// asking for a cost. Returns `None` when no path exists.
    #[must_use]
    pub fn shortest_path_length(&self, from: HexCoord, to: HexCoord) -> Option<u32> {
        if !self.board.contains(from) {
            return None;
        }
        if from == to {
            return Some(0);
        }

        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        let _ = visited.insert(from);
        queue.push_back((from, 0_u32));

        while let Some((cell, distance)) = queue.pop_front() {
            if cell == to {
                return Some(distance);
            }

            for neighbor in self.board.neighbors(cell) {
                if visited.contains(&neighbor) {
                    continue;
                }
                if neighbor != to && !self.can_pass_through(neighbor) {
                    continue;
                }

                let _ = visited.insert(neighbor);
                queue.push_back((neighbor, distance + 1));
            }
        }

        None
    }

    /// Hop distances of every cell the search expands within the budget,
    /// including the origin at distance zero.
    fn explore(&self, origin: HexCoord, budget: u32) -> BTreeMap<HexCoord, u32> {
        let mut distances = BTreeMap::new();
        if budget == 0 || !self.board.contains(origin) {
            return distances;
        }

        let mut queue = VecDeque::new();
        let _ = distances.insert(origin, 0_u32);
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            let Some(&distance) = distances.get(&cell) else {
                continue;
            };
            if distance >= budget {
                continue;
            }

            for neighbor in self.board.neighbors(cell) {
                if distances.contains_key(&neighbor) {
                    continue;
                }
                if !self.can_pass_through(neighbor) {
                    continue;
                }

                let _ = distances.insert(neighbor, distance + 1);
                queue.push_back(neighbor);
            }
        }

        distances
    }

    fn can_pass_through(&self, cell: HexCoord) -> bool {
        self.board.is_free(cell)
            && self
                .board
                .terrain(cell)
                .is_some_and(|terrain| self.archetype.can_cross(terrain))
    }

    fn can_stop_at(&self, cell: HexCoord) -> bool {
        self.board.is_free(cell)
            && self
                .board
                .terrain(cell)
                .is_some_and(|terrain| self.archetype.can_occupy(terrain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tactics_core::{AgentId, Cell, Terrain};

    fn board(cells: &[(i32, i32, Terrain)]) -> BTreeMap<HexCoord, Cell> {
        cells
            .iter()
            .map(|&(q, r, terrain)| (HexCoord::new(q, r), Cell::new(terrain)))
            .collect()
    }

    #[test]
    fn zero_budget_reaches_nothing() {
        let cells = board(&[(0, 0, Terrain::Normal), (1, 0, Terrain::Normal)]);
        let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Grounded);
        assert!(planner.reachable_cells(HexCoord::new(0, 0), 0).is_empty());
    }

    #[test]
    fn occupied_cells_block_the_path() {
        let mut cells = board(&[
            (0, 0, Terrain::Normal),
            (1, 0, Terrain::Normal),
            (2, 0, Terrain::Normal),
        ]);
        if let Some(cell) = cells.get_mut(&HexCoord::new(1, 0)) {
            let _ = cell.set_occupant(Some(AgentId::new(9)));
        }
        let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Floating);

        assert!(planner.reachable_cells(HexCoord::new(0, 0), 3).is_empty());
        assert_eq!(
            planner.shortest_path_length(HexCoord::new(0, 0), HexCoord::new(2, 0)),
            None
        );
    }

    #[test]
    fn shortest_path_treats_destination_as_enterable() {
        let cells = board(&[(0, 0, Terrain::Normal), (1, 0, Terrain::Rock)]);
        let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Grounded);
        assert_eq!(
            planner.shortest_path_length(HexCoord::new(0, 0), HexCoord::new(1, 0)),
            Some(1)
        );
    }

    #[test]
    fn shortest_path_to_self_is_zero() {
        let cells = board(&[(0, 0, Terrain::Normal)]);
        let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Grounded);
        assert_eq!(
            planner.shortest_path_length(HexCoord::new(0, 0), HexCoord::new(0, 0)),
            Some(0)
        );
    }

    #[test]
    fn passable_cells_are_crossable_but_not_occupiable() {
        let cells = board(&[
            (0, 0, Terrain::Normal),
            (1, 0, Terrain::Water),
            (2, 0, Terrain::Normal),
            (0, 1, Terrain::Rock),
        ]);
        let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Flying);
        let passable = planner.passable_cells(HexCoord::new(0, 0), 2);

        assert_eq!(
            passable,
            BTreeSet::from([HexCoord::new(1, 0), HexCoord::new(0, 1)])
        );
    }
}
