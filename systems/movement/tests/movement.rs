use std::collections::{BTreeMap, BTreeSet};

use hex_tactics_core::{AgentId, Archetype, BoardView, Cell, HexCoord, Terrain};
use hex_tactics_system_movement::MovementPlanner;
use proptest::prelude::*;

fn board(cells: &[(i32, i32, Terrain)]) -> BTreeMap<HexCoord, Cell> {
    cells
        .iter()
        .map(|&(q, r, terrain)| (HexCoord::new(q, r), Cell::new(terrain)))
        .collect()
}

#[test]
fn grounded_agent_is_walled_in_by_water_and_rock() {
    let origin = HexCoord::new(0, 0);
    let cells = board(&[
        (0, 0, Terrain::Normal),
        (1, 0, Terrain::Water),
        (1, -1, Terrain::Rock),
        (0, 1, Terrain::Normal),
        (-1, 2, Terrain::Normal),
        // Open ground beyond the water and the rock.
        (2, 0, Terrain::Normal),
        (2, -2, Terrain::Normal),
    ]);
    let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Grounded);

    let reachable = planner.reachable_cells(origin, 2);

    assert_eq!(
        reachable,
        BTreeSet::from([HexCoord::new(0, 1), HexCoord::new(-1, 2)])
    );
    assert_eq!(
        planner.shortest_path_length(origin, HexCoord::new(-1, 2)),
        Some(2)
    );
    assert_eq!(planner.shortest_path_length(origin, HexCoord::new(2, 0)), None);
}

#[test]
fn water_walker_wades_but_never_climbs_rock() {
    let origin = HexCoord::new(0, 0);
    let cells = board(&[
        (0, 0, Terrain::Normal),
        (1, 0, Terrain::Water),
        (2, 0, Terrain::Normal),
        (1, -1, Terrain::Rock),
        (2, -2, Terrain::Normal),
    ]);
    let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::WaterWalking);

    let reachable = planner.reachable_cells(origin, 2);

    assert_eq!(
        reachable,
        BTreeSet::from([HexCoord::new(1, 0), HexCoord::new(2, 0)])
    );
}

#[test]
fn flying_agent_overflies_water_it_cannot_land_on() {
    let origin = HexCoord::new(0, 0);
    let mut layout = vec![(0, 0, Terrain::Normal), (2, 0, Terrain::Normal)];
    for neighbor in origin.neighbors() {
        layout.push((neighbor.q(), neighbor.r(), Terrain::Water));
    }
    let cells = board(&layout);
    let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Flying);

    assert!(planner.reachable_cells(origin, 1).is_empty());
    assert_eq!(
        planner.reachable_cells(origin, 2),
        BTreeSet::from([HexCoord::new(2, 0)])
    );
    assert_eq!(planner.passable_cells(origin, 1).len(), 6);
}

#[test]
fn floating_agent_settles_anywhere_free() {
    let origin = HexCoord::new(0, 0);
    let mut cells = board(&[
        (0, 0, Terrain::Normal),
        (1, 0, Terrain::Rock),
        (0, 1, Terrain::Water),
        (-1, 0, Terrain::Goal),
    ]);
    if let Some(cell) = cells.get_mut(&HexCoord::new(-1, 0)) {
        let _ = cell.set_occupant(Some(AgentId::new(2)));
    }
    let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Floating);

    assert_eq!(
        planner.reachable_cells(origin, 1),
        BTreeSet::from([HexCoord::new(1, 0), HexCoord::new(0, 1)])
    );
}

#[test]
fn unknown_origin_reaches_nothing() {
    let cells = board(&[(0, 0, Terrain::Normal), (1, 0, Terrain::Normal)]);
    let planner = MovementPlanner::new(BoardView::new(&cells), Archetype::Grounded);

    assert!(planner.reachable_cells(HexCoord::new(7, 7), 3).is_empty());
    assert_eq!(
        planner.shortest_path_length(HexCoord::new(7, 7), HexCoord::new(0, 0)),
        None
    );
}

const RADIUS: i32 = 3;

fn hexagon() -> Vec<HexCoord> {
    let mut coords = Vec::new();
    for q in -RADIUS..=RADIUS {
        for r in -RADIUS..=RADIUS {
            let coord = HexCoord::new(q, r);
            if coord.distance(HexCoord::new(0, 0)) <= RADIUS as u32 {
                coords.push(coord);
            }
        }
    }
    coords
}

fn terrain_from(index: u8) -> Terrain {
    Terrain::ALL[usize::from(index) % Terrain::ALL.len()]
}

fn arbitrary_board() -> impl Strategy<Value = BTreeMap<HexCoord, Cell>> {
    let coords = hexagon();
    let count = coords.len();
    prop::collection::vec((0_u8..4, prop::bool::weighted(0.15)), count).prop_map(
        move |traits| {
            coords
                .iter()
                .zip(traits)
                .enumerate()
                .map(|(index, (&coord, (terrain, occupied)))| {
                    let origin = coord == HexCoord::new(0, 0);
                    let mut cell = Cell::new(if origin {
                        Terrain::Normal
                    } else {
                        terrain_from(terrain)
                    });
                    if occupied && !origin {
                        let _ = cell.set_occupant(Some(AgentId::new(index as u32)));
                    }
                    (coord, cell)
                })
                .collect()
        },
    )
}

fn arbitrary_archetype() -> impl Strategy<Value = Archetype> {
    (0_usize..4).prop_map(|index| Archetype::ALL[index])
}

proptest! {
    #[test]
    fn reachable_cells_fit_within_the_budget(
        cells in arbitrary_board(),
        archetype in arbitrary_archetype(),
        moves in 0_u32..5,
    ) {
        let origin = HexCoord::new(0, 0);
        let board = BoardView::new(&cells);
        let planner = MovementPlanner::new(board, archetype);

        for cell in planner.reachable_cells(origin, moves) {
            let length = planner.shortest_path_length(origin, cell);
            prop_assert!(matches!(length, Some(hops) if hops >= 1 && hops <= moves));
            prop_assert!(board.is_free(cell));
            let terrain = board.terrain(cell).expect("reachable cell exists");
            prop_assert!(archetype.can_occupy(terrain));
            prop_assert!(origin.distance(cell) <= moves);
        }
    }

    #[test]
    fn larger_budgets_never_shrink_the_reachable_set(
        cells in arbitrary_board(),
        archetype in arbitrary_archetype(),
        moves in 0_u32..4,
    ) {
        let origin = HexCoord::new(0, 0);
        let planner = MovementPlanner::new(BoardView::new(&cells), archetype);

        let smaller = planner.reachable_cells(origin, moves);
        let larger = planner.reachable_cells(origin, moves + 1);
        prop_assert!(smaller.is_subset(&larger));
    }
}
