//! Authoritative board storage with per-cell occupancy and placement zones.

use std::collections::{BTreeMap, BTreeSet};

use hex_tactics_core::{
    AgentId, BoardLayout, BoardView, Cell, HexCoord, OffsetCoord, PlayerId, Terrain,
};

/// Reasons a [`BoardLayout`] cannot become a playable board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Two cell entries share the same row and column.
    #[error("cell at row {row}, column {col} is declared more than once")]
    DuplicateCell {
        /// Row of the repeated cell.
        row: i32,
        /// Column of the repeated cell.
        col: i32,
    },
    /// A placement zone names a cell that is not part of the board.
    #[error("{player:?} placement zone references missing cell at row {row}, column {col}")]
    MissingZoneCell {
        /// Player owning the zone.
        player: PlayerId,
        /// Row of the missing cell.
        row: i32,
        /// Column of the missing cell.
        col: i32,
    },
    /// A placement zone names a cell covered by anything but normal ground.
    #[error("{player:?} placement zone cell at row {row}, column {col} is {terrain:?}")]
    ZoneCellNotNormal {
        /// Player owning the zone.
        player: PlayerId,
        /// Row of the offending cell.
        row: i32,
        /// Column of the offending cell.
        col: i32,
        /// Terrain found on the cell.
        terrain: Terrain,
    },
    /// Both players' zones contain the same cell.
    #[error("placement zones overlap at row {row}, column {col}")]
    OverlappingZones {
        /// Row of the shared cell.
        row: i32,
        /// Column of the shared cell.
        col: i32,
    },
    /// A player has nowhere to place agents.
    #[error("{player:?} placement zone is empty")]
    EmptyZone {
        /// Player owning the empty zone.
        player: PlayerId,
    },
    /// The match would never leave placement because nobody places anything.
    #[error("each player must place at least one agent")]
    NoAgentsToPlace,
    /// The deck cannot fill a roster.
    #[error("deck holds {cards} cards but each player must place {required}")]
    DeckTooSmall {
        /// Cards in the deck.
        cards: usize,
        /// Agents each player must place.
        required: usize,
    },
    /// A placement zone cannot hold a full roster.
    #[error("{player:?} placement zone has {cells} cells but {required} agents must fit")]
    ZoneTooSmall {
        /// Player owning the zone.
        player: PlayerId,
        /// Cells in the zone.
        cells: usize,
        /// Agents each player must place.
        required: usize,
    },
}

/// Hexagonal board keyed by axial coordinates.
#[derive(Clone, Debug)]
pub struct HexGrid {
    cells: BTreeMap<HexCoord, Cell>,
    zones: [BTreeSet<HexCoord>; 2],
}

impl HexGrid {
    /// Builds a grid from loader output, validating cells and zones.
    pub fn from_layout(layout: &BoardLayout) -> Result<Self, LayoutError> {
        let mut cells = BTreeMap::new();
        for spec in layout.cells() {
            let coord = spec.offset.to_hex();
            if cells.insert(coord, Cell::new(spec.terrain)).is_some() {
                return Err(LayoutError::DuplicateCell {
                    row: spec.offset.row(),
                    col: spec.offset.col(),
                });
            }
        }

        let mut zones = [BTreeSet::new(), BTreeSet::new()];
        for player in PlayerId::ALL {
            zones[player.index()] = collect_zone(&cells, player, layout.zone(player))?;
        }

        if let Some(shared) = zones[0].intersection(&zones[1]).next() {
            let offset = shared.to_offset();
            return Err(LayoutError::OverlappingZones {
                row: offset.row(),
                col: offset.col(),
            });
        }

        Ok(Self { cells, zones })
    }

    /// Read-only view consumed by the rule systems.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.cells)
    }

    /// Terrain at the coordinate, if the cell exists.
    #[must_use]
    pub fn terrain(&self, coord: HexCoord) -> Option<Terrain> {
        self.cells.get(&coord).map(Cell::terrain)
    }

    /// Agent standing at the coordinate, if any.
    #[must_use]
    pub fn occupant(&self, coord: HexCoord) -> Option<AgentId> {
        self.cells.get(&coord).and_then(Cell::occupant)
    }

    /// Cells where the player may deploy agents.
    #[must_use]
    pub fn zone(&self, player: PlayerId) -> &BTreeSet<HexCoord> {
        &self.zones[player.index()]
    }

    /// Reports whether the coordinate lies in the player's placement zone.
    #[must_use]
    pub fn in_zone(&self, player: PlayerId, coord: HexCoord) -> bool {
        self.zones[player.index()].contains(&coord)
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the board has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn occupy(&mut self, coord: HexCoord, agent: AgentId) {
        if let Some(cell) = self.cells.get_mut(&coord) {
            let previous = cell.set_occupant(Some(agent));
            debug_assert!(previous.is_none(), "cell {coord:?} was already occupied");
        }
    }

    pub(crate) fn vacate(&mut self, coord: HexCoord) -> Option<AgentId> {
        self.cells
            .get_mut(&coord)
            .and_then(|cell| cell.set_occupant(None))
    }

    pub(crate) fn clear_occupants(&mut self) {
        for cell in self.cells.values_mut() {
            let _ = cell.set_occupant(None);
        }
    }
}

fn collect_zone(
    cells: &BTreeMap<HexCoord, Cell>,
    player: PlayerId,
    offsets: &[OffsetCoord],
) -> Result<BTreeSet<HexCoord>, LayoutError> {
    let mut zone = BTreeSet::new();
    for offset in offsets {
        let Some(cell) = cells.get(&offset.to_hex()) else {
            return Err(LayoutError::MissingZoneCell {
                player,
                row: offset.row(),
                col: offset.col(),
            });
        };
        if cell.terrain() != Terrain::Normal {
            return Err(LayoutError::ZoneCellNotNormal {
                player,
                row: offset.row(),
                col: offset.col(),
                terrain: cell.terrain(),
            });
        }
        let _ = zone.insert(offset.to_hex());
    }

    if zone.is_empty() {
        return Err(LayoutError::EmptyZone { player });
    }
    Ok(zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tactics_core::CellSpec;

    fn strip() -> Vec<CellSpec> {
        (0..4)
            .map(|col| CellSpec::new(0, col, Terrain::Normal))
            .collect()
    }

    #[test]
    fn zones_are_stored_in_axial_coordinates() {
        let layout = BoardLayout::new(
            strip(),
            vec![OffsetCoord::new(0, 0)],
            vec![OffsetCoord::new(0, 3)],
        );
        let grid = HexGrid::from_layout(&layout).expect("layout is valid");

        assert_eq!(grid.len(), 4);
        assert!(grid.in_zone(PlayerId::First, HexCoord::new(0, 0)));
        assert!(grid.in_zone(PlayerId::Second, HexCoord::new(3, -1)));
        assert!(!grid.in_zone(PlayerId::First, HexCoord::new(3, -1)));
    }

    #[test]
    fn duplicate_cells_are_rejected() {
        let mut cells = strip();
        cells.push(CellSpec::new(0, 2, Terrain::Water));
        let layout = BoardLayout::new(
            cells,
            vec![OffsetCoord::new(0, 0)],
            vec![OffsetCoord::new(0, 3)],
        );

        assert_eq!(
            HexGrid::from_layout(&layout).map(|grid| grid.len()),
            Err(LayoutError::DuplicateCell { row: 0, col: 2 })
        );
    }

    #[test]
    fn zones_must_be_normal_disjoint_and_present() {
        let mut cells = strip();
        cells.push(CellSpec::new(1, 0, Terrain::Water));

        let not_normal = BoardLayout::new(
            cells.clone(),
            vec![OffsetCoord::new(1, 0)],
            vec![OffsetCoord::new(0, 3)],
        );
        assert!(matches!(
            HexGrid::from_layout(&not_normal),
            Err(LayoutError::ZoneCellNotNormal {
                player: PlayerId::First,
                terrain: Terrain::Water,
                ..
            })
        ));

        let missing = BoardLayout::new(
            cells.clone(),
            vec![OffsetCoord::new(0, 0)],
            vec![OffsetCoord::new(5, 5)],
        );
        assert!(matches!(
            HexGrid::from_layout(&missing),
            Err(LayoutError::MissingZoneCell {
                player: PlayerId::Second,
                ..
            })
        ));

        let overlapping = BoardLayout::new(
            cells.clone(),
            vec![OffsetCoord::new(0, 1)],
            vec![OffsetCoord::new(0, 1)],
        );
        assert!(matches!(
            HexGrid::from_layout(&overlapping),
            Err(LayoutError::OverlappingZones { row: 0, col: 1 })
        ));

        let empty = BoardLayout::new(cells, vec![OffsetCoord::new(0, 0)], Vec::new());
        assert!(matches!(
            HexGrid::from_layout(&empty),
            Err(LayoutError::EmptyZone {
                player: PlayerId::Second
            })
        ));
    }

    #[test]
    fn occupancy_can_be_set_and_cleared() {
        let layout = BoardLayout::new(
            strip(),
            vec![OffsetCoord::new(0, 0)],
            vec![OffsetCoord::new(0, 3)],
        );
        let mut grid = HexGrid::from_layout(&layout).expect("layout is valid");
        let coord = HexCoord::new(1, 0);

        grid.occupy(coord, AgentId::new(4));
        assert_eq!(grid.occupant(coord), Some(AgentId::new(4)));
        assert!(!grid.view().is_free(coord));

        assert_eq!(grid.vacate(coord), Some(AgentId::new(4)));
        grid.occupy(coord, AgentId::new(5));
        grid.clear_occupants();
        assert_eq!(grid.occupant(coord), None);
    }
}
