#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the hex tactics rules engine.
//!
//! This crate defines the message surface that connects the presentation
//! layer, the authoritative world, and the pure rule systems. Callers submit
//! [`Command`] values describing desired actions, the world validates and
//! executes them through its `apply` entry point, and then reports what
//! happened as [`Event`] values detailed enough to animate without
//! recomputing game logic. Systems never mutate anything: they read a
//! [`BoardView`] and an [`AgentView`] and answer questions about them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod hex;
mod terrain;

pub use hex::{HexCoord, OffsetCoord, HEX_DIRECTIONS};
pub use terrain::{Archetype, Capability, Terrain};

/// Number of agents each player deploys before battle begins.
pub const DEFAULT_AGENTS_PER_PLAYER: usize = 3;

/// Commands that express every action a player may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Deploys an agent from the player's deck during the placement phase.
    PlaceAgent {
        /// Player deploying the agent.
        player: PlayerId,
        /// Card describing the agent to instantiate.
        card: CardId,
        /// Cell the agent should occupy.
        cell: HexCoord,
    },
    /// Marks one of the active player's agents as the current selection.
    SelectAgent {
        /// Player issuing the selection.
        player: PlayerId,
        /// Agent to select.
        agent: AgentId,
    },
    /// Drops the active player's current selection without acting.
    ClearSelection {
        /// Player issuing the request.
        player: PlayerId,
    },
    /// Moves an agent to a reachable cell, ending the turn.
    MoveAgent {
        /// Player issuing the move.
        player: PlayerId,
        /// Agent being moved.
        agent: AgentId,
        /// Cell the agent should end on.
        destination: HexCoord,
    },
    /// Attacks an enemy agent in range, ending the turn.
    Attack {
        /// Player issuing the attack.
        player: PlayerId,
        /// Agent performing the attack.
        attacker: AgentId,
        /// Enemy agent receiving the attack.
        target: AgentId,
    },
    /// Tears down the current match and returns to the placement phase.
    ResetMatch,
}

/// Events broadcast by the world after successfully processing a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that an agent was deployed onto the board.
    AgentPlaced {
        /// Identifier allocated to the new agent.
        agent: AgentId,
        /// Player owning the agent.
        player: PlayerId,
        /// Card consumed by the placement.
        card: CardId,
        /// Cell the agent now occupies.
        cell: HexCoord,
        /// Number of agents the player has placed so far.
        placed: usize,
    },
    /// Announces that the match entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Announces the start of a player's turn.
    TurnStarted {
        /// Player who may act now.
        player: PlayerId,
    },
    /// Confirms that an agent became the current selection.
    AgentSelected {
        /// Agent that was selected.
        agent: AgentId,
    },
    /// Confirms that the current selection was dropped.
    SelectionCleared {
        /// Agent that was previously selected.
        agent: AgentId,
    },
    /// Confirms that an agent moved between two cells.
    AgentMoved {
        /// Agent that moved.
        agent: AgentId,
        /// Cell the agent left.
        from: HexCoord,
        /// Cell the agent now occupies.
        to: HexCoord,
        /// Number of hops spent on the shortest path.
        cost: u32,
        /// Moves left in the agent's budget after the move.
        remaining_moves: u32,
    },
    /// Reports the damage exchanged by an attack.
    AgentAttacked {
        /// Agent that attacked.
        attacker: AgentId,
        /// Agent that was attacked.
        target: AgentId,
        /// Damage applied to the target.
        damage: u32,
        /// Damage the attacker inflicted on itself.
        recoil: u32,
        /// Target health after the attack.
        target_health: u32,
        /// Attacker health after the recoil.
        attacker_health: u32,
    },
    /// Confirms that an attacker was repositioned next to its target.
    AgentRelocated {
        /// Agent that was repositioned.
        agent: AgentId,
        /// Cell the agent left.
        from: HexCoord,
        /// Cell the agent now occupies.
        to: HexCoord,
    },
    /// Confirms that a dead agent left the board and its owner's roster.
    AgentRemoved {
        /// Agent that died.
        agent: AgentId,
        /// Player that owned the agent.
        player: PlayerId,
        /// Cell the agent vacated.
        cell: HexCoord,
    },
    /// Announces the end of the match.
    MatchFinished {
        /// Winner of the match, or a draw.
        outcome: MatchOutcome,
    },
    /// Confirms that the match was torn down.
    MatchReset,
}

/// Reasons an action may be rejected. Rejection never mutates any state.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum ActionError {
    /// The referenced cell, agent, or card does not exist.
    #[error("referenced cell, agent, or card does not exist")]
    InvalidTarget,
    /// The destination cell already holds an agent.
    #[error("cell is already occupied")]
    CellOccupied,
    /// The agent's archetype may not stand on the terrain.
    #[error("terrain is incompatible with the agent's archetype")]
    TerrainIncompatible,
    /// The destination or target lies outside what the agent can reach.
    #[error("target is out of range")]
    OutOfRange,
    /// A player other than the active one issued the action.
    #[error("it is not this player's turn")]
    NotYourTurn,
    /// The action is not permitted in the current phase.
    #[error("action is not permitted in the current phase")]
    WrongPhase,
    /// The referenced agent has already died.
    #[error("agent is no longer alive")]
    AgentNotAlive,
    /// The player tried to command, or attack, an agent on the wrong side.
    #[error("agent belongs to the wrong player")]
    ForeignAgent,
    /// The card was already deployed by this player.
    #[error("card has already been placed")]
    CardAlreadyUsed,
    /// The player already deployed the maximum number of agents.
    #[error("player has already placed every agent")]
    PlacementLimitReached,
    /// The cell lies outside the player's placement zone.
    #[error("cell is outside the player's placement zone")]
    OutsidePlacementZone,
}

/// Identity of one of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// Player who acts first in battle.
    First,
    /// Player who acts second in battle.
    Second,
}

impl PlayerId {
    /// Both players in turn order.
    pub const ALL: [PlayerId; 2] = [Self::First, Self::Second];

    /// The opposing player.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Zero-based index suitable for per-player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// Unique identifier assigned to an agent when it is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position of a card within a player's deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    /// Creates a new card identifier with the provided deck index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the deck index of the card.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Phase of the match state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Players deploy agents into their zones.
    Placement,
    /// Players alternate single actions.
    Battle,
    /// The match is over.
    Finished,
}

/// Result of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The player still holding living agents.
    Winner(PlayerId),
    /// Both rosters emptied in the same action.
    Draw,
}

/// Template describing the stats of an agent before it is deployed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AgentCard {
    name: String,
    archetype: Archetype,
    health: u32,
    mobility: u32,
    damage: u32,
    attack_range: u32,
}

impl AgentCard {
    /// Creates a new card. Attack ranges below one are raised to one.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        archetype: Archetype,
        health: u32,
        mobility: u32,
        damage: u32,
        attack_range: u32,
    ) -> Self {
        Self {
            name: name.into(),
            archetype,
            health,
            mobility,
            damage,
            attack_range: attack_range.max(1),
        }
    }

    /// Display name of the agent.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Movement archetype of the agent.
    #[must_use]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Maximum and starting health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Hops the agent may move per turn.
    #[must_use]
    pub const fn mobility(&self) -> u32 {
        self.mobility
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Attack reach measured in hops, never below one.
    #[must_use]
    pub const fn attack_range(&self) -> u32 {
        self.attack_range
    }
}

/// Terrain and occupancy of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    terrain: Terrain,
    occupant: Option<AgentId>,
}

impl Cell {
    /// Creates an empty cell covered by the provided terrain.
    #[must_use]
    pub const fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            occupant: None,
        }
    }

    /// Terrain covering the cell.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Agent standing on the cell, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    /// Reports whether an agent stands on the cell.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Replaces the occupant, returning the previous one.
    pub fn set_occupant(&mut self, occupant: Option<AgentId>) -> Option<AgentId> {
        std::mem::replace(&mut self.occupant, occupant)
    }
}

/// Read-only view over the board's cells.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a BTreeMap<HexCoord, Cell>,
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by the provided cells.
    #[must_use]
    pub fn new(cells: &'a BTreeMap<HexCoord, Cell>) -> Self {
        Self { cells }
    }

    /// Returns the cell at the coordinate, if it exists.
    #[must_use]
    pub fn cell(&self, coord: HexCoord) -> Option<&'a Cell> {
        self.cells.get(&coord)
    }

    /// Reports whether the coordinate belongs to the board.
    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Terrain at the coordinate, if the cell exists.
    #[must_use]
    pub fn terrain(&self, coord: HexCoord) -> Option<Terrain> {
        self.cell(coord).map(Cell::terrain)
    }

    /// Agent standing at the coordinate, if any.
    #[must_use]
    pub fn occupant(&self, coord: HexCoord) -> Option<AgentId> {
        self.cell(coord).and_then(Cell::occupant)
    }

    /// Reports whether the cell exists and nobody stands on it.
    #[must_use]
    pub fn is_free(&self, coord: HexCoord) -> bool {
        self.cell(coord).is_some_and(|cell| !cell.is_occupied())
    }

    /// Neighbours of the coordinate that exist on the board, in
    /// [`HEX_DIRECTIONS`] order.
    pub fn neighbors(&self, coord: HexCoord) -> impl Iterator<Item = HexCoord> + 'a {
        let cells = self.cells;
        coord
            .neighbors()
            .filter(move |neighbor| cells.contains_key(neighbor))
    }

    /// Iterator over every cell in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (HexCoord, &'a Cell)> + 'a {
        let cells = self.cells;
        cells.iter().map(|(coord, cell)| (*coord, cell))
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the board has no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Display name copied from the card.
    pub name: String,
    /// Player owning the agent.
    pub owner: PlayerId,
    /// Card the agent was deployed from.
    pub card: CardId,
    /// Movement archetype of the agent.
    pub archetype: Archetype,
    /// Cell the agent currently occupies.
    pub cell: HexCoord,
    /// Health the agent started with.
    pub max_health: u32,
    /// Health the agent has left.
    pub health: u32,
    /// Hops the agent may move per turn.
    pub mobility: u32,
    /// Hops left in the current turn.
    pub remaining_moves: u32,
    /// Damage dealt per attack.
    pub damage: u32,
    /// Attack reach measured in hops.
    pub attack_range: u32,
}

impl AgentSnapshot {
    /// Reports whether the agent still has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Read-only snapshot describing every living agent on the board.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single agent.
    #[must_use]
    pub fn get(&self, agent: AgentId) -> Option<&AgentSnapshot> {
        self.snapshots
            .binary_search_by_key(&agent, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Iterator over the agents owned by the player.
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.owner == player)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}

/// One cell as produced by a map loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSpec {
    /// Row and column of the cell.
    pub offset: OffsetCoord,
    /// Terrain covering the cell.
    pub terrain: Terrain,
}

impl CellSpec {
    /// Creates a cell specification from loader row/column addressing.
    #[must_use]
    pub const fn new(row: i32, col: i32, terrain: Terrain) -> Self {
        Self {
            offset: OffsetCoord::new(row, col),
            terrain,
        }
    }
}

/// Initial board handed over by a map loader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardLayout {
    cells: Vec<CellSpec>,
    zones: [Vec<OffsetCoord>; 2],
}

impl BoardLayout {
    /// Creates a layout from an ordered cell list and the two players'
    /// placement zones.
    #[must_use]
    pub fn new(
        cells: Vec<CellSpec>,
        first_zone: Vec<OffsetCoord>,
        second_zone: Vec<OffsetCoord>,
    ) -> Self {
        Self {
            cells,
            zones: [first_zone, second_zone],
        }
    }

    /// Cells in loader order.
    #[must_use]
    pub fn cells(&self) -> &[CellSpec] {
        &self.cells
    }

    /// Placement zone of the provided player.
    #[must_use]
    pub fn zone(&self, player: PlayerId) -> &[OffsetCoord] {
        &self.zones[player.index()]
    }
}
