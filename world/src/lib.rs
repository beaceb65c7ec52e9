#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for the hex tactics rules engine.
//!
//! The [`World`] owns the board, both rosters and decks, and the match state
//! machine. Every mutation flows through [`apply`], which either rejects a
//! [`Command`] without touching anything or executes it completely and
//! reports the outcome as [`Event`] values. Read access goes through the
//! [`query`] module.

use std::collections::BTreeSet;

use hex_tactics_core::{
    ActionError, AgentId, AgentView, BoardLayout, CardId, Command, Event, HexCoord, MatchOutcome,
    Phase, PlayerId,
};
use hex_tactics_system_combat::{AttackResolution, CombatResolver};
use hex_tactics_system_movement::MovementPlanner;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod config;
mod deck;
mod grid;
mod roster;

pub use config::{MatchConfig, DEFAULT_RNG_SEED};
pub use deck::standard_deck;
pub use grid::{HexGrid, LayoutError};

use deck::Deck;
use roster::{Agent, Roster};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MatchState {
    phase: Phase,
    active: PlayerId,
    placed: [usize; 2],
    selected: Option<AgentId>,
    outcome: Option<MatchOutcome>,
}

impl MatchState {
    const fn new() -> Self {
        Self {
            phase: Phase::Placement,
            active: PlayerId::First,
            placed: [0, 0],
            selected: None,
            outcome: None,
        }
    }
}

/// Represents the authoritative state of a single match.
#[derive(Debug)]
pub struct World {
    grid: HexGrid,
    config: MatchConfig,
    decks: [Deck; 2],
    rosters: [Roster; 2],
    fallen: BTreeSet<AgentId>,
    state: MatchState,
    next_agent_id: u32,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a match in the placement phase on the provided board.
    ///
    /// Fails when the board is malformed or when the configured roster size
    /// could never be placed from the deck into either zone.
    pub fn new(layout: &BoardLayout, config: MatchConfig) -> Result<Self, LayoutError> {
        let grid = HexGrid::from_layout(layout)?;
        let cards = config.deck();

        let required = config.agents_per_player();
        if required == 0 {
            return Err(LayoutError::NoAgentsToPlace);
        }
        if cards.len() < required {
            return Err(LayoutError::DeckTooSmall {
                cards: cards.len(),
                required,
            });
        }
        for player in PlayerId::ALL {
            let cells = grid.zone(player).len();
            if cells < required {
                return Err(LayoutError::ZoneTooSmall {
                    player,
                    cells,
                    required,
                });
            }
        }

        Ok(Self {
            grid,
            decks: [Deck::new(cards.clone()), Deck::new(cards)],
            rosters: [Roster::default(), Roster::default()],
            fallen: BTreeSet::new(),
            state: MatchState::new(),
            next_agent_id: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
            config,
        })
    }

    fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.rosters.iter().find_map(|roster| roster.get(id))
    }

    fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.rosters.iter_mut().find_map(|roster| roster.get_mut(id))
    }

    fn agent_view(&self) -> AgentView {
        AgentView::from_snapshots(
            self.rosters
                .iter()
                .flat_map(Roster::iter)
                .map(Agent::snapshot)
                .collect(),
        )
    }

    fn ensure_turn(&self, player: PlayerId) -> Result<(), ActionError> {
        if self.state.phase != Phase::Battle {
            return Err(ActionError::WrongPhase);
        }
        if player != self.state.active {
            return Err(ActionError::NotYourTurn);
        }
        Ok(())
    }

    fn own_living_agent(&self, player: PlayerId, id: AgentId) -> Result<&Agent, ActionError> {
        if self.fallen.contains(&id) {
            return Err(ActionError::AgentNotAlive);
        }
        let agent = self.agent(id).ok_or(ActionError::InvalidTarget)?;
        if agent.owner != player {
            return Err(ActionError::ForeignAgent);
        }
        if !agent.is_alive() {
            return Err(ActionError::AgentNotAlive);
        }
        Ok(agent)
    }

    fn place_agent(
        &mut self,
        player: PlayerId,
        card: CardId,
        cell: HexCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if self.state.phase != Phase::Placement {
            return Err(ActionError::WrongPhase);
        }

        let deck = &self.decks[player.index()];
        let template = deck.card(card).ok_or(ActionError::InvalidTarget)?;
        if deck.is_used(card) {
            return Err(ActionError::CardAlreadyUsed);
        }
        if self.state.placed[player.index()] >= self.config.agents_per_player() {
            return Err(ActionError::PlacementLimitReached);
        }
        let terrain = self.grid.terrain(cell).ok_or(ActionError::InvalidTarget)?;
        if !self.grid.in_zone(player, cell) {
            return Err(ActionError::OutsidePlacementZone);
        }
        if self.grid.occupant(cell).is_some() {
            return Err(ActionError::CellOccupied);
        }
        if !template.archetype().can_occupy(terrain) {
            return Err(ActionError::TerrainIncompatible);
        }

        let id = AgentId::new(self.next_agent_id);
        let agent = Agent::from_card(id, player, card, template, cell);
        self.next_agent_id = self.next_agent_id.saturating_add(1);
        self.grid.occupy(cell, id);
        self.rosters[player.index()].push(agent);
        self.decks[player.index()].mark_used(card);
        self.state.placed[player.index()] += 1;

        let placed = self.state.placed[player.index()];
        tracing::debug!(agent = id.get(), ?player, ?cell, placed, "agent placed");
        out_events.push(Event::AgentPlaced {
            agent: id,
            player,
            card,
            cell,
            placed,
        });

        let target = self.config.agents_per_player();
        if self.state.placed.iter().all(|&count| count >= target) {
            self.start_battle(out_events);
        }
        Ok(())
    }

    fn start_battle(&mut self, out_events: &mut Vec<Event>) {
        self.state.phase = Phase::Battle;
        self.state.active = PlayerId::First;
        for roster in &mut self.rosters {
            roster.reset_moves();
        }

        tracing::info!(phase = ?Phase::Battle, "match phase changed");
        out_events.push(Event::PhaseChanged {
            phase: Phase::Battle,
        });
        out_events.push(Event::TurnStarted {
            player: PlayerId::First,
        });
    }

    fn select_agent(
        &mut self,
        player: PlayerId,
        agent: AgentId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_turn(player)?;
        let _ = self.own_living_agent(player, agent)?;
        self.select(agent, out_events);
        Ok(())
    }

    fn select(&mut self, agent: AgentId, out_events: &mut Vec<Event>) {
        if self.state.selected != Some(agent) {
            self.state.selected = Some(agent);
            out_events.push(Event::AgentSelected { agent });
        }
    }

    fn clear_selection(
        &mut self,
        player: PlayerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_turn(player)?;
        self.deselect(out_events);
        Ok(())
    }

    fn deselect(&mut self, out_events: &mut Vec<Event>) {
        if let Some(agent) = self.state.selected.take() {
            out_events.push(Event::SelectionCleared { agent });
        }
    }

    fn move_agent(
        &mut self,
        player: PlayerId,
        id: AgentId,
        destination: HexCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_turn(player)?;
        let agent = self.own_living_agent(player, id)?;
        let from = agent.cell;
        let archetype = agent.archetype();
        let budget = agent.remaining_moves();

        let terrain = self
            .grid
            .terrain(destination)
            .ok_or(ActionError::InvalidTarget)?;
        if self.grid.occupant(destination).is_some() {
            return Err(ActionError::CellOccupied);
        }
        if !archetype.can_occupy(terrain) {
            return Err(ActionError::TerrainIncompatible);
        }

        let planner = MovementPlanner::new(self.grid.view(), archetype);
        if !planner.reachable_cells(from, budget).contains(&destination) {
            return Err(ActionError::OutOfRange);
        }
        let cost = planner
            .shortest_path_length(from, destination)
            .ok_or(ActionError::OutOfRange)?;

        let Some(agent) = self.agent_mut(id) else {
            return Err(ActionError::InvalidTarget);
        };
        agent.cell = destination;
        agent.spend_moves(cost);
        let remaining_moves = agent.remaining_moves();
        let _ = self.grid.vacate(from);
        self.grid.occupy(destination, id);

        tracing::debug!(agent = id.get(), ?from, to = ?destination, cost, "agent moved");
        self.select(id, out_events);
        out_events.push(Event::AgentMoved {
            agent: id,
            from,
            to: destination,
            cost,
            remaining_moves,
        });

        self.conclude_action(out_events);
        Ok(())
    }

    fn attack(
        &mut self,
        player: PlayerId,
        attacker: AgentId,
        target: AgentId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_turn(player)?;
        let _ = self.own_living_agent(player, attacker)?;
        if self.fallen.contains(&target) {
            return Err(ActionError::AgentNotAlive);
        }

        let agents = self.agent_view();
        let resolution = CombatResolver::new(self.grid.view(), &agents).resolve_attack(
            attacker,
            target,
            &mut self.rng,
        )?;

        self.select(attacker, out_events);
        self.apply_resolution(&resolution, out_events);
        self.conclude_action(out_events);
        Ok(())
    }

    fn apply_resolution(&mut self, resolution: &AttackResolution, out_events: &mut Vec<Event>) {
        if let Some(target) = self.agent_mut(resolution.target) {
            let health = target.take_damage(resolution.damage);
            debug_assert_eq!(health, resolution.target_health);
        }
        if let Some(attacker) = self.agent_mut(resolution.attacker) {
            let health = attacker.take_damage(resolution.recoil);
            debug_assert_eq!(health, resolution.attacker_health);
        }

        tracing::debug!(
            attacker = resolution.attacker.get(),
            target = resolution.target.get(),
            damage = resolution.damage,
            recoil = resolution.recoil,
            "attack resolved"
        );
        out_events.push(Event::AgentAttacked {
            attacker: resolution.attacker,
            target: resolution.target,
            damage: resolution.damage,
            recoil: resolution.recoil,
            target_health: resolution.target_health,
            attacker_health: resolution.attacker_health,
        });

        if resolution.target_removed() {
            self.remove_agent(resolution.target, out_events);
        }

        if let Some(relocation) = resolution.relocation {
            if let Some(attacker) = self.agent_mut(resolution.attacker) {
                attacker.cell = relocation.to;
            }
            let _ = self.grid.vacate(relocation.from);
            self.grid.occupy(relocation.to, resolution.attacker);
            out_events.push(Event::AgentRelocated {
                agent: resolution.attacker,
                from: relocation.from,
                to: relocation.to,
            });
        }

        if resolution.attacker_removed() {
            self.remove_agent(resolution.attacker, out_events);
            if self.state.selected == Some(resolution.attacker) {
                self.deselect(out_events);
            }
        }
    }

    fn remove_agent(&mut self, id: AgentId, out_events: &mut Vec<Event>) {
        for roster in &mut self.rosters {
            let Some(agent) = roster.remove(id) else {
                continue;
            };
            let _ = self.grid.vacate(agent.cell);
            let _ = self.fallen.insert(id);
            tracing::debug!(agent = id.get(), player = ?agent.owner, "agent removed");
            out_events.push(Event::AgentRemoved {
                agent: id,
                player: agent.owner,
                cell: agent.cell,
            });
            return;
        }
    }

    fn conclude_action(&mut self, out_events: &mut Vec<Event>) {
        match self.decided_outcome() {
            Some(outcome) => self.finish(outcome, out_events),
            None => self.end_turn(out_events),
        }
    }

    fn decided_outcome(&self) -> Option<MatchOutcome> {
        let alive = |player: PlayerId| self.rosters[player.index()].has_alive_agents();
        match (alive(PlayerId::First), alive(PlayerId::Second)) {
            (true, true) => None,
            (true, false) => Some(MatchOutcome::Winner(PlayerId::First)),
            (false, true) => Some(MatchOutcome::Winner(PlayerId::Second)),
            (false, false) => Some(MatchOutcome::Draw),
        }
    }

    fn finish(&mut self, outcome: MatchOutcome, out_events: &mut Vec<Event>) {
        self.deselect(out_events);
        self.state.phase = Phase::Finished;
        self.state.outcome = Some(outcome);

        tracing::info!(?outcome, "match finished");
        out_events.push(Event::PhaseChanged {
            phase: Phase::Finished,
        });
        out_events.push(Event::MatchFinished { outcome });
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        self.deselect(out_events);
        let next = self.state.active.other();
        self.state.active = next;
        self.rosters[next.index()].reset_moves();

        tracing::debug!(player = ?next, "turn started");
        out_events.push(Event::TurnStarted { player: next });
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        for roster in &mut self.rosters {
            roster.clear();
        }
        for deck in &mut self.decks {
            deck.restore();
        }
        self.grid.clear_occupants();
        self.fallen.clear();
        self.state = MatchState::new();
        self.next_agent_id = 0;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.rng_seed());

        tracing::info!(phase = ?Phase::Placement, "match reset");
        out_events.push(Event::MatchReset);
        out_events.push(Event::PhaseChanged {
            phase: Phase::Placement,
        });
    }
}

/// Applies the provided command to the world.
///
/// A rejected command leaves the world untouched and appends no events.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), ActionError> {
    let result = match command {
        Command::PlaceAgent { player, card, cell } => {
            world.place_agent(player, card, cell, out_events)
        }
        Command::SelectAgent { player, agent } => world.select_agent(player, agent, out_events),
        Command::ClearSelection { player } => world.clear_selection(player, out_events),
        Command::MoveAgent {
            player,
            agent,
            destination,
        } => world.move_agent(player, agent, destination, out_events),
        Command::Attack {
            player,
            attacker,
            target,
        } => world.attack(player, attacker, target, out_events),
        Command::ResetMatch => {
            world.reset(out_events);
            Ok(())
        }
    };

    if let Err(error) = result {
        tracing::debug!(?command, %error, "command rejected");
    }
    result
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use hex_tactics_core::{
        AgentCard, AgentId, AgentSnapshot, AgentView, BoardView, CardId, HexCoord, MatchOutcome,
        Phase, PlayerId,
    };
    use hex_tactics_system_combat::CombatResolver;
    use hex_tactics_system_movement::MovementPlanner;

    use super::{HexGrid, MatchConfig, World};

    /// Current phase of the match.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.state.phase
    }

    /// Player whose turn it is. Player one during placement.
    #[must_use]
    pub fn active_player(world: &World) -> PlayerId {
        world.state.active
    }

    /// Result of the match once it has finished.
    #[must_use]
    pub fn outcome(world: &World) -> Option<MatchOutcome> {
        world.state.outcome
    }

    /// Agent currently selected by the active player.
    #[must_use]
    pub fn selected_agent(world: &World) -> Option<AgentId> {
        world.state.selected
    }

    /// How far the player has progressed through placement.
    #[must_use]
    pub fn placement_progress(world: &World, player: PlayerId) -> PlacementProgress {
        PlacementProgress {
            placed: world.state.placed[player.index()],
            target: world.config.agents_per_player(),
        }
    }

    /// Display name of the player.
    #[must_use]
    pub fn player_name(world: &World, player: PlayerId) -> &str {
        world.config.player_name(player)
    }

    /// Configuration the match was created with.
    #[must_use]
    pub fn config(world: &World) -> &MatchConfig {
        &world.config
    }

    /// Provides read-only access to the board storage and placement zones.
    #[must_use]
    pub fn grid(world: &World) -> &HexGrid {
        &world.grid
    }

    /// Read-only view of every cell's terrain and occupant.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView<'_> {
        world.grid.view()
    }

    /// Captures a read-only view of every living agent.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        world.agent_view()
    }

    /// Snapshot of a single living agent.
    #[must_use]
    pub fn agent(world: &World, agent: AgentId) -> Option<AgentSnapshot> {
        world.agent(agent).map(|agent| agent.snapshot())
    }

    /// Living agents of the player in placement order.
    #[must_use]
    pub fn agents_of(world: &World, player: PlayerId) -> Vec<AgentSnapshot> {
        world.rosters[player.index()]
            .iter()
            .map(|agent| agent.snapshot())
            .collect()
    }

    /// Reports whether the player still has anyone on the board.
    #[must_use]
    pub fn has_alive_agents(world: &World, player: PlayerId) -> bool {
        world.rosters[player.index()].has_alive_agents()
    }

    /// Cards the player has not placed yet, in deck order.
    #[must_use]
    pub fn remaining_cards(world: &World, player: PlayerId) -> Vec<(CardId, AgentCard)> {
        world.decks[player.index()]
            .remaining()
            .map(|(id, card)| (id, card.clone()))
            .collect()
    }

    /// Cells where the player could place the card right now.
    #[must_use]
    pub fn valid_placement_cells(
        world: &World,
        player: PlayerId,
        card: CardId,
    ) -> BTreeSet<HexCoord> {
        let deck = &world.decks[player.index()];
        let placement_open = world.state.phase == Phase::Placement
            && world.state.placed[player.index()] < world.config.agents_per_player();
        let Some(template) = deck.card(card).filter(|_| placement_open && !deck.is_used(card))
        else {
            return BTreeSet::new();
        };

        let board = world.grid.view();
        world
            .grid
            .zone(player)
            .iter()
            .copied()
            .filter(|&cell| {
                board.is_free(cell)
                    && board
                        .terrain(cell)
                        .is_some_and(|terrain| template.archetype().can_occupy(terrain))
            })
            .collect()
    }

    /// Cells the agent could end a move on with its remaining budget.
    #[must_use]
    pub fn reachable_cells(world: &World, agent: AgentId) -> BTreeSet<HexCoord> {
        world
            .agent(agent)
            .filter(|agent| agent.is_alive())
            .map(|agent| {
                MovementPlanner::new(world.grid.view(), agent.archetype())
                    .reachable_cells(agent.cell, agent.remaining_moves())
            })
            .unwrap_or_default()
    }

    /// Cells the agent could fly or float over this turn without stopping.
    #[must_use]
    pub fn passable_cells(world: &World, agent: AgentId) -> BTreeSet<HexCoord> {
        world
            .agent(agent)
            .filter(|agent| agent.is_alive())
            .map(|agent| {
                MovementPlanner::new(world.grid.view(), agent.archetype())
                    .passable_cells(agent.cell, agent.remaining_moves())
            })
            .unwrap_or_default()
    }

    /// Living enemies the agent could attack right now.
    #[must_use]
    pub fn attackable_targets(world: &World, agent: AgentId) -> Vec<AgentId> {
        let agents = world.agent_view();
        CombatResolver::new(world.grid.view(), &agents).attackable_targets(agent)
    }

    /// Hop distance between two coordinates, ignoring terrain and occupants.
    #[must_use]
    pub fn cell_distance(a: HexCoord, b: HexCoord) -> u32 {
        a.distance(b)
    }

    /// Count of agents a player has placed against the required total.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlacementProgress {
        /// Agents placed so far.
        pub placed: usize,
        /// Agents each player must place.
        pub target: usize,
    }

    impl PlacementProgress {
        /// Reports whether the player has placed every agent.
        #[must_use]
        pub const fn is_complete(&self) -> bool {
            self.placed >= self.target
        }
    }
}
