#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure combat system that validates attacks and plans their resolution.
//!
//! Nothing here mutates the board. [`CombatResolver::resolve_attack`] returns
//! an [`AttackResolution`] describing every consequence of the attack in the
//! order the world must apply them: target damage, attacker recoil, target
//! removal, attacker repositioning, attacker removal.

use std::collections::{BTreeMap, VecDeque};

use hex_tactics_core::{
    ActionError, AgentId, AgentSnapshot, AgentView, Archetype, BoardView, HexCoord,
};
use rand::{seq::SliceRandom, Rng};

/// Combat rules evaluated against one board and agent snapshot.
#[derive(Clone, Copy, Debug)]
pub struct CombatResolver<'a> {
    board: BoardView<'a>,
    agents: &'a AgentView,
}

impl<'a> CombatResolver<'a> {
    /// Creates a resolver reading the provided snapshots.
    #[must_use]
    pub const fn new(board: BoardView<'a>, agents: &'a AgentView) -> Self {
        Self { board, agents }
    }

    /// Cells within `range` hops of `origin`, excluding the origin itself.
    ///
    /// Terrain and occupancy never block a line of attack, so the search walks
    /// plain adjacency.
    #[must_use]
    pub fn cells_in_range(&self, origin: HexCoord, range: u32) -> Vec<HexCoord> {
        let mut distances = BTreeMap::new();
        if range == 0 || !self.board.contains(origin) {
            return Vec::new();
        }

        let mut queue = VecDeque::new();
        let _ = distances.insert(origin, 0_u32);
        queue.push_back((origin, 0_u32));

        while let Some((cell, distance)) = queue.pop_front() {
            if distance >= range {
                continue;
            }
            for neighbor in self.board.neighbors(cell) {
                if distances.contains_key(&neighbor) {
                    continue;
                }
                let _ = distances.insert(neighbor, distance + 1);
                queue.push_back((neighbor, distance + 1));
            }
        }

        distances
            .into_iter()
            .filter(|&(_, distance)| distance > 0)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Living enemy agents standing within the attacker's range.
    #[must_use]
    pub fn attackable_targets(&self, attacker: AgentId) -> Vec<AgentId> {
        let Some(attacker) = self.agents.get(attacker) else {
            return Vec::new();
        };
        if !attacker.is_alive() {
            return Vec::new();
        }

        let mut targets: Vec<AgentId> = self
            .cells_in_range(attacker.cell, attacker.attack_range)
            .into_iter()
            .filter_map(|cell| self.board.occupant(cell))
            .filter(|occupant| {
                self.agents
                    .get(*occupant)
                    .is_some_and(|agent| agent.owner != attacker.owner && agent.is_alive())
            })
            .collect();
        targets.sort();
        targets
    }

    /// Validates that `attacker` may attack `target` right now.
    pub fn check_attack(&self, attacker: AgentId, target: AgentId) -> Result<(), ActionError> {
        let attacker = self.agents.get(attacker).ok_or(ActionError::InvalidTarget)?;
        let target = self.agents.get(target).ok_or(ActionError::InvalidTarget)?;

        if !attacker.is_alive() || !target.is_alive() {
            return Err(ActionError::AgentNotAlive);
        }
        if attacker.owner == target.owner {
            return Err(ActionError::ForeignAgent);
        }
        if !self
            .cells_in_range(attacker.cell, attacker.attack_range)
            .contains(&target.cell)
        {
            return Err(ActionError::OutOfRange);
        }

        Ok(())
    }

    /// Free cells next to `around` that the archetype may stand on.
    #[must_use]
    pub fn relocation_candidates(&self, around: HexCoord, archetype: Archetype) -> Vec<HexCoord> {
        self.board
            .neighbors(around)
            .filter(|&cell| {
                self.board.is_free(cell)
                    && self
                        .board
                        .terrain(cell)
                        .is_some_and(|terrain| archetype.can_occupy(terrain))
            })
            .collect()
    }

    /// Plans the full consequences of a legal attack.
    ///
    /// Repositioning picks uniformly among [`Self::relocation_candidates`] of
    /// the target's cell using the supplied random source.
    pub fn resolve_attack<R>(
        &self,
        attacker: AgentId,
        target: AgentId,
        rng: &mut R,
    ) -> Result<AttackResolution, ActionError>
    where
        R: Rng + ?Sized,
    {
        self.check_attack(attacker, target)?;
        let attacker = self.agents.get(attacker).ok_or(ActionError::InvalidTarget)?;
        let target = self.agents.get(target).ok_or(ActionError::InvalidTarget)?;

        Ok(self.plan(attacker, target, rng))
    }

    fn plan<R>(
        &self,
        attacker: &AgentSnapshot,
        target: &AgentSnapshot,
        rng: &mut R,
    ) -> AttackResolution
    where
        R: Rng + ?Sized,
    {
        let damage = attacker.damage;
        let target_health = target.health.saturating_sub(damage);
        let recoil = damage / 2;
        let attacker_health = attacker.health.saturating_sub(recoil);

        let relocation = if attacker_health > 0 {
            self.relocation_candidates(target.cell, attacker.archetype)
                .choose(rng)
                .map(|&to| Relocation {
                    from: attacker.cell,
                    to,
                })
        } else {
            None
        };

        AttackResolution {
            attacker: attacker.id,
            target: target.id,
            damage,
            recoil,
            target_health,
            attacker_health,
            target_cell: target.cell,
            relocation,
        }
    }
}

/// Every consequence of one attack, in application order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackResolution {
    /// Agent that attacked.
    pub attacker: AgentId,
    /// Agent that was attacked.
    pub target: AgentId,
    /// Damage applied to the target.
    pub damage: u32,
    /// Damage the attacker inflicts on itself, half its damage rounded down.
    pub recoil: u32,
    /// Target health after the attack, floored at zero.
    pub target_health: u32,
    /// Attacker health after the recoil, floored at zero.
    pub attacker_health: u32,
    /// Cell the target stood on before the attack.
    pub target_cell: HexCoord,
    /// Where the surviving attacker is moved, if any cell was free.
    pub relocation: Option<Relocation>,
}

impl AttackResolution {
    /// Whether the target dies and leaves the board.
    #[must_use]
    pub const fn target_removed(&self) -> bool {
        self.target_health == 0
    }

    /// Whether the recoil kills the attacker.
    #[must_use]
    pub const fn attacker_removed(&self) -> bool {
        self.attacker_health == 0
    }
}

/// Post-attack move of the attacker next to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relocation {
    /// Cell the attacker leaves.
    pub from: HexCoord,
    /// Cell the attacker ends on.
    pub to: HexCoord,
}
