//! Living agents owned by each player.

use hex_tactics_core::{AgentCard, AgentId, AgentSnapshot, Archetype, CardId, HexCoord, PlayerId};

#[derive(Clone, Debug)]
pub(crate) struct Agent {
    pub(crate) id: AgentId,
    pub(crate) owner: PlayerId,
    pub(crate) cell: HexCoord,
    name: String,
    card: CardId,
    archetype: Archetype,
    max_health: u32,
    health: u32,
    mobility: u32,
    remaining_moves: u32,
    damage: u32,
    attack_range: u32,
}

impl Agent {
    pub(crate) fn from_card(
        id: AgentId,
        owner: PlayerId,
        card_id: CardId,
        card: &AgentCard,
        cell: HexCoord,
    ) -> Self {
        Self {
            id,
            owner,
            cell,
            name: card.name().to_owned(),
            card: card_id,
            archetype: card.archetype(),
            max_health: card.health(),
            health: card.health(),
            mobility: card.mobility(),
            remaining_moves: card.mobility(),
            damage: card.damage(),
            attack_range: card.attack_range(),
        }
    }

    pub(crate) fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub(crate) fn remaining_moves(&self) -> u32 {
        self.remaining_moves
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub(crate) fn reset_moves(&mut self) {
        self.remaining_moves = self.mobility;
    }

    pub(crate) fn spend_moves(&mut self, cost: u32) {
        self.remaining_moves = self.remaining_moves.saturating_sub(cost);
    }

    /// Lowers health, flooring at zero, and returns what is left.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub(crate) fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            name: self.name.clone(),
            owner: self.owner,
            card: self.card,
            archetype: self.archetype,
            cell: self.cell,
            max_health: self.max_health,
            health: self.health,
            mobility: self.mobility,
            remaining_moves: self.remaining_moves,
            damage: self.damage,
            attack_range: self.attack_range,
        }
    }
}

/// Agents of one player in placement order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    pub(crate) fn push(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    pub(crate) fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id == id)
    }

    pub(crate) fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let position = self.agents.iter().position(|agent| agent.id == id)?;
        Some(self.agents.remove(position))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub(crate) fn has_alive_agents(&self) -> bool {
        self.agents.iter().any(Agent::is_alive)
    }

    pub(crate) fn reset_moves(&mut self) {
        self.agents
            .iter_mut()
            .filter(|agent| agent.is_alive())
            .for_each(Agent::reset_moves);
    }

    pub(crate) fn clear(&mut self) {
        self.agents.clear();
    }
}
