//! Per-player card decks and the standard roster.

use hex_tactics_core::{AgentCard, Archetype, CardId};

/// Stats of the standard roster: name, archetype, health, mobility, damage, range.
const STANDARD_ROSTER: [(&str, Archetype, u32, u32, u32, u32); 24] = [
    ("Sir Lamorak", Archetype::Grounded, 320, 3, 110, 1),
    ("Kabul", Archetype::Grounded, 400, 2, 120, 1),
    ("Rajakal", Archetype::Grounded, 320, 2, 130, 1),
    ("Salih", Archetype::Grounded, 400, 2, 80, 1),
    ("Khan", Archetype::Grounded, 320, 2, 90, 1),
    ("Boi", Archetype::Grounded, 400, 2, 100, 1),
    ("Eloi", Archetype::Grounded, 240, 2, 100, 2),
    ("Kanar", Archetype::Grounded, 160, 2, 100, 2),
    ("Elsa", Archetype::Grounded, 320, 2, 140, 2),
    ("Karissa", Archetype::Grounded, 280, 2, 80, 2),
    ("Sir Philip", Archetype::Grounded, 400, 2, 100, 1),
    ("Frost", Archetype::Grounded, 260, 2, 80, 2),
    ("Tusk", Archetype::Grounded, 400, 2, 100, 1),
    ("Rambu", Archetype::Flying, 320, 3, 120, 1),
    ("Sabrina", Archetype::Floating, 320, 3, 100, 1),
    ("Death", Archetype::Floating, 240, 3, 120, 2),
    ("Reketon", Archetype::WaterWalking, 320, 2, 80, 2),
    ("Angus", Archetype::WaterWalking, 400, 2, 100, 1),
    ("Duraham", Archetype::WaterWalking, 320, 2, 100, 2),
    ("Colonel Baba", Archetype::WaterWalking, 400, 2, 100, 1),
    ("Medusa", Archetype::WaterWalking, 320, 2, 90, 2),
    ("Bunka", Archetype::WaterWalking, 320, 3, 100, 1),
    ("Sanka", Archetype::WaterWalking, 320, 3, 100, 1),
    ("Billy", Archetype::WaterWalking, 320, 3, 90, 1),
];

/// Cards every player receives when no custom deck is configured.
#[must_use]
pub fn standard_deck() -> Vec<AgentCard> {
    STANDARD_ROSTER
        .iter()
        .map(|&(name, archetype, health, mobility, damage, range)| {
            AgentCard::new(name, archetype, health, mobility, damage, range)
        })
        .collect()
}

/// One player's private copy of the deck and which cards were placed.
#[derive(Clone, Debug)]
pub(crate) struct Deck {
    cards: Vec<AgentCard>,
    used: Vec<bool>,
}

impl Deck {
    pub(crate) fn new(cards: Vec<AgentCard>) -> Self {
        let used = vec![false; cards.len()];
        Self { cards, used }
    }

    pub(crate) fn card(&self, id: CardId) -> Option<&AgentCard> {
        self.cards.get(id.get() as usize)
    }

    pub(crate) fn is_used(&self, id: CardId) -> bool {
        self.used.get(id.get() as usize).copied().unwrap_or(false)
    }

    pub(crate) fn mark_used(&mut self, id: CardId) {
        if let Some(slot) = self.used.get_mut(id.get() as usize) {
            *slot = true;
        }
    }

    /// Cards not yet placed, in deck order.
    pub(crate) fn remaining(&self) -> impl Iterator<Item = (CardId, &AgentCard)> {
        self.cards
            .iter()
            .zip(&self.used)
            .enumerate()
            .filter(|(_, (_, used))| !**used)
            .map(|(index, (card, _))| (CardId::new(index as u32), card))
    }

    pub(crate) fn restore(&mut self) {
        self.used.iter_mut().for_each(|used| *used = false);
    }
}
