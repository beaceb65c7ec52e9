//! Match configuration, constructed in code or loaded from TOML.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use hex_tactics_core::{AgentCard, Archetype, PlayerId, DEFAULT_AGENTS_PER_PLAYER};

use crate::deck::standard_deck;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Seed used when no configuration provides one.
pub const DEFAULT_RNG_SEED: u64 = 0x5eed_4e78_7ac7_1c55;

const DEFAULT_PLAYER_NAMES: [&str; 2] = ["Player 1", "Player 2"];

/// Parameters fixed for the lifetime of a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    agents_per_player: usize,
    rng_seed: u64,
    deck: Option<Vec<AgentCard>>,
    player_names: [Option<String>; 2],
}

impl MatchConfig {
    /// Creates a configuration that plays with the standard deck.
    #[must_use]
    pub const fn new(agents_per_player: usize, rng_seed: u64) -> Self {
        Self {
            agents_per_player,
            rng_seed,
            deck: None,
            player_names: [None, None],
        }
    }

    /// Replaces the standard deck with the provided cards.
    #[must_use]
    pub fn with_deck(mut self, deck: Vec<AgentCard>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Names the two players for display.
    #[must_use]
    pub fn with_player_names(
        mut self,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        self.player_names = [Some(first.into()), Some(second.into())];
        self
    }

    /// Display name of the player, falling back to "Player 1" or "Player 2".
    #[must_use]
    pub fn player_name(&self, player: PlayerId) -> &str {
        self.player_names[player.index()]
            .as_deref()
            .unwrap_or(DEFAULT_PLAYER_NAMES[player.index()])
    }

    /// Number of agents each player places before battle.
    #[must_use]
    pub const fn agents_per_player(&self) -> usize {
        self.agents_per_player
    }

    /// Seed of the generator used for post-attack repositioning.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Custom deck, if one replaces the standard roster.
    #[must_use]
    pub fn custom_deck(&self) -> Option<&[AgentCard]> {
        self.deck.as_deref()
    }

    /// Cards handed to each player at the start of a match.
    #[must_use]
    pub fn deck(&self) -> Vec<AgentCard> {
        self.deck.clone().unwrap_or_else(standard_deck)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).context("failed to parse match config toml contents")?;
        if file.version != SUPPORTED_CONFIG_VERSION {
            bail!(
                "unsupported match config version {}; expected {}",
                file.version,
                SUPPORTED_CONFIG_VERSION
            );
        }

        let agents_per_player = file.agents_per_player.unwrap_or(DEFAULT_AGENTS_PER_PLAYER);
        if agents_per_player == 0 {
            bail!("agents_per_player must be at least one");
        }

        let mut config = Self::new(
            agents_per_player,
            file.rng_seed.unwrap_or(DEFAULT_RNG_SEED),
        );

        if let Some([first, second]) = file.player_names {
            if first.trim().is_empty() || second.trim().is_empty() {
                bail!("player names must not be blank");
            }
            config = config.with_player_names(first, second);
        }

        if let Some(entries) = file.cards {
            if entries.is_empty() {
                bail!("match config declares an empty deck");
            }
            let cards = entries.into_iter().map(CardEntry::into_card).collect();
            config = config.with_deck(cards);
        }

        let deck_size = config.custom_deck().map_or(standard_deck().len(), <[_]>::len);
        if deck_size < agents_per_player {
            bail!("deck holds {deck_size} cards but each player must place {agents_per_player}");
        }

        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read match config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to load match config from {}", path.display()))
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_AGENTS_PER_PLAYER, DEFAULT_RNG_SEED)
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    version: u32,
    agents_per_player: Option<usize>,
    rng_seed: Option<u64>,
    player_names: Option<[String; 2]>,
    cards: Option<Vec<CardEntry>>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CardEntry {
    name: String,
    archetype: Archetype,
    health: u32,
    mobility: u32,
    damage: u32,
    attack_range: u32,
}

impl CardEntry {
    fn into_card(self) -> AgentCard {
        AgentCard::new(
            self.name,
            self.archetype,
            self.health,
            self.mobility,
            self.damage,
            self.attack_range,
        )
    }
}
