//! Terrain kinds, agent archetypes, and the static capability table that
//! decides where an archetype may stop and what it may pass over.

use serde::{Deserialize, Serialize};

/// Kind of terrain covering a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground.
    Normal,
    /// Open water.
    Water,
    /// Impassable rock for most archetypes.
    Rock,
    /// Objective marker; behaves exactly like [`Terrain::Normal`] for rules.
    Goal,
}

impl Terrain {
    /// Every terrain kind in declaration order.
    pub const ALL: [Terrain; 4] = [Self::Normal, Self::Water, Self::Rock, Self::Goal];

    /// Column of the capability table consulted for this terrain.
    const fn table_column(self) -> usize {
        match self {
            Self::Normal | Self::Goal => 0,
            Self::Water => 1,
            Self::Rock => 2,
        }
    }
}

/// Movement archetype of an agent. Fixed for the agent's whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    /// Walks on ground and water, never on rock.
    WaterWalking,
    /// Restricted to open ground.
    Grounded,
    /// Lands on ground only but flies over anything.
    Flying,
    /// Hovers over and settles on any terrain.
    Floating,
}

impl Archetype {
    /// Every archetype in declaration order.
    pub const ALL: [Archetype; 4] = [
        Self::WaterWalking,
        Self::Grounded,
        Self::Flying,
        Self::Floating,
    ];

    const fn table_row(self) -> usize {
        match self {
            Self::WaterWalking => 0,
            Self::Grounded => 1,
            Self::Flying => 2,
            Self::Floating => 3,
        }
    }

    /// Looks up what the archetype may do on the provided terrain.
    #[must_use]
    pub const fn capability(self, terrain: Terrain) -> Capability {
        CAPABILITIES[self.table_row()][terrain.table_column()]
    }

    /// Whether the archetype may end a move on, or be placed on, the terrain.
    #[must_use]
    pub const fn can_occupy(self, terrain: Terrain) -> bool {
        self.capability(terrain).occupy
    }

    /// Whether the archetype may pass through the terrain en route.
    #[must_use]
    pub const fn can_cross(self, terrain: Terrain) -> bool {
        self.capability(terrain).cross
    }
}

/// Pair of rule predicates evaluated for an archetype on one terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capability {
    /// The archetype may stop here.
    pub occupy: bool,
    /// The archetype may move through here.
    pub cross: bool,
}

impl Capability {
    const fn new(occupy: bool, cross: bool) -> Self {
        Self { occupy, cross }
    }
}

const YES: Capability = Capability::new(true, true);
const NO: Capability = Capability::new(false, false);
const CROSS_ONLY: Capability = Capability::new(false, true);

// Rows follow `Archetype::table_row`, columns are Normal/Goal, Water, Rock.
const CAPABILITIES: [[Capability; 3]; 4] = [
    [YES, YES, NO],
    [YES, NO, NO],
    [YES, CROSS_ONLY, CROSS_ONLY],
    [YES, YES, YES],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupiable_terrain_is_always_crossable() {
        for archetype in Archetype::ALL {
            for terrain in Terrain::ALL {
                if archetype.can_occupy(terrain) {
                    assert!(
                        archetype.can_cross(terrain),
                        "{archetype:?} may occupy {terrain:?} but not cross it"
                    );
                }
            }
        }
    }

    #[test]
    fn goal_behaves_like_normal() {
        for archetype in Archetype::ALL {
            assert_eq!(
                archetype.capability(Terrain::Goal),
                archetype.capability(Terrain::Normal)
            );
        }
    }

    #[test]
    fn capability_matrix_matches_rules() {
        let expected = [
            (Archetype::WaterWalking, Terrain::Water, true, true),
            (Archetype::WaterWalking, Terrain::Rock, false, false),
            (Archetype::Grounded, Terrain::Normal, true, true),
            (Archetype::Grounded, Terrain::Water, false, false),
            (Archetype::Grounded, Terrain::Rock, false, false),
            (Archetype::Flying, Terrain::Water, false, true),
            (Archetype::Flying, Terrain::Rock, false, true),
            (Archetype::Floating, Terrain::Rock, true, true),
            (Archetype::Floating, Terrain::Water, true, true),
        ];

        for (archetype, terrain, occupy, cross) in expected {
            assert_eq!(archetype.can_occupy(terrain), occupy, "{archetype:?} on {terrain:?}");
            assert_eq!(archetype.can_cross(terrain), cross, "{archetype:?} over {terrain:?}");
        }
    }

    #[test]
    fn every_archetype_may_stand_on_open_ground() {
        for archetype in Archetype::ALL {
            assert!(archetype.can_occupy(Terrain::Normal));
        }
    }
}
