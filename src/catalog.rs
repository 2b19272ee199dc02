use crate::model::CharacterId;

pub(crate) const EGG: CharacterId = 0;
pub(crate) const FINAL_TIER: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Species {
    Slime,
    Beast,
    Bird,
    Robot,
    Plant,
    Ghost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CharacterDef {
    pub(crate) id: CharacterId,
    pub(crate) name: &'static str,
    pub(crate) tier: u8,
    pub(crate) species: Species,
}

const fn def(id: CharacterId, name: &'static str, tier: u8, species: Species) -> CharacterDef {
    CharacterDef {
        id,
        name,
        tier,
        species,
    }
}

pub(crate) const CHARACTERS: [CharacterDef; 30] = [
    def(0, "Tamago", 0, Species::Slime),
    def(1, "Punii", 1, Species::Slime),
    def(2, "Poron", 2, Species::Beast),
    def(3, "Wiru", 2, Species::Bird),
    def(4, "Giga", 2, Species::Robot),
    def(5, "Leaf", 2, Species::Plant),
    def(11, "Bubble", 2, Species::Slime),
    def(13, "Specto", 2, Species::Ghost),
    def(6, "Gargos", 3, Species::Beast),
    def(7, "Lunaris", 3, Species::Ghost),
    def(8, "Vector", 3, Species::Robot),
    def(9, "Flora", 3, Species::Plant),
    def(10, "Zenith", 3, Species::Bird),
    def(12, "Drago", 3, Species::Beast),
    def(14, "Cyber", 3, Species::Robot),
    def(15, "Wood", 3, Species::Plant),
    def(16, "Sky", 3, Species::Bird),
    def(17, "Gummy", 3, Species::Slime),
    def(18, "Leo", 4, Species::Beast),
    def(19, "Shadow", 4, Species::Ghost),
    def(20, "Proto", 4, Species::Robot),
    def(21, "Cactus", 4, Species::Plant),
    def(22, "Hawk", 4, Species::Bird),
    def(23, "Slai", 4, Species::Slime),
    def(24, "Tiger", 4, Species::Beast),
    def(25, "Phantom", 4, Species::Ghost),
    def(26, "Meta", 4, Species::Robot),
    def(27, "Rose", 4, Species::Plant),
    def(28, "Eagle", 4, Species::Bird),
    def(29, "Clear", 4, Species::Slime),
];

/// Unknown ids fall back to the egg.
pub(crate) fn character(id: CharacterId) -> &'static CharacterDef {
    CHARACTERS
        .iter()
        .find(|c| c.id == id)
        .unwrap_or(&CHARACTERS[0])
}

pub(crate) fn tier_members(tier: u8) -> Vec<&'static CharacterDef> {
    CHARACTERS.iter().filter(|c| c.tier == tier).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuItem {
    Feed,
    Clean,
    Game,
    Status,
    Heal,
    Clock,
}

impl MenuItem {
    pub(crate) const ALL: [MenuItem; 6] = [
        MenuItem::Feed,
        MenuItem::Clean,
        MenuItem::Game,
        MenuItem::Status,
        MenuItem::Heal,
        MenuItem::Clock,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuItem::Feed => "Feed",
            MenuItem::Clean => "Clean",
            MenuItem::Game => "Play",
            MenuItem::Status => "Status",
            MenuItem::Heal => "Heal",
            MenuItem::Clock => "Clock",
        }
    }

    /// Care actions an egg cannot receive.
    pub(crate) fn needs_hatched(self) -> bool {
        matches!(
            self,
            MenuItem::Feed | MenuItem::Clean | MenuItem::Game | MenuItem::Heal
        )
    }
}

pub(crate) const GAMES: [&str; 3] = ["Catch", "Acchi Duel", "Janken"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn ids_are_unique_and_cover_zero_to_29() {
        let ids: BTreeSet<_> = CHARACTERS.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), CHARACTERS.len());
        assert_eq!(ids.iter().copied().min(), Some(0));
        assert_eq!(ids.iter().copied().max(), Some(29));
    }

    #[test]
    fn every_tier_below_final_has_successors() {
        for tier in 0..FINAL_TIER {
            assert!(!tier_members(tier + 1).is_empty(), "tier {tier}");
        }
        assert!(tier_members(FINAL_TIER + 1).is_empty());
    }

    #[test]
    fn tier_sizes() {
        let sizes: Vec<usize> = (0..=FINAL_TIER).map(|t| tier_members(t).len()).collect();
        assert_eq!(sizes, vec![1, 1, 6, 10, 12]);
    }

    #[test]
    fn unknown_id_falls_back_to_egg() {
        assert_eq!(character(200).id, EGG);
        assert_eq!(character(13).name, "Specto");
    }
}
