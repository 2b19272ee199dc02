use crate::catalog::{character, EGG};
use crate::model::{GameState, LegacyPet, Mode, PetStats, HOME, LEGACY_CAP};
use crate::sound::Cue;

/// Appends `pet` and evicts the oldest entries beyond the cap.
pub(crate) fn archive(legacy: &mut Vec<LegacyPet>, pet: LegacyPet) {
    legacy.push(pet);
    if legacy.len() > LEGACY_CAP {
        let excess = legacy.len() - LEGACY_CAP;
        legacy.drain(..excess);
    }
}

pub(crate) fn training_bonus(partner: Option<&LegacyPet>) -> u32 {
    partner.map_or(0, |p| p.final_training / 5)
}

impl GameState {
    pub(crate) fn outgoing_pet(&self) -> LegacyPet {
        LegacyPet {
            id: self.character_id,
            name: character(self.character_id).name.to_string(),
            generation: self.generation,
            final_training: self.stats.training,
        }
    }

    /// Archives the current pet and hatches the next generation.
    ///
    /// `partner` has already been looked up in `legacy` by the caller.
    pub(crate) fn start_new_generation(&mut self, partner: Option<LegacyPet>) {
        let bonus = training_bonus(partner.as_ref());
        let outgoing = self.outgoing_pet();
        log::info!(
            "generation {} ends: {} (training {}), partner {:?}",
            outgoing.generation,
            outgoing.name,
            outgoing.final_training,
            partner.as_ref().map(|p| p.name.as_str())
        );
        archive(&mut self.legacy, outgoing);

        self.character_id = EGG;
        self.pending_evo_id = None;
        self.stats = PetStats {
            training: bonus,
            ..PetStats::default()
        };
        self.pos = HOME;
        self.target_pos = HOME;
        self.generation += 1;
        self.selected_menu_index = 0;
        self.set_mode(Mode::Room);
        self.cue(Cue::Start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModeKind;
    use chrono::Utc;

    fn pet(id: u8, generation: u32, training: u32) -> LegacyPet {
        LegacyPet {
            id,
            name: character(id).name.to_string(),
            generation,
            final_training: training,
        }
    }

    #[test]
    fn archive_keeps_the_ten_most_recent() {
        let mut legacy = Vec::new();
        for g in 1..=13 {
            archive(&mut legacy, pet(18, g, 0));
        }
        assert_eq!(legacy.len(), LEGACY_CAP);
        assert_eq!(legacy.first().map(|p| p.generation), Some(4));
        assert_eq!(legacy.last().map(|p| p.generation), Some(13));
    }

    #[test]
    fn bonus_is_a_fifth_of_partner_training_rounded_down() {
        assert_eq!(training_bonus(None), 0);
        assert_eq!(training_bonus(Some(&pet(20, 1, 49))), 9);
        assert_eq!(training_bonus(Some(&pet(20, 1, 50))), 10);
    }

    #[test]
    fn solo_breeding_resets_to_defaults_and_bumps_generation() {
        let mut st = GameState::new(Utc::now());
        st.character_id = 24;
        st.generation = 3;
        st.stats.age = 100.0;
        st.stats.training = 77;
        st.stats.hunger = 3.0;
        st.stats.add_poop(HOME);
        st.pos = crate::model::Point::new(80, 40);
        st.set_mode(Mode::Breeding);

        st.start_new_generation(None);

        assert_eq!(st.generation, 4);
        assert_eq!(st.stats, PetStats::default());
        assert_eq!(st.stats.training, 0);
        assert_eq!(st.character_id, EGG);
        assert_eq!(st.pos, HOME);
        assert_eq!(st.mode.kind(), ModeKind::Room);
        assert_eq!(st.legacy, vec![pet(24, 3, 77)]);
        assert!(st.rt.cues.contains(&Cue::Start));
    }

    #[test]
    fn partner_breeding_inherits_training_bonus() {
        let mut st = GameState::new(Utc::now());
        st.legacy = vec![pet(18, 1, 42)];
        st.character_id = 29;
        st.generation = 2;
        st.stats.training = 5;

        let partner = st.legacy.first().cloned();
        st.start_new_generation(partner);

        assert_eq!(st.stats.training, 8);
        assert_eq!(st.legacy.len(), 2);
        assert_eq!(st.legacy[1].id, 29);
    }
}
