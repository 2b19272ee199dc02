use crate::catalog::{character, tier_members, MenuItem, EGG, FINAL_TIER, GAMES};
use crate::catch::{self, CatchEvent, CatchGame, ItemKind};
use crate::duel::{
    self, AcchiGame, AcchiPhase, Hand, HoiOutcome, JankenGame, Verdict, DUEL_WIN_REWARD,
    JANKEN_WIN_REWARD,
};
use crate::model::{
    Direction, Emotion, GameState, Mode, ModeKind, PetStats, Point, Rules, MAX_POOP,
};
use crate::schedule::{Deferred, Guard};
use crate::sound::Cue;
use chrono::{DateTime, Utc};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerInput {
    Dir(Direction),
    Action,
    Back,
    CycleShell,
}

/// Linear decay for `dt_secs` of real time. No randomness, so applying it once
/// or in slices gives the same result.
pub(crate) fn decay(stats: &mut PetStats, dt_secs: f32, rules: &Rules) {
    let dt = dt_secs.max(0.0);
    stats.age += dt / rules.secs_per_year;
    stats.add_hunger(-dt * rules.hunger_decay);
    stats.add_happiness(-dt * rules.happiness_decay);
    if stats.poop_count() > 0 {
        stats.add_hygiene(-dt * rules.hygiene_decay);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rolled {
    pub(crate) pooped: bool,
    pub(crate) fell_sick: bool,
}

/// Once-per-tick chance events. Probabilities are per tick, not per second.
pub(crate) fn roll_events<R: Rng + ?Sized>(
    stats: &mut PetStats,
    rules: &Rules,
    rng: &mut R,
) -> Rolled {
    let mut rolled = Rolled::default();
    if stats.poop_count() < MAX_POOP && rng.gen::<f64>() < rules.poop_chance {
        let at = Point::new(rng.gen_range(10..90), rng.gen_range(65..85));
        rolled.pooped = stats.add_poop(at);
    }
    if stats.hygiene < rules.sick_below_hygiene && rng.gen::<f64>() < rules.sick_chance {
        rolled.fell_sick = !stats.is_sick;
        stats.is_sick = true;
    }
    rolled
}

pub(crate) fn ready_to_evolve(tier: u8, age: f32, rules: &Rules) -> bool {
    match tier {
        0 => age > rules.evolve_at[0],
        1..=3 => age >= rules.evolve_at[tier as usize],
        _ => false,
    }
}

fn cooled_down(last: Option<u64>, now: u64, cooldown_ms: u64) -> bool {
    last.map_or(true, |t| now.saturating_sub(t) > cooldown_ms)
}

/// Applies the time spent away in one step and returns the seconds accounted for.
pub(crate) fn catch_up(state: &mut GameState, now: DateTime<Utc>, rules: &Rules) -> f32 {
    let away_ms = (now - state.last_timestamp).num_milliseconds().max(0);
    let away = away_ms as f32 / 1000.0;
    if state.mode.kind().is_living() {
        decay(&mut state.stats, away, rules);
    }
    state.last_timestamp = now;
    state.rt.dirty = true;
    log::info!(
        "caught up {away:.0}s offline: age {:.1}, hunger {:.0}, happiness {:.0}",
        state.stats.age,
        state.stats.hunger,
        state.stats.happiness
    );
    away
}

impl GameState {
    /// One fixed step of `dt_secs`; the only place simulated time moves.
    pub(crate) fn tick<R: Rng + ?Sized>(&mut self, dt_secs: f32, rules: &Rules, rng: &mut R) {
        self.rt.clock_ms += (dt_secs.max(0.0) * 1000.0).round() as u64;
        self.fire_due(rules);

        let kind = self.mode.kind();
        if !matches!(
            kind,
            ModeKind::GameAcchi | ModeKind::GameJanken | ModeKind::EvoChoice
        ) {
            self.rt.frame = (self.rt.frame + 1) % 4;
        }
        if kind == ModeKind::Room {
            self.wander(rules, rng);
        }

        if kind.is_living() {
            self.live(dt_secs, rules, rng);
        } else if kind == ModeKind::EvoReady
            && cooled_down(self.rt.last_heartbeat_ms, self.rt.clock_ms, rules.heartbeat_ms)
        {
            self.cue(Cue::EvolutionReady);
            self.rt.last_heartbeat_ms = Some(self.rt.clock_ms);
        }

        let player_x = self.pos.x;
        if let Mode::GameCatch(game) = &mut self.mode {
            let events = game.tick(player_x, rng);
            self.on_catch_events(events, rules);
        }
        self.rt.dirty = true;
    }

    fn live<R: Rng + ?Sized>(&mut self, dt_secs: f32, rules: &Rules, rng: &mut R) {
        decay(&mut self.stats, dt_secs, rules);
        let rolled = roll_events(&mut self.stats, rules, rng);
        if rolled.pooped {
            self.cue(Cue::Poop);
        }
        if rolled.fell_sick {
            log::info!("pet fell sick (hygiene {:.0})", self.stats.hygiene);
        }
        if self.stats.is_calling(rules.call_below)
            && cooled_down(self.rt.last_call_ms, self.rt.clock_ms, rules.call_cooldown_ms)
        {
            self.cue(Cue::Call);
            self.rt.last_call_ms = Some(self.rt.clock_ms);
        }

        let age = self.stats.age;
        if age >= rules.life_span {
            self.end_of_life();
            return;
        }
        if age > rules.frail_age {
            let risk = (age - rules.frail_age) / (rules.life_span - rules.frail_age);
            if rng.gen::<f32>() < risk * rules.frail_risk_scale * dt_secs {
                self.end_of_life();
                return;
            }
        }
        if self.stats.hunger <= 0.0 && self.stats.happiness <= 0.0 {
            log::info!("{} died of neglect", character(self.character_id).name);
            self.cue(Cue::Dead);
            self.set_mode(Mode::Dead);
            return;
        }
        if ready_to_evolve(character(self.character_id).tier, age, rules) {
            log::info!("{} is ready to evolve at age {age:.1}", character(self.character_id).name);
            self.set_mode(Mode::EvoReady);
        }
    }

    fn end_of_life(&mut self) {
        log::info!(
            "{} reached the end of its life at age {:.1}",
            character(self.character_id).name,
            self.stats.age
        );
        self.cue(Cue::Win);
        self.set_mode(Mode::LifeEnd);
    }

    fn wander<R: Rng + ?Sized>(&mut self, rules: &Rules, rng: &mut R) {
        if self.rt.is_eating || self.character_id == EGG {
            return;
        }
        if self.pos != self.target_pos {
            self.pos = self.pos.step_toward(self.target_pos);
            if rng.gen::<f64>() < rules.footstep_chance {
                self.cue(Cue::Footstep);
            }
        } else if rng.gen::<f64>() < rules.wander_chance {
            self.target_pos = Point::new(rng.gen_range(10..90), rng.gen_range(30..70));
        }
    }

    fn fire_due(&mut self, rules: &Rules) {
        for (guard, what) in self.rt.timers.take_due(self.rt.clock_ms) {
            if !guard.holds(self.mode.kind(), self.rt.epoch) {
                log::debug!("dropping stale {what:?}");
                continue;
            }
            match what {
                Deferred::ClearEmotion { stamp } => {
                    if stamp == self.rt.emotion_stamp {
                        self.emotion = None;
                    }
                }
                Deferred::StopEating => self.rt.is_eating = false,
                Deferred::RevealJanken => self.reveal_janken(rules),
                Deferred::RevealHoi => self.reveal_hoi(rules),
            }
        }
    }

    pub(crate) fn apply<R: Rng + ?Sized>(&mut self, input: PlayerInput, rules: &Rules, rng: &mut R) {
        self.rt.dirty = true;
        match input {
            PlayerInput::CycleShell => {
                self.shell_design = self.shell_design.next();
                self.cue(Cue::Select);
            }
            PlayerInput::Back => self.back(),
            PlayerInput::Action => self.action(rules, rng),
            PlayerInput::Dir(dir) => self.direction(dir, rules, rng),
        }
    }

    fn back(&mut self) {
        let kind = self.mode.kind();
        let leaves = kind.is_minigame()
            || matches!(
                kind,
                ModeKind::Talk
                    | ModeKind::Status
                    | ModeKind::Menu
                    | ModeKind::GameSelect
                    | ModeKind::Evo
            );
        if leaves {
            self.cue(Cue::Back);
            self.pending_evo_id = None;
            self.set_mode(Mode::Room);
        }
    }

    fn action<R: Rng + ?Sized>(&mut self, rules: &Rules, rng: &mut R) {
        match self.mode.kind() {
            ModeKind::Room => {
                self.cue(Cue::Select);
                self.selected_menu_index = 0;
                self.set_mode(Mode::Menu);
            }
            ModeKind::EvoReady => {
                self.cue(Cue::Select);
                self.set_mode(Mode::EvoChoice);
            }
            ModeKind::EvoChoice => self.evolve(rng),
            ModeKind::Menu => self.run_menu(rules),
            ModeKind::GameSelect => self.start_game(),
            ModeKind::Talk
            | ModeKind::Status
            | ModeKind::Evo
            | ModeKind::GameCatch
            | ModeKind::GameAcchi
            | ModeKind::GameJanken => self.back(),
            ModeKind::LifeEnd => {
                self.selected_menu_index = 0;
                self.set_mode(Mode::Breeding);
            }
            ModeKind::Breeding => self.breed(),
            ModeKind::Dead => self.hard_reset(),
        }
    }

    fn direction<R: Rng + ?Sized>(&mut self, dir: Direction, rules: &Rules, rng: &mut R) {
        self.cue(Cue::Move);
        match self.mode.kind() {
            ModeKind::Menu => self.move_cursor(dir, MenuItem::ALL.len()),
            ModeKind::GameSelect => self.move_cursor(dir, GAMES.len()),
            ModeKind::Breeding => self.move_cursor(dir, self.legacy.len() + 1),
            ModeKind::GameCatch => {
                if let Mode::GameCatch(game) = &self.mode {
                    if !game.finished {
                        self.pos.x = catch::move_player(self.pos.x, dir);
                    }
                }
            }
            ModeKind::GameAcchi => {
                let phase = match &self.mode {
                    Mode::GameAcchi(game) => game.phase,
                    _ => return,
                };
                match phase {
                    AcchiPhase::Janken => {
                        if let Some(hand) = Hand::from_direction(dir) {
                            let opponent = Hand::random(rng);
                            self.throw_acchi(hand, opponent, rules);
                        }
                    }
                    AcchiPhase::Hoi => {
                        let opponent = duel::random_direction(rng);
                        self.point_acchi(dir, opponent, rules);
                    }
                    AcchiPhase::Result => {}
                }
            }
            ModeKind::GameJanken => {
                if let Some(hand) = Hand::from_direction(dir) {
                    let opponent = Hand::random(rng);
                    self.play_janken(hand, opponent, rules);
                }
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, dir: Direction, count: usize) {
        let next = self.selected_menu_index as isize + dir.cursor_delta();
        self.selected_menu_index = next.rem_euclid(count as isize) as usize;
    }

    /// Picks a random next-tier form. Final forms stay as they are.
    fn evolve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let current = character(self.character_id);
        let candidates = tier_members(current.tier + 1);
        if current.tier >= FINAL_TIER || candidates.is_empty() {
            log::debug!("{} has no further evolutions", current.name);
            return;
        }
        let next = candidates[rng.gen_range(0..candidates.len())];
        log::info!("{} evolved into {}", current.name, next.name);
        self.character_id = next.id;
        self.pending_evo_id = Some(next.id);
        self.cue(Cue::Evolution);
        self.set_mode(Mode::Evo);
    }

    fn run_menu(&mut self, rules: &Rules) {
        let item = MenuItem::ALL[self.selected_menu_index % MenuItem::ALL.len()];
        self.cue(Cue::Select);
        if character(self.character_id).tier == 0 && item.needs_hatched() {
            self.cue(Cue::Back);
            self.say("You can't look after an egg yet!");
            self.set_emotion(Emotion::Surprise, rules);
            self.set_mode(Mode::Talk);
            return;
        }
        match item {
            MenuItem::Feed => {
                self.cue(Cue::Eat);
                self.rt.is_eating = true;
                self.set_emotion(Emotion::Heart, rules);
                self.stats.add_hunger(40.0);
                self.say("Munch munch! Tasty.");
                self.set_mode(Mode::Talk);
                self.schedule(rules.eat_ms, Guard::Always, Deferred::StopEating);
            }
            MenuItem::Clean => {
                self.cue(Cue::Clean);
                self.set_emotion(Emotion::Sparkle, rules);
                self.stats.clear_poop();
                self.stats.hygiene = 100.0;
                self.say("Sparkling clean!");
                self.set_mode(Mode::Talk);
            }
            MenuItem::Game => {
                self.selected_menu_index = 0;
                self.set_mode(Mode::GameSelect);
            }
            MenuItem::Status => self.set_mode(Mode::Status),
            MenuItem::Heal => {
                self.cue(Cue::Heal);
                self.set_emotion(Emotion::Heart, rules);
                self.stats.is_sick = false;
                self.stats.add_happiness(25.0);
                self.say("All better!");
                self.set_mode(Mode::Talk);
            }
            MenuItem::Clock => self.set_mode(Mode::Room),
        }
    }

    fn start_game(&mut self) {
        self.cue(Cue::Start);
        match self.selected_menu_index % GAMES.len() {
            0 => {
                self.pos = catch::START;
                self.say("Catch the fruit, dodge the rest!");
                self.set_mode(Mode::GameCatch(CatchGame::new()));
            }
            1 => {
                self.say("Rock, paper, scissors...");
                self.set_mode(Mode::GameAcchi(AcchiGame::default()));
            }
            _ => {
                self.say("Rock, paper, scissors...");
                self.set_mode(Mode::GameJanken(JankenGame::default()));
            }
        }
    }

    fn on_catch_events(&mut self, events: Vec<CatchEvent>, rules: &Rules) {
        for event in events {
            match event {
                CatchEvent::TimerLow => self.cue(Cue::TimerLow),
                CatchEvent::Caught(ItemKind::Fruit) => self.cue(Cue::Catch),
                CatchEvent::Caught(ItemKind::Bad) => {
                    self.set_emotion(Emotion::Sweat, rules);
                    self.cue(Cue::Miss);
                }
                CatchEvent::Finished { score } => {
                    let (happiness, training) = catch::round_reward(score);
                    self.stats.reward(happiness, training);
                    if let Some(emotion) = catch::round_emotion(score) {
                        self.set_emotion(emotion, rules);
                    }
                    self.cue(Cue::Win);
                    self.say(&format!("Score: {score}"));
                    log::info!("catch round over: score {score}, training +{training}");
                }
            }
        }
    }

    pub(crate) fn play_janken(&mut self, hand: Hand, opponent: Hand, rules: &Rules) {
        let Mode::GameJanken(game) = &mut self.mode else {
            return;
        };
        let Some(verdict) = game.throw(hand, opponent) else {
            return;
        };
        self.cue(Cue::Janken);
        match verdict {
            Verdict::Draw => {
                self.say("A tie! Go again...");
                self.set_emotion(Emotion::Surprise, rules);
                self.cue(Cue::Alert);
            }
            Verdict::Win => {
                let (happiness, training) = JANKEN_WIN_REWARD;
                self.stats.reward(happiness, training);
                self.set_emotion(Emotion::Heart, rules);
                self.cue(Cue::Win);
                self.say("You win!");
            }
            Verdict::Lose => {
                self.set_emotion(Emotion::Sweat, rules);
                self.cue(Cue::Miss);
                self.say("I win!");
            }
        }
    }

    pub(crate) fn throw_acchi(&mut self, hand: Hand, opponent: Hand, rules: &Rules) {
        let Mode::GameAcchi(game) = &mut self.mode else {
            return;
        };
        if game.throw(hand, opponent).is_none() {
            return;
        }
        self.cue(Cue::Janken);
        let guard = self.mode_guard();
        self.schedule(rules.janken_reveal_ms, guard, Deferred::RevealJanken);
    }

    pub(crate) fn point_acchi(&mut self, dir: Direction, opponent: Direction, rules: &Rules) {
        let Mode::GameAcchi(game) = &mut self.mode else {
            return;
        };
        if !game.point(dir, opponent) {
            return;
        }
        self.cue(Cue::Hoi);
        let guard = self.mode_guard();
        self.schedule(rules.hoi_reveal_ms, guard, Deferred::RevealHoi);
    }

    fn reveal_janken(&mut self, rules: &Rules) {
        let Mode::GameAcchi(game) = &mut self.mode else {
            return;
        };
        let Some(verdict) = game.reveal_janken() else {
            return;
        };
        if verdict == Verdict::Draw {
            self.cue(Cue::Alert);
            self.say("A tie! Again...");
            self.set_emotion(Emotion::Surprise, rules);
        } else {
            self.cue(Cue::Select);
            self.say("Look that way... hoi!");
        }
    }

    fn reveal_hoi(&mut self, rules: &Rules) {
        let Mode::GameAcchi(game) = &mut self.mode else {
            return;
        };
        let Some(outcome) = game.reveal_hoi() else {
            return;
        };
        match outcome {
            HoiOutcome::PlayerWins => {
                let (happiness, training) = DUEL_WIN_REWARD;
                self.stats.reward(happiness, training);
                self.set_emotion(Emotion::Heart, rules);
                self.cue(Cue::Win);
                self.say("You win!");
            }
            HoiOutcome::OpponentWins => {
                self.set_emotion(Emotion::Surprise, rules);
                self.cue(Cue::Miss);
                self.say("I win!");
            }
            HoiOutcome::Again => {
                self.cue(Cue::Back);
                self.set_emotion(Emotion::Sweat, rules);
                self.say("Rock, paper, scissors...");
            }
        }
    }

    fn breed(&mut self) {
        let partner = match self.selected_menu_index {
            0 => None,
            i => match self.legacy.get(i - 1) {
                Some(p) => Some(p.clone()),
                None => {
                    log::warn!(
                        "breeding partner {i} rejected: legacy holds {}",
                        self.legacy.len()
                    );
                    return;
                }
            },
        };
        self.start_new_generation(partner);
    }

    fn hard_reset(&mut self) {
        log::info!(
            "hard reset after neglect in generation {}",
            self.generation
        );
        *self = GameState::new(Utc::now());
        self.rt.dirty = true;
    }
}
