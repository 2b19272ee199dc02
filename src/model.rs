use crate::catch::CatchGame;
use crate::duel::{AcchiGame, JankenGame};
use crate::schedule::{Deferred, Guard, Timers};
use crate::sound::Cue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const SAVE_VERSION: u32 = 1;
pub(crate) const GAME_VERSION: u32 = 1;

pub(crate) const LEGACY_CAP: usize = 10;
pub(crate) const MAX_POOP: usize = 5;
pub(crate) const HOME: Point = Point { x: 40, y: 60 };

pub(crate) type CharacterId = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Point {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Point {
    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// One unit toward `target` on each axis.
    pub(crate) fn step_toward(self, target: Point) -> Point {
        Point {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Right and down move a cursor forward, left and up move it back.
    pub(crate) fn cursor_delta(self) -> isize {
        match self {
            Direction::Right | Direction::Down => 1,
            Direction::Left | Direction::Up => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Emotion {
    Heart,
    Sweat,
    Sparkle,
    Surprise,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ShellDesign {
    #[default]
    Classic,
    Arctic,
    Atomic,
    Neon,
    Carbon,
    Sakura,
}

impl ShellDesign {
    pub(crate) const ALL: [ShellDesign; 6] = [
        ShellDesign::Classic,
        ShellDesign::Arctic,
        ShellDesign::Atomic,
        ShellDesign::Neon,
        ShellDesign::Carbon,
        ShellDesign::Sakura,
    ];

    pub(crate) fn next(self) -> Self {
        let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            ShellDesign::Classic => "CLASSIC WHITE",
            ShellDesign::Arctic => "ARCTIC BLUE",
            ShellDesign::Atomic => "ATOMIC PURPLE",
            ShellDesign::Neon => "NEON YELLOW",
            ShellDesign::Carbon => "CARBON BLACK",
            ShellDesign::Sakura => "SAKURA PINK",
        }
    }
}

/// Care meters of the current pet.
///
/// `hunger`, `happiness` and `hygiene` live in `[0, 100]`; every mutation goes
/// through a clamping helper. Poop count is the length of `poop_positions`, so
/// the two can never disagree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct PetStats {
    pub(crate) hunger: f32,
    pub(crate) happiness: f32,
    pub(crate) hygiene: f32,
    pub(crate) energy: f32,
    pub(crate) age: f32,
    pub(crate) poop_positions: Vec<Point>,
    pub(crate) is_sick: bool,
    pub(crate) training: u32,
}

impl Default for PetStats {
    fn default() -> Self {
        Self {
            hunger: 50.0,
            happiness: 50.0,
            hygiene: 100.0,
            energy: 100.0,
            age: 0.0,
            poop_positions: Vec::new(),
            is_sick: false,
            training: 0,
        }
    }
}

impl PetStats {
    pub(crate) fn poop_count(&self) -> usize {
        self.poop_positions.len()
    }

    /// Returns false when the room is already full.
    pub(crate) fn add_poop(&mut self, at: Point) -> bool {
        if self.poop_positions.len() >= MAX_POOP {
            return false;
        }
        self.poop_positions.push(at);
        true
    }

    pub(crate) fn clear_poop(&mut self) {
        self.poop_positions.clear();
    }

    pub(crate) fn add_hunger(&mut self, delta: f32) {
        self.hunger = (self.hunger + delta).clamp(0.0, 100.0);
    }

    pub(crate) fn add_happiness(&mut self, delta: f32) {
        self.happiness = (self.happiness + delta).clamp(0.0, 100.0);
    }

    pub(crate) fn add_hygiene(&mut self, delta: f32) {
        self.hygiene = (self.hygiene + delta).clamp(0.0, 100.0);
    }

    pub(crate) fn reward(&mut self, happiness: f32, training: u32) {
        self.add_happiness(happiness);
        self.training = self.training.saturating_add(training);
    }

    pub(crate) fn is_calling(&self, below: f32) -> bool {
        self.hunger < below || self.happiness < below || self.is_sick
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LegacyPet {
    pub(crate) id: CharacterId,
    pub(crate) name: String,
    pub(crate) generation: u32,
    pub(crate) final_training: u32,
}

/// Flat tag for every mode; this is what a snapshot stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ModeKind {
    Room,
    Talk,
    Menu,
    Status,
    EvoReady,
    EvoChoice,
    Evo,
    GameSelect,
    GameCatch,
    GameAcchi,
    GameJanken,
    Dead,
    LifeEnd,
    Breeding,
}

impl ModeKind {
    /// Modes where stats decay and the life-cycle checks run. Every game
    /// screen, the picker included, freezes the pet.
    pub(crate) fn is_living(self) -> bool {
        matches!(
            self,
            ModeKind::Room | ModeKind::Talk | ModeKind::Menu | ModeKind::Status
        )
    }

    pub(crate) fn is_minigame(self) -> bool {
        matches!(
            self,
            ModeKind::GameCatch | ModeKind::GameAcchi | ModeKind::GameJanken
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "ModeKind", into = "ModeKind")]
pub(crate) enum Mode {
    Room,
    Talk,
    Menu,
    Status,
    EvoReady,
    EvoChoice,
    Evo,
    GameSelect,
    GameCatch(CatchGame),
    GameAcchi(AcchiGame),
    GameJanken(JankenGame),
    Dead,
    LifeEnd,
    Breeding,
}

impl Mode {
    pub(crate) fn kind(&self) -> ModeKind {
        match self {
            Mode::Room => ModeKind::Room,
            Mode::Talk => ModeKind::Talk,
            Mode::Menu => ModeKind::Menu,
            Mode::Status => ModeKind::Status,
            Mode::EvoReady => ModeKind::EvoReady,
            Mode::EvoChoice => ModeKind::EvoChoice,
            Mode::Evo => ModeKind::Evo,
            Mode::GameSelect => ModeKind::GameSelect,
            Mode::GameCatch(_) => ModeKind::GameCatch,
            Mode::GameAcchi(_) => ModeKind::GameAcchi,
            Mode::GameJanken(_) => ModeKind::GameJanken,
            Mode::Dead => ModeKind::Dead,
            Mode::LifeEnd => ModeKind::LifeEnd,
            Mode::Breeding => ModeKind::Breeding,
        }
    }
}

impl From<Mode> for ModeKind {
    fn from(mode: Mode) -> Self {
        mode.kind()
    }
}

impl From<ModeKind> for Mode {
    // Only life-cycle holds survive a reload; everything transient resumes in the room.
    fn from(kind: ModeKind) -> Self {
        match kind {
            ModeKind::EvoReady => Mode::EvoReady,
            ModeKind::EvoChoice => Mode::EvoChoice,
            ModeKind::Dead => Mode::Dead,
            ModeKind::LifeEnd => Mode::LifeEnd,
            ModeKind::Breeding => Mode::Breeding,
            _ => Mode::Room,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Rules {
    pub(crate) tick_step_ms: u64,
    pub(crate) secs_per_year: f32,
    pub(crate) hunger_decay: f32,
    pub(crate) happiness_decay: f32,
    pub(crate) hygiene_decay: f32,
    pub(crate) poop_chance: f64,
    pub(crate) sick_chance: f64,
    pub(crate) sick_below_hygiene: f32,
    pub(crate) call_below: f32,
    pub(crate) call_cooldown_ms: u64,
    pub(crate) heartbeat_ms: u64,
    pub(crate) life_span: f32,
    pub(crate) frail_age: f32,
    pub(crate) frail_risk_scale: f32,
    pub(crate) evolve_at: [f32; 4],
    pub(crate) wander_chance: f64,
    pub(crate) footstep_chance: f64,
    pub(crate) emotion_ms: u64,
    pub(crate) eat_ms: u64,
    pub(crate) janken_reveal_ms: u64,
    pub(crate) hoi_reveal_ms: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tick_step_ms: 250,
            secs_per_year: 30.0,
            hunger_decay: 0.2,
            happiness_decay: 0.15,
            hygiene_decay: 1.5,
            poop_chance: 0.002,
            sick_chance: 0.01,
            sick_below_hygiene: 20.0,
            call_below: 20.0,
            call_cooldown_ms: 15_000,
            heartbeat_ms: 1_000,
            life_span: 100.0,
            frail_age: 60.0,
            frail_risk_scale: 0.01,
            evolve_at: [1.0, 20.0, 40.0, 60.0],
            wander_chance: 0.05,
            footstep_chance: 0.2,
            emotion_ms: 2_000,
            eat_ms: 2_000,
            janken_reveal_ms: 800,
            hoi_reveal_ms: 1_000,
        }
    }
}

impl Rules {
    pub(crate) fn tick_secs(&self) -> f32 {
        self.tick_step_ms as f32 / 1000.0
    }
}

/// Session-only bookkeeping that never reaches a snapshot.
#[derive(Clone, Debug, Default)]
pub(crate) struct Runtime {
    pub(crate) clock_ms: u64,
    pub(crate) epoch: u64,
    pub(crate) emotion_stamp: u64,
    pub(crate) frame: u8,
    pub(crate) is_eating: bool,
    pub(crate) message: String,
    pub(crate) last_call_ms: Option<u64>,
    pub(crate) last_heartbeat_ms: Option<u64>,
    pub(crate) timers: Timers,
    pub(crate) cues: Vec<Cue>,
    pub(crate) dirty: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct GameState {
    pub(crate) version: u32,
    pub(crate) character_id: CharacterId,
    pub(crate) pending_evo_id: Option<CharacterId>,
    pub(crate) stats: PetStats,
    pub(crate) mode: Mode,
    pub(crate) selected_menu_index: usize,
    pub(crate) pos: Point,
    pub(crate) target_pos: Point,
    pub(crate) emotion: Option<Emotion>,
    pub(crate) generation: u32,
    pub(crate) legacy: Vec<LegacyPet>,
    #[serde(default)]
    pub(crate) shell_design: ShellDesign,
    pub(crate) last_timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) rt: Runtime,
}

impl GameState {
    pub(crate) fn new(now: DateTime<Utc>) -> Self {
        Self {
            version: GAME_VERSION,
            character_id: 0,
            pending_evo_id: None,
            stats: PetStats::default(),
            mode: Mode::Room,
            selected_menu_index: 0,
            pos: HOME,
            target_pos: HOME,
            emotion: None,
            generation: 1,
            legacy: Vec::new(),
            shell_design: ShellDesign::Classic,
            last_timestamp: now,
            rt: Runtime::default(),
        }
    }

    /// Every mode change bumps the epoch so pending reveals from the old mode go stale.
    pub(crate) fn set_mode(&mut self, mode: Mode) {
        let from = self.mode.kind();
        let to = mode.kind();
        if from != to {
            log::debug!("mode {from:?} -> {to:?}");
        }
        self.mode = mode;
        self.rt.epoch = self.rt.epoch.wrapping_add(1);
        self.rt.dirty = true;
    }

    pub(crate) fn set_emotion(&mut self, emotion: Emotion, rules: &Rules) {
        self.emotion = Some(emotion);
        self.rt.emotion_stamp = self.rt.emotion_stamp.wrapping_add(1);
        let stamp = self.rt.emotion_stamp;
        self.schedule(rules.emotion_ms, Guard::Always, Deferred::ClearEmotion { stamp });
    }

    pub(crate) fn schedule(&mut self, delay_ms: u64, guard: Guard, what: Deferred) {
        let due = self.rt.clock_ms + delay_ms;
        self.rt.timers.schedule(due, guard, what);
    }

    /// Guard that holds only while the current mode instance is still active.
    pub(crate) fn mode_guard(&self) -> Guard {
        Guard::Mode {
            kind: self.mode.kind(),
            epoch: self.rt.epoch,
        }
    }

    pub(crate) fn cue(&mut self, cue: Cue) {
        self.rt.cues.push(cue);
    }

    pub(crate) fn say(&mut self, message: &str) {
        self.rt.message = message.to_string();
    }

    pub(crate) fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.rt.cues)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SaveFile {
    pub(crate) version: u32,
    pub(crate) state: GameState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poop_count_mirrors_positions_and_caps_at_five() {
        let mut stats = PetStats::default();
        for i in 0..8 {
            stats.add_poop(Point::new(10 + i, 70));
        }
        assert_eq!(stats.poop_count(), MAX_POOP);
        assert_eq!(stats.poop_positions.len(), MAX_POOP);
        stats.clear_poop();
        assert_eq!(stats.poop_count(), 0);
    }

    #[test]
    fn stat_helpers_clamp() {
        let mut stats = PetStats::default();
        stats.add_hunger(500.0);
        stats.add_happiness(-500.0);
        stats.add_hygiene(-1.0);
        assert_eq!(stats.hunger, 100.0);
        assert_eq!(stats.happiness, 0.0);
        assert_eq!(stats.hygiene, 99.0);
    }

    #[test]
    fn step_toward_moves_one_unit_per_axis() {
        let p = Point::new(40, 60).step_toward(Point::new(45, 55));
        assert_eq!(p, Point::new(41, 59));
        let same = Point::new(3, 3).step_toward(Point::new(3, 3));
        assert_eq!(same, Point::new(3, 3));
    }

    #[test]
    fn shell_cycle_wraps() {
        let mut shell = ShellDesign::Classic;
        for _ in 0..ShellDesign::ALL.len() {
            shell = shell.next();
        }
        assert_eq!(shell, ShellDesign::Classic);
        assert_eq!(ShellDesign::Carbon.next(), ShellDesign::Sakura);
    }

    #[test]
    fn transient_modes_restore_as_room() {
        assert!(matches!(Mode::from(ModeKind::GameCatch), Mode::Room));
        assert!(matches!(Mode::from(ModeKind::Menu), Mode::Room));
        assert!(matches!(Mode::from(ModeKind::Evo), Mode::Room));
        assert!(matches!(Mode::from(ModeKind::LifeEnd), Mode::LifeEnd));
        assert!(matches!(Mode::from(ModeKind::EvoReady), Mode::EvoReady));
    }

    #[test]
    fn snapshot_drops_minigame_state() {
        let mut st = GameState::new(Utc::now());
        st.set_mode(Mode::GameCatch(CatchGame::new()));
        let json = serde_json::to_string(&st).expect("serialize");
        assert!(json.contains("\"GAME_CATCH\""));
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.mode.kind(), ModeKind::Room);
    }

    #[test]
    fn set_mode_bumps_epoch() {
        let mut st = GameState::new(Utc::now());
        let before = st.rt.epoch;
        st.set_mode(Mode::Menu);
        assert_eq!(st.rt.epoch, before + 1);
        assert!(st.rt.dirty);
    }

    #[test]
    fn missing_shell_design_defaults_to_classic() {
        let st = GameState::new(Utc::now());
        let mut value = serde_json::to_value(&st).expect("to value");
        value
            .as_object_mut()
            .expect("object")
            .remove("shell_design");
        let back: GameState = serde_json::from_value(value).expect("from value");
        assert_eq!(back.shell_design, ShellDesign::Classic);
    }
}
