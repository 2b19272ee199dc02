use crate::model::{Direction, Emotion, Point};
use rand::Rng;

pub(crate) const ROUND_TICKS: u32 = 40;
pub(crate) const LANES: [i32; 5] = [10, 30, 50, 70, 90];
pub(crate) const CATCH_LINE: i32 = 85;
pub(crate) const FIELD_BOTTOM: i32 = 100;
pub(crate) const START: Point = Point::new(50, CATCH_LINE);

const BAD_SHARE: f64 = 0.35;
const FRUIT_POINTS: u32 = 10;
const BAD_PENALTY: u32 = 15;
const REACH_X: i32 = 5;
const REACH_Y: i32 = 10;
const PLAYER_STEP: i32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ItemKind {
    Fruit,
    Bad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FallingItem {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) kind: ItemKind,
    pub(crate) fall_speed: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CatchEvent {
    TimerLow,
    Caught(ItemKind),
    Finished { score: u32 },
}

#[derive(Clone, Debug)]
pub(crate) struct CatchGame {
    pub(crate) items: Vec<FallingItem>,
    pub(crate) score: u32,
    pub(crate) timer: u32,
    pub(crate) finished: bool,
}

impl CatchGame {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            score: 0,
            timer: ROUND_TICKS,
            finished: false,
        }
    }

    fn elapsed(&self) -> f32 {
        (ROUND_TICKS - self.timer) as f32
    }

    pub(crate) fn speed_multiplier(&self) -> f32 {
        1.0 + self.elapsed() / ROUND_TICKS as f32
    }

    pub(crate) fn spawn_chance(&self) -> f64 {
        0.2 + self.elapsed() as f64 / (ROUND_TICKS as f64 * 2.0)
    }

    /// Remaining time as a 0..=1 fraction for the countdown bar.
    pub(crate) fn timer_fraction(&self) -> f32 {
        self.timer as f32 / ROUND_TICKS as f32
    }

    /// One 250ms step of the round. Does nothing once the round is over.
    pub(crate) fn tick<R: Rng + ?Sized>(&mut self, player_x: i32, rng: &mut R) -> Vec<CatchEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }
        if self.timer > 0 && self.timer <= 5 {
            events.push(CatchEvent::TimerLow);
        }

        self.advance();
        if rng.gen::<f64>() < self.spawn_chance() {
            let lane = LANES[rng.gen_range(0..LANES.len())];
            let kind = if rng.gen::<f64>() < BAD_SHARE {
                ItemKind::Bad
            } else {
                ItemKind::Fruit
            };
            let fall_speed = rng.gen_range(3..6);
            self.items.push(FallingItem {
                x: lane,
                y: 0,
                kind,
                fall_speed,
            });
        }
        for kind in self.collect_catches(player_x) {
            self.score_catch(kind);
            events.push(CatchEvent::Caught(kind));
        }

        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.finished = true;
            events.push(CatchEvent::Finished { score: self.score });
        }
        events
    }

    /// Moves every item down and drops the ones past the bottom edge.
    pub(crate) fn advance(&mut self) {
        let mult = self.speed_multiplier();
        for item in &mut self.items {
            item.y = (item.y as f32 + item.fall_speed as f32 * mult).floor() as i32;
        }
        self.items.retain(|i| i.y < FIELD_BOTTOM);
    }

    pub(crate) fn collect_catches(&mut self, player_x: i32) -> Vec<ItemKind> {
        let mut caught = Vec::new();
        self.items.retain(|i| {
            let hit = (i.x - player_x).abs() < REACH_X && (i.y - CATCH_LINE).abs() < REACH_Y;
            if hit {
                caught.push(i.kind);
            }
            !hit
        });
        caught
    }

    pub(crate) fn score_catch(&mut self, kind: ItemKind) {
        self.score = match kind {
            ItemKind::Fruit => self.score + FRUIT_POINTS,
            ItemKind::Bad => self.score.saturating_sub(BAD_PENALTY),
        };
    }
}

/// Happiness and training earned for a finished round.
pub(crate) fn round_reward(score: u32) -> (f32, u32) {
    ((score / 4) as f32, score / 8)
}

pub(crate) fn round_emotion(score: u32) -> Option<Emotion> {
    if score >= 100 {
        Some(Emotion::Heart)
    } else if score > 50 {
        Some(Emotion::Sparkle)
    } else {
        None
    }
}

/// Right moves one lane right; every other direction moves one lane left.
pub(crate) fn move_player(x: i32, dir: Direction) -> i32 {
    let step = match dir {
        Direction::Right => PLAYER_STEP,
        Direction::Left | Direction::Up | Direction::Down => -PLAYER_STEP,
    };
    (x + step).clamp(LANES[0], LANES[LANES.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn fruit_then_bad_item_clamps_score_at_zero() {
        let mut game = CatchGame::new();
        assert_eq!(game.timer, 40);
        game.score_catch(ItemKind::Fruit);
        assert_eq!(game.score, 10);
        game.score_catch(ItemKind::Bad);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn items_fall_faster_as_the_round_goes_on() {
        let mut game = CatchGame::new();
        game.items.push(FallingItem {
            x: 10,
            y: 0,
            kind: ItemKind::Fruit,
            fall_speed: 4,
        });
        game.advance();
        assert_eq!(game.items[0].y, 4);

        game.timer = 20;
        game.advance();
        assert_eq!(game.items[0].y, 10);
    }

    #[test]
    fn items_past_the_bottom_are_dropped() {
        let mut game = CatchGame::new();
        game.items.push(FallingItem {
            x: 10,
            y: 97,
            kind: ItemKind::Bad,
            fall_speed: 3,
        });
        game.advance();
        assert!(game.items.is_empty());
    }

    #[test]
    fn catch_needs_to_be_close_on_both_axes() {
        let mut game = CatchGame::new();
        game.items = vec![
            FallingItem { x: 50, y: 80, kind: ItemKind::Fruit, fall_speed: 3 },
            FallingItem { x: 54, y: 94, kind: ItemKind::Bad, fall_speed: 3 },
            FallingItem { x: 55, y: 85, kind: ItemKind::Fruit, fall_speed: 3 },
            FallingItem { x: 50, y: 75, kind: ItemKind::Fruit, fall_speed: 3 },
        ];
        let caught = game.collect_catches(50);
        assert_eq!(caught, vec![ItemKind::Fruit, ItemKind::Bad]);
        assert_eq!(game.items.len(), 2);
    }

    #[test]
    fn timer_runs_out_after_forty_ticks_and_never_goes_negative() {
        let mut game = CatchGame::new();
        let mut rng = never();
        let mut low = 0;
        let mut finished = None;
        for _ in 0..60 {
            for ev in game.tick(50, &mut rng) {
                match ev {
                    CatchEvent::TimerLow => low += 1,
                    CatchEvent::Finished { score } => finished = Some(score),
                    CatchEvent::Caught(_) => {}
                }
            }
        }
        assert_eq!(game.timer, 0);
        assert!(game.finished);
        assert_eq!(low, 5);
        assert_eq!(finished, Some(0));
    }

    #[test]
    fn forced_spawn_lands_in_first_lane_as_bad_item() {
        let mut game = CatchGame::new();
        let mut rng = StepRng::new(0, 0);
        game.tick(90, &mut rng);
        assert_eq!(game.items.len(), 1);
        assert_eq!(game.items[0].x, LANES[0]);
        assert_eq!(game.items[0].kind, ItemKind::Bad);
        assert_eq!(game.items[0].fall_speed, 3);
    }

    #[test]
    fn spawn_chance_rises_over_the_round() {
        let mut game = CatchGame::new();
        assert!((game.spawn_chance() - 0.2).abs() < 1e-9);
        game.timer = 0;
        assert!((game.spawn_chance() - 0.7).abs() < 1e-9);
        assert!((game.speed_multiplier() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn rewards_and_emotions_by_score() {
        assert_eq!(round_reward(100), (25.0, 12));
        assert_eq!(round_emotion(100), Some(Emotion::Heart));
        assert_eq!(round_emotion(60), Some(Emotion::Sparkle));
        assert_eq!(round_emotion(50), None);
    }

    #[test]
    fn player_stays_inside_lanes() {
        assert_eq!(move_player(90, Direction::Right), 90);
        assert_eq!(move_player(10, Direction::Left), 10);
        assert_eq!(move_player(50, Direction::Left), 30);
    }

    #[test]
    fn up_and_down_step_left_like_left() {
        assert_eq!(move_player(50, Direction::Up), 30);
        assert_eq!(move_player(50, Direction::Down), 30);
        assert_eq!(move_player(10, Direction::Down), 10);
    }
}
