use crate::model::Direction;
use rand::Rng;

/// Happiness and training for beating the pet at plain janken.
pub(crate) const JANKEN_WIN_REWARD: (f32, u32) = (15.0, 10);
/// Happiness and training for winning the pointing duel.
pub(crate) const DUEL_WIN_REWARD: (f32, u32) = (20.0, 15);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hand {
    Rock,
    Scissors,
    Paper,
}

impl Hand {
    pub(crate) const ALL: [Hand; 3] = [Hand::Rock, Hand::Scissors, Hand::Paper];

    pub(crate) fn index(self) -> usize {
        match self {
            Hand::Rock => 0,
            Hand::Scissors => 1,
            Hand::Paper => 2,
        }
    }

    /// Rock beats scissors, scissors beat paper, paper beats rock.
    pub(crate) fn beats(self, other: Hand) -> bool {
        (self.index() + 1) % 3 == other.index()
    }

    pub(crate) fn random<R: Rng + ?Sized>(rng: &mut R) -> Hand {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Janken keys: left throws rock, up scissors, right paper.
    pub(crate) fn from_direction(dir: Direction) -> Option<Hand> {
        match dir {
            Direction::Left => Some(Hand::Rock),
            Direction::Up => Some(Hand::Scissors),
            Direction::Right => Some(Hand::Paper),
            Direction::Down => None,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Hand::Rock => "rock",
            Hand::Scissors => "scissors",
            Hand::Paper => "paper",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    Win,
    Lose,
    Draw,
}

pub(crate) fn judge(player: Hand, opponent: Hand) -> Verdict {
    if player == opponent {
        Verdict::Draw
    } else if player.beats(opponent) {
        Verdict::Win
    } else {
        Verdict::Lose
    }
}

pub(crate) fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    const DIRS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    DIRS[rng.gen_range(0..DIRS.len())]
}

#[derive(Clone, Debug, Default)]
pub(crate) struct JankenGame {
    pub(crate) player: Option<Hand>,
    pub(crate) opponent: Option<Hand>,
    pub(crate) verdict: Option<Verdict>,
}

impl JankenGame {
    pub(crate) fn is_over(&self) -> bool {
        matches!(self.verdict, Some(Verdict::Win | Verdict::Lose))
    }

    /// Returns `None` once a decisive round has been played.
    pub(crate) fn throw(&mut self, player: Hand, opponent: Hand) -> Option<Verdict> {
        if self.is_over() {
            return None;
        }
        let verdict = judge(player, opponent);
        self.player = Some(player);
        self.opponent = Some(opponent);
        self.verdict = Some(verdict);
        Some(verdict)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AcchiPhase {
    Janken,
    Hoi,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HoiOutcome {
    PlayerWins,
    OpponentWins,
    Again,
}

/// Janken followed by "look that way": the janken winner points, the loser
/// must not look the same way.
#[derive(Clone, Debug)]
pub(crate) struct AcchiGame {
    pub(crate) phase: AcchiPhase,
    pub(crate) janken: Verdict,
    pub(crate) player_hand: Option<Hand>,
    pub(crate) opponent_hand: Option<Hand>,
    pub(crate) player_dir: Option<Direction>,
    pub(crate) opponent_dir: Option<Direction>,
    pub(crate) awaiting_reveal: bool,
    pub(crate) outcome: Option<HoiOutcome>,
}

impl Default for AcchiGame {
    fn default() -> Self {
        Self {
            phase: AcchiPhase::Janken,
            janken: Verdict::Draw,
            player_hand: None,
            opponent_hand: None,
            player_dir: None,
            opponent_dir: None,
            awaiting_reveal: false,
            outcome: None,
        }
    }
}

impl AcchiGame {
    /// Records a janken throw; the phase change waits for `reveal_janken`.
    pub(crate) fn throw(&mut self, player: Hand, opponent: Hand) -> Option<Verdict> {
        if self.phase != AcchiPhase::Janken || self.awaiting_reveal {
            return None;
        }
        let verdict = judge(player, opponent);
        self.player_hand = Some(player);
        self.opponent_hand = Some(opponent);
        self.janken = verdict;
        self.awaiting_reveal = true;
        Some(verdict)
    }

    pub(crate) fn reveal_janken(&mut self) -> Option<Verdict> {
        if self.phase != AcchiPhase::Janken || !self.awaiting_reveal {
            return None;
        }
        self.awaiting_reveal = false;
        if self.janken != Verdict::Draw {
            self.phase = AcchiPhase::Hoi;
            self.player_dir = None;
            self.opponent_dir = None;
        }
        Some(self.janken)
    }

    pub(crate) fn point(&mut self, player: Direction, opponent: Direction) -> bool {
        if self.phase != AcchiPhase::Hoi || self.awaiting_reveal {
            return false;
        }
        self.player_dir = Some(player);
        self.opponent_dir = Some(opponent);
        self.awaiting_reveal = true;
        true
    }

    pub(crate) fn reveal_hoi(&mut self) -> Option<HoiOutcome> {
        if self.phase != AcchiPhase::Hoi || !self.awaiting_reveal {
            return None;
        }
        self.awaiting_reveal = false;
        let matched = self.player_dir.is_some() && self.player_dir == self.opponent_dir;
        let outcome = match (matched, self.janken) {
            (true, Verdict::Win) => HoiOutcome::PlayerWins,
            (true, _) => HoiOutcome::OpponentWins,
            (false, _) => HoiOutcome::Again,
        };
        if matched {
            self.phase = AcchiPhase::Result;
            self.outcome = Some(outcome);
        } else {
            self.phase = AcchiPhase::Janken;
            self.player_hand = None;
            self.opponent_hand = None;
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn janken_is_cyclic() {
        assert_eq!(judge(Hand::Rock, Hand::Scissors), Verdict::Win);
        assert_eq!(judge(Hand::Scissors, Hand::Paper), Verdict::Win);
        assert_eq!(judge(Hand::Paper, Hand::Rock), Verdict::Win);
        assert_eq!(judge(Hand::Scissors, Hand::Rock), Verdict::Lose);
        assert_eq!(judge(Hand::Paper, Hand::Scissors), Verdict::Lose);
        assert_eq!(judge(Hand::Rock, Hand::Paper), Verdict::Lose);
        for h in Hand::ALL {
            assert_eq!(judge(h, h), Verdict::Draw);
        }
    }

    #[test]
    fn every_unequal_pair_has_exactly_one_winner() {
        for a in Hand::ALL {
            for b in Hand::ALL {
                if a != b {
                    assert_ne!(a.beats(b), b.beats(a));
                }
            }
        }
    }

    #[test]
    fn standalone_draw_replays_and_decisive_ends() {
        let mut game = JankenGame::default();
        assert_eq!(game.throw(Hand::Rock, Hand::Rock), Some(Verdict::Draw));
        assert!(!game.is_over());
        assert_eq!(game.throw(Hand::Rock, Hand::Paper), Some(Verdict::Lose));
        assert!(game.is_over());
        assert_eq!(game.throw(Hand::Paper, Hand::Rock), None);
    }

    #[test]
    fn duel_goes_janken_hoi_result_on_match() {
        let mut game = AcchiGame::default();
        assert_eq!(game.throw(Hand::Rock, Hand::Scissors), Some(Verdict::Win));
        assert_eq!(game.phase, AcchiPhase::Janken);
        assert_eq!(game.throw(Hand::Paper, Hand::Rock), None, "locked until reveal");
        assert_eq!(game.reveal_janken(), Some(Verdict::Win));
        assert_eq!(game.phase, AcchiPhase::Hoi);

        assert!(game.point(Direction::Left, Direction::Left));
        assert_eq!(game.reveal_hoi(), Some(HoiOutcome::PlayerWins));
        assert_eq!(game.phase, AcchiPhase::Result);
        assert_eq!(game.outcome, Some(HoiOutcome::PlayerWins));
    }

    #[test]
    fn duel_lost_janken_and_match_means_opponent_wins() {
        let mut game = AcchiGame::default();
        game.throw(Hand::Scissors, Hand::Rock);
        game.reveal_janken();
        game.point(Direction::Up, Direction::Up);
        assert_eq!(game.reveal_hoi(), Some(HoiOutcome::OpponentWins));
        assert_eq!(game.phase, AcchiPhase::Result);
    }

    #[test]
    fn duel_mismatch_restarts_at_janken() {
        let mut game = AcchiGame::default();
        game.throw(Hand::Paper, Hand::Rock);
        game.reveal_janken();
        game.point(Direction::Up, Direction::Down);
        assert_eq!(game.reveal_hoi(), Some(HoiOutcome::Again));
        assert_eq!(game.phase, AcchiPhase::Janken);
        assert!(game.outcome.is_none());
    }

    #[test]
    fn duel_draw_stays_in_janken() {
        let mut game = AcchiGame::default();
        game.throw(Hand::Rock, Hand::Rock);
        assert_eq!(game.reveal_janken(), Some(Verdict::Draw));
        assert_eq!(game.phase, AcchiPhase::Janken);
        assert!(!game.point(Direction::Up, Direction::Up));
    }

    #[test]
    fn reveal_without_pending_throw_is_ignored() {
        let mut game = AcchiGame::default();
        assert_eq!(game.reveal_janken(), None);
        assert_eq!(game.reveal_hoi(), None);
    }

    #[test]
    fn zeroed_rng_picks_first_entries() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(Hand::random(&mut rng), Hand::Rock);
        assert_eq!(random_direction(&mut rng), Direction::Up);
    }
}
