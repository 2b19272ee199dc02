use std::io::{self, Write};

/// Named sound effects. The simulation only emits them; playback is up to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cue {
    Select,
    Move,
    Back,
    Start,
    Eat,
    Clean,
    Heal,
    Poop,
    EvolutionReady,
    Evolution,
    Dead,
    Catch,
    Miss,
    TimerLow,
    Win,
    Janken,
    Hoi,
    Alert,
    Call,
    Footstep,
}

impl Cue {
    /// Cues loud enough to ring the terminal bell.
    pub(crate) fn rings(self) -> bool {
        matches!(
            self,
            Cue::Call | Cue::Alert | Cue::EvolutionReady | Cue::Dead | Cue::Win | Cue::Evolution
        )
    }
}

pub(crate) trait CueSink {
    fn play(&mut self, cue: Cue);
}

pub(crate) struct TerminalBell {
    enabled: bool,
    out: io::Stdout,
}

impl TerminalBell {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            out: io::stdout(),
        }
    }
}

impl CueSink for TerminalBell {
    fn play(&mut self, cue: Cue) {
        log::trace!("cue {cue:?}");
        if self.enabled && cue.rings() {
            // fire-and-forget: a failed bell is not worth surfacing
            let _ = self.out.write_all(b"\x07");
            let _ = self.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl CueSink for Vec<Cue> {
        fn play(&mut self, cue: Cue) {
            self.push(cue);
        }
    }

    #[test]
    fn quiet_cues_do_not_ring() {
        assert!(!Cue::Footstep.rings());
        assert!(!Cue::Move.rings());
        assert!(Cue::Call.rings());
    }

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<Cue> = Vec::new();
        sink.play(Cue::Janken);
        sink.play(Cue::Hoi);
        assert_eq!(sink, vec![Cue::Janken, Cue::Hoi]);
    }
}
