use crate::model::ModeKind;

/// Effects that land some time after the input that caused them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Deferred {
    ClearEmotion { stamp: u64 },
    StopEating,
    RevealJanken,
    RevealHoi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Guard {
    Always,
    /// Applies only if the same mode instance (kind + epoch) is still current.
    Mode { kind: ModeKind, epoch: u64 },
}

impl Guard {
    pub(crate) fn holds(self, kind: ModeKind, epoch: u64) -> bool {
        match self {
            Guard::Always => true,
            Guard::Mode {
                kind: want,
                epoch: at,
            } => want == kind && at == epoch,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    due_ms: u64,
    seq: u64,
    guard: Guard,
    what: Deferred,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Timers {
    pending: Vec<Scheduled>,
    seq: u64,
}

impl Timers {
    pub(crate) fn schedule(&mut self, due_ms: u64, guard: Guard, what: Deferred) {
        log::trace!("schedule {what:?} at {due_ms}ms");
        self.seq += 1;
        self.pending.push(Scheduled {
            due_ms,
            seq: self.seq,
            guard,
            what,
        });
    }

    /// Removes and returns everything due at `now_ms`, earliest first.
    pub(crate) fn take_due(&mut self, now_ms: u64) -> Vec<(Guard, Deferred)> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due_ms <= now_ms {
                due.push(*s);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|s| (s.due_ms, s.seq));
        due.into_iter().map(|s| (s.guard, s.what)).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_due_returns_in_due_order_and_keeps_future() {
        let mut t = Timers::default();
        t.schedule(900, Guard::Always, Deferred::StopEating);
        t.schedule(500, Guard::Always, Deferred::RevealJanken);
        t.schedule(2_000, Guard::Always, Deferred::ClearEmotion { stamp: 1 });

        let due = t.take_due(1_000);
        assert_eq!(
            due.iter().map(|(_, d)| *d).collect::<Vec<_>>(),
            vec![Deferred::RevealJanken, Deferred::StopEating]
        );
        assert_eq!(t.len(), 1);
        assert!(t.take_due(1_999).is_empty());
        assert_eq!(t.take_due(2_000).len(), 1);
    }

    #[test]
    fn mode_guard_checks_kind_and_epoch() {
        let g = Guard::Mode {
            kind: ModeKind::GameAcchi,
            epoch: 7,
        };
        assert!(g.holds(ModeKind::GameAcchi, 7));
        assert!(!g.holds(ModeKind::GameAcchi, 8));
        assert!(!g.holds(ModeKind::Room, 7));
        assert!(Guard::Always.holds(ModeKind::Dead, 0));
    }
}
