use crate::model::Direction;
use crate::sim::PlayerInput;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Play(PlayerInput),
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

/// Keys map to the same five buttons in every mode; what they do is up to the sim.
pub(crate) fn map_event(ev: &InputEvent) -> Option<Command> {
    if matches!(ev.key, KeyCode::Char('c')) && ev.mods.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }
    let input = match ev.key {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => PlayerInput::Dir(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => {
            PlayerInput::Dir(Direction::Down)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => {
            PlayerInput::Dir(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => {
            PlayerInput::Dir(Direction::Right)
        }
        KeyCode::Enter | KeyCode::Char(' ') => PlayerInput::Action,
        KeyCode::Esc | KeyCode::Backspace => PlayerInput::Back,
        KeyCode::Char('t') | KeyCode::Char('T') => PlayerInput::CycleShell,
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Play(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent {
            key: code,
            mods: KeyModifiers::NONE,
        }
    }

    #[test]
    fn arrows_and_wasd_agree() {
        assert_eq!(map_event(&key(KeyCode::Left)), map_event(&key(KeyCode::Char('a'))));
        assert_eq!(
            map_event(&key(KeyCode::Up)),
            Some(Command::Play(PlayerInput::Dir(Direction::Up)))
        );
    }

    #[test]
    fn action_back_and_quit() {
        assert_eq!(
            map_event(&key(KeyCode::Char(' '))),
            Some(Command::Play(PlayerInput::Action))
        );
        assert_eq!(
            map_event(&key(KeyCode::Esc)),
            Some(Command::Play(PlayerInput::Back))
        );
        assert_eq!(map_event(&key(KeyCode::Char('q'))), Some(Command::Quit));
        let ctrl_c = InputEvent {
            key: KeyCode::Char('c'),
            mods: KeyModifiers::CONTROL,
        };
        assert_eq!(map_event(&ctrl_c), Some(Command::Quit));
        assert_eq!(map_event(&key(KeyCode::F(5))), None);
    }
}
