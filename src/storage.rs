use crate::config::atomic_rename;
use crate::model::{GameState, SaveFile, SAVE_VERSION};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{fs, io, path::Path};

/// Loads the snapshot at `path`, or a fresh pet when there is none.
///
/// A corrupt snapshot is logged and replaced by a fresh pet; it is never fatal.
/// The second value is true when a snapshot was actually restored.
pub(crate) fn load_or_init_save(path: &Path, now: DateTime<Utc>) -> Result<(GameState, bool)> {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("no save at {}, starting a new egg", path.display());
            return Ok((GameState::new(now), false));
        }
        Err(e) => {
            log::warn!("could not read {}: {e}; starting over", path.display());
            return Ok((GameState::new(now), false));
        }
    };
    match serde_json::from_str::<SaveFile>(&raw) {
        Ok(save) => {
            if save.version != SAVE_VERSION {
                log::warn!(
                    "save version {} differs from {SAVE_VERSION}, loading anyway",
                    save.version
                );
            }
            Ok((save.state, true))
        }
        Err(e) => {
            log::warn!("discarding unreadable save {}: {e}", path.display());
            Ok((GameState::new(now), false))
        }
    }
}

pub(crate) fn save_atomic(path: &Path, state: &GameState) -> Result<()> {
    let save = SaveFile {
        version: SAVE_VERSION,
        state: state.clone(),
    };
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(&save)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn discard(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LegacyPet, Mode, ModeKind, Point, ShellDesign};
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pocketpet-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).expect("scratch dir");
        dir.join("save.json")
    }

    #[test]
    fn missing_save_is_a_first_run() {
        let path = scratch("missing");
        discard(&path).expect("discard");
        let (st, restored) = load_or_init_save(&path, Utc::now()).expect("load");
        assert!(!restored);
        assert_eq!(st.generation, 1);
    }

    #[test]
    fn corrupt_save_falls_back_to_defaults() {
        let path = scratch("corrupt");
        fs::write(&path, b"{ not json").expect("write");
        let (st, restored) = load_or_init_save(&path, Utc::now()).expect("load");
        assert!(!restored);
        assert_eq!(st.character_id, 0);
    }

    #[test]
    fn snapshot_survives_a_reload() {
        let path = scratch("roundtrip");
        let mut st = GameState::new(Utc::now());
        st.character_id = 12;
        st.generation = 3;
        st.shell_design = ShellDesign::Neon;
        st.stats.add_poop(Point::new(44, 70));
        st.legacy.push(LegacyPet {
            id: 22,
            name: "Hawk".into(),
            generation: 2,
            final_training: 31,
        });
        st.set_mode(Mode::LifeEnd);

        save_atomic(&path, &st).expect("save");
        assert!(!path.with_extension("json.tmp").exists());
        let (back, restored) = load_or_init_save(&path, Utc::now()).expect("load");
        assert!(restored);
        assert_eq!(back.character_id, 12);
        assert_eq!(back.generation, 3);
        assert_eq!(back.shell_design, ShellDesign::Neon);
        assert_eq!(back.stats, st.stats);
        assert_eq!(back.legacy, st.legacy);
        assert_eq!(back.mode.kind(), ModeKind::LifeEnd);
        assert_eq!(back.last_timestamp, st.last_timestamp);

        discard(&path).expect("discard");
        assert!(!path.exists());
    }
}
