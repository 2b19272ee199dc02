use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) enable_bell: bool,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub(crate) seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            enable_color: true,
            enable_bell: true,
            seed: None,
        }
    }
}

pub(crate) struct Paths {
    pub(crate) save_path: PathBuf,
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "pocketpet", "PocketPet")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(Paths {
        save_path: dir.join("save.json"),
        settings_path: dir.join("settings.json"),
        log_path: dir.join("pocketpet.log"),
    })
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings>(&s) {
            Ok(v) => return v,
            Err(e) => log::warn!("ignoring bad settings {}: {e}", path.display()),
        }
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // Rename over an existing file is not atomic on Windows; remove first there.
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)
        .with_context(|| format!("renaming {} -> {}", from.display(), to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_in_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "enable_bell": false }"#).expect("parse");
        assert!(!s.enable_bell);
        assert_eq!(s.fps_cap, 30);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("pocketpet-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("dir");
        let path = dir.join("settings.json");
        let s = Settings {
            seed: Some(7),
            enable_color: false,
            ..Settings::default()
        };
        save_settings_atomic(&path, &s).expect("save");
        assert_eq!(load_settings(&path), s);
    }
}
