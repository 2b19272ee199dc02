use crate::config::{load_settings, save_settings_atomic, Paths, Settings};
use crate::input::{collect_input_nonblocking, map_event, Command};
use crate::model::{GameState, Rules};
use crate::render::{draw_frame, Terminal};
use crate::sim::catch_up;
use crate::sound::{CueSink, TerminalBell};
use crate::storage::{discard, load_or_init_save, save_atomic};
use crate::Cli;
use anyhow::Result;
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const SAVE_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) struct App {
    settings: Settings,
    // what goes back to disk; CLI overrides are per session
    stored_settings: Settings,
    rules: Rules,
    state: GameState,
    paths: Paths,
    save_path: PathBuf,
    term: Terminal,
    rng: StdRng,
    bell: TerminalBell,
    should_quit: bool,
    saved_at: Instant,
}

impl App {
    fn init(cli: Cli, paths: Paths) -> Result<Self> {
        let stored_settings = load_settings(&paths.settings_path);
        let mut settings = stored_settings.clone();
        if cli.mono {
            settings.enable_color = false;
        }
        if cli.no_bell {
            settings.enable_bell = false;
        }
        let rules = Rules::default();
        let save_path = cli.save.unwrap_or_else(|| paths.save_path.clone());

        if cli.reset {
            log::info!("discarding save {}", save_path.display());
            discard(&save_path)?;
        }

        let now = Utc::now();
        let (mut state, restored) = load_or_init_save(&save_path, now)?;
        if restored {
            catch_up(&mut state, now, &rules);
        }

        let rng = match cli.seed.or(settings.seed) {
            Some(seed) => {
                log::info!("seeding rng with {seed}");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        let bell = TerminalBell::new(settings.enable_bell);
        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            stored_settings,
            rules,
            state,
            paths,
            save_path,
            term,
            rng,
            bell,
            should_quit: false,
            saved_at: Instant::now(),
        })
    }

    fn run(&mut self) -> Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let sim_step = Duration::from_millis(self.rules.tick_step_ms);
        let dt_secs = self.rules.tick_secs();

        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;

        while !self.should_quit {
            self.term.resize_if_needed()?;

            for ev in collect_input_nonblocking(frame_dt)? {
                match map_event(&ev) {
                    Some(Command::Quit) => {
                        self.should_quit = true;
                        break;
                    }
                    Some(Command::Play(input)) => {
                        self.state.apply(input, &self.rules, &mut self.rng);
                    }
                    None => {}
                }
            }

            // fixed-step sim
            let now = Instant::now();
            sim_accum = sim_accum.saturating_add(now.saturating_duration_since(last_frame));
            last_frame = now;
            while sim_accum >= sim_step {
                self.state.tick(dt_secs, &self.rules, &mut self.rng);
                sim_accum = sim_accum.saturating_sub(sim_step);
            }

            for cue in self.state.drain_cues() {
                self.bell.play(cue);
            }

            draw_frame(&mut self.term.cur, &self.state, &self.settings, &self.rules);
            self.term.present(true)?;

            if self.state.rt.dirty && self.saved_at.elapsed() >= SAVE_INTERVAL {
                self.save_now()?;
            }

            spin_sleep(frame_dt, Instant::now());
        }

        self.save_now()?;
        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.stored_settings)?;
        log::info!("bye");
        Ok(())
    }

    fn save_now(&mut self) -> Result<()> {
        self.state.last_timestamp = Utc::now();
        save_atomic(&self.save_path, &self.state)?;
        self.state.rt.dirty = false;
        self.saved_at = Instant::now();
        Ok(())
    }
}

pub(crate) fn run(cli: Cli, paths: Paths) -> Result<()> {
    let mut app = App::init(cli, paths)?;
    let result = app.run();
    if result.is_err() {
        // leave the terminal usable even when the loop bails
        let _ = app.term.end();
    }
    result
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
