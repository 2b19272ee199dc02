use crate::catalog::{character, MenuItem, Species, GAMES};
use crate::catch::{CatchGame, ItemKind};
use crate::config::Settings;
use crate::duel::{AcchiGame, AcchiPhase, HoiOutcome, JankenGame, Verdict};
use crate::model::{Direction, Emotion, GameState, Mode, Point, Rules, ShellDesign};
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell { bg, ..Cell::default() };
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_bold != Some(c.bold) {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = Some(c.bold);
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Palette
------------------------------ */

#[derive(Clone, Copy)]
struct Palette {
    shell: Color,
    ink: Color,
    accent: Color,
    warn: Color,
    bg: Color,
}

impl Palette {
    fn new(shell: ShellDesign, color: bool) -> Self {
        if !color {
            return Self {
                shell: Color::White,
                ink: Color::White,
                accent: Color::White,
                warn: Color::White,
                bg: Color::Black,
            };
        }
        let shell = match shell {
            ShellDesign::Classic => Color::Rgb { r: 235, g: 235, b: 228 },
            ShellDesign::Arctic => Color::Rgb { r: 110, g: 170, b: 235 },
            ShellDesign::Atomic => Color::Rgb { r: 170, g: 110, b: 230 },
            ShellDesign::Neon => Color::Rgb { r: 240, g: 230, b: 70 },
            ShellDesign::Carbon => Color::Rgb { r: 90, g: 90, b: 96 },
            ShellDesign::Sakura => Color::Rgb { r: 245, g: 160, b: 190 },
        };
        Self {
            shell,
            ink: Color::Rgb { r: 200, g: 220, b: 170 },
            accent: Color::Yellow,
            warn: Color::Red,
            bg: Color::Black,
        }
    }
}

/* -----------------------------
   Primitives
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg,
                bold: false,
            },
        );
    }
}

fn draw_text_i(buf: &mut CellBuffer, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
    if y < 0 || y >= buf.h as i32 {
        return;
    }
    for (i, ch) in s.chars().enumerate() {
        let xx = x + i as i32;
        if xx < 0 || ch == ' ' {
            continue;
        }
        if xx >= buf.w as i32 {
            break;
        }
        buf.set(
            xx as u16,
            y as u16,
            Cell {
                ch,
                fg,
                bg,
                bold: false,
            },
        );
    }
}

pub(crate) fn bar(value01: f32, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn draw_frame_box(buf: &mut CellBuffer, x0: u16, y0: u16, w: u16, h: u16, fg: Color, bg: Color) {
    if w < 2 || h < 2 {
        return;
    }
    let cell = |ch| Cell {
        ch,
        fg,
        bg,
        bold: true,
    };
    for x in x0..x0 + w {
        buf.set(x, y0, cell('─'));
        buf.set(x, y0 + h - 1, cell('─'));
    }
    for y in y0..y0 + h {
        buf.set(x0, y, cell('│'));
        buf.set(x0 + w - 1, y, cell('│'));
    }
    buf.set(x0, y0, cell('╭'));
    buf.set(x0 + w - 1, y0, cell('╮'));
    buf.set(x0, y0 + h - 1, cell('╰'));
    buf.set(x0 + w - 1, y0 + h - 1, cell('╯'));
}

/* -----------------------------
   Screen layout
------------------------------ */

/// The LCD area inside the shell; room coordinates 0..100 map onto it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Screen {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) w: u16,
    pub(crate) h: u16,
}

impl Screen {
    pub(crate) fn fit(cols: u16, rows: u16) -> Self {
        let w = cols.saturating_sub(6).clamp(20, 60);
        let h = rows.saturating_sub(8).clamp(10, 22);
        let x = cols.saturating_sub(w) / 2;
        let y = 3;
        Self { x, y, w, h }
    }

    pub(crate) fn to_cell(&self, p: Point) -> (i32, i32) {
        let px = p.x.clamp(0, 100);
        let py = p.y.clamp(0, 100);
        let cx = self.x as i32 + px * (self.w.saturating_sub(1)) as i32 / 100;
        let cy = self.y as i32 + py * (self.h.saturating_sub(1)) as i32 / 100;
        (cx, cy)
    }

    fn line(&self, row: u16) -> u16 {
        self.y + row.min(self.h.saturating_sub(1))
    }
}

/* -----------------------------
   Sprites
------------------------------ */

/// Three-row sprite for a character; `frame` alternates the pose.
pub(crate) fn sprite(species: Species, tier: u8, frame: u8) -> [&'static str; 3] {
    let alt = frame % 2 == 1;
    match (tier, species) {
        (0, _) => {
            if alt {
                [" .-. ", "( ' )", " `-' "]
            } else {
                [" .-. ", "(   )", " `-' "]
            }
        }
        (1, _) => {
            if alt {
                ["     ", " (oo)", " ^^^^"]
            } else {
                ["     ", "(oo) ", "^^^^ "]
            }
        }
        (_, Species::Slime) => {
            if alt {
                ["  __  ", " (^^) ", "(____)"]
            } else {
                ["  __  ", " (oo) ", "(____)"]
            }
        }
        (_, Species::Beast) => {
            if alt {
                ["/\\_/\\ ", "(o.o) ", " > ^< "]
            } else {
                ["/\\_/\\ ", "(o.o) ", " >^ < "]
            }
        }
        (_, Species::Bird) => {
            if alt {
                [" ,_,  ", "(O,O) ", "/)_)  "]
            } else {
                [" ,_,  ", "(O,O) ", " )_)\\ "]
            }
        }
        (_, Species::Robot) => {
            if alt {
                [" [==] ", " |oo| ", " /||\\ "]
            } else {
                [" [==] ", " |--| ", " /||\\ "]
            }
        }
        (_, Species::Plant) => {
            if alt {
                [" \\|/  ", " (oo) ", "  ||  "]
            } else {
                ["  |/  ", " (oo) ", "  ||  "]
            }
        }
        (_, Species::Ghost) => {
            if alt {
                [" .-.  ", "(o o) ", " vvv  "]
            } else {
                [" .-.  ", "(o o) ", "  vvv "]
            }
        }
    }
}

pub(crate) fn emotion_glyph(e: Emotion) -> char {
    match e {
        Emotion::Heart => '♥',
        Emotion::Sweat => '\'',
        Emotion::Sparkle => '*',
        Emotion::Surprise => '!',
    }
}

fn arrow(dir: Direction) -> char {
    match dir {
        Direction::Up => '↑',
        Direction::Down => '↓',
        Direction::Left => '←',
        Direction::Right => '→',
    }
}

fn draw_pet(buf: &mut CellBuffer, st: &GameState, scr: &Screen, pal: Palette) {
    let def = character(st.character_id);
    let lines = sprite(def.species, def.tier, st.rt.frame);
    let (cx, cy) = scr.to_cell(st.pos);
    let x0 = cx - 3;
    let y0 = cy - 1;
    for (i, line) in lines.iter().enumerate() {
        draw_text_i(buf, x0, y0 + i as i32, line, pal.ink, pal.bg);
    }
    if st.rt.is_eating {
        let mouth = if st.rt.frame % 2 == 0 { "nom" } else { "NOM" };
        draw_text_i(buf, x0 + 7, y0 + 1, mouth, pal.accent, pal.bg);
    }
    if let Some(e) = st.emotion {
        let glyph = emotion_glyph(e).to_string();
        draw_text_i(buf, x0 + 6, y0 - 1, &glyph, pal.accent, pal.bg);
    }
}

fn draw_room(buf: &mut CellBuffer, st: &GameState, scr: &Screen, pal: Palette) {
    for p in &st.stats.poop_positions {
        let (x, y) = scr.to_cell(*p);
        draw_text_i(buf, x, y, "@", pal.ink, pal.bg);
    }
    draw_pet(buf, st, scr, pal);
}

/* -----------------------------
   Header and footer
------------------------------ */

fn draw_header(buf: &mut CellBuffer, st: &GameState, rules: &Rules, pal: Palette) {
    let def = character(st.character_id);
    let title = format!(
        "{}  gen {}  age {:.1}  {}",
        def.name,
        st.generation,
        st.stats.age,
        st.shell_design.label()
    );
    draw_text(buf, 1, 0, &title, pal.shell, pal.bg);

    let meters = format!(
        "FOOD {} JOY {} CLEAN {}",
        bar(st.stats.hunger / 100.0, 8),
        bar(st.stats.happiness / 100.0, 8),
        bar(st.stats.hygiene / 100.0, 8)
    );
    draw_text(buf, 1, 1, &meters, pal.ink, pal.bg);

    let mut x = 2 + meters.chars().count() as u16;
    if st.mode.kind().is_living() && st.stats.is_calling(rules.call_below) {
        draw_text(buf, x, 1, "CALL", pal.warn, pal.bg);
        x += 5;
    }
    if st.stats.is_sick {
        draw_text(buf, x, 1, "SICK", pal.warn, pal.bg);
    }
}

fn help_line(mode: &Mode) -> &'static str {
    match mode {
        Mode::Room => "enter menu | t shell | q quit",
        Mode::Menu | Mode::GameSelect => "←→ choose | enter ok | esc back",
        Mode::Talk | Mode::Status | Mode::Evo => "enter/esc back",
        Mode::EvoReady | Mode::EvoChoice => "enter evolve",
        Mode::GameCatch(_) => "←→ move | esc quit game",
        Mode::GameAcchi(g) if g.phase == AcchiPhase::Hoi => "arrows point | esc quit game",
        Mode::GameAcchi(_) | Mode::GameJanken(_) => {
            "← rock | ↑ scissors | → paper | esc quit game"
        }
        Mode::Dead => "enter start over",
        Mode::LifeEnd => "enter continue",
        Mode::Breeding => "↑↓ choose partner | enter hatch",
    }
}

/* -----------------------------
   Per-mode panels
------------------------------ */

fn draw_list<S: AsRef<str>>(
    buf: &mut CellBuffer,
    scr: &Screen,
    title: &str,
    items: &[S],
    selected: usize,
    pal: Palette,
) {
    draw_text(buf, scr.x + 2, scr.line(1), title, pal.shell, pal.bg);
    for (i, item) in items.iter().enumerate() {
        let row = scr.line(3 + i as u16);
        let (marker, fg) = if i == selected {
            ("> ", pal.accent)
        } else {
            ("  ", pal.ink)
        };
        draw_text(buf, scr.x + 2, row, marker, fg, pal.bg);
        draw_text(buf, scr.x + 4, row, item.as_ref(), fg, pal.bg);
    }
}

fn draw_status(buf: &mut CellBuffer, st: &GameState, scr: &Screen, pal: Palette) {
    let def = character(st.character_id);
    let lines = [
        format!("Name      {}", def.name),
        format!("Stage     {}", def.tier),
        format!("Age       {:.1}", st.stats.age),
        format!("Hunger    {:.0}", st.stats.hunger),
        format!("Happiness {:.0}", st.stats.happiness),
        format!("Hygiene   {:.0}", st.stats.hygiene),
        format!("Training  {}", st.stats.training),
        format!("Poop      {}", st.stats.poop_count()),
        format!("Sick      {}", if st.stats.is_sick { "yes" } else { "no" }),
        format!("Gen       {}", st.generation),
    ];
    for (i, l) in lines.iter().enumerate() {
        draw_text(buf, scr.x + 2, scr.line(1 + i as u16), l, pal.ink, pal.bg);
    }
}

fn draw_catch(buf: &mut CellBuffer, st: &GameState, game: &CatchGame, scr: &Screen, pal: Palette) {
    for item in &game.items {
        let (x, y) = scr.to_cell(Point::new(item.x, item.y));
        let (glyph, fg) = match item.kind {
            ItemKind::Fruit => ("o", pal.accent),
            ItemKind::Bad => ("x", pal.warn),
        };
        draw_text_i(buf, x, y, glyph, fg, pal.bg);
    }
    let (px, py) = scr.to_cell(st.pos);
    draw_text_i(buf, px - 1, py, "\\_/", pal.ink, pal.bg);

    let timer = format!("{} {:>3}", bar(game.timer_fraction(), 10), game.score);
    draw_text(buf, scr.x + 1, scr.y, &timer, pal.shell, pal.bg);
    if game.finished {
        draw_text(buf, scr.x + 2, scr.line(scr.h / 2), &st.rt.message, pal.accent, pal.bg);
    }
}

fn verdict_text(v: Verdict) -> &'static str {
    match v {
        Verdict::Win => "win",
        Verdict::Lose => "lose",
        Verdict::Draw => "draw",
    }
}

fn draw_janken(buf: &mut CellBuffer, st: &GameState, game: &JankenGame, scr: &Screen, pal: Palette) {
    let you = game.player.map_or("?", |h| h.label());
    let them = game.opponent.map_or("?", |h| h.label());
    draw_text(buf, scr.x + 2, scr.line(1), "JANKEN", pal.shell, pal.bg);
    draw_text(buf, scr.x + 2, scr.line(3), &format!("you  {you}"), pal.ink, pal.bg);
    draw_text(buf, scr.x + 2, scr.line(4), &format!("pet  {them}"), pal.ink, pal.bg);
    if let Some(v) = game.verdict {
        draw_text(buf, scr.x + 2, scr.line(6), verdict_text(v), pal.accent, pal.bg);
    }
    draw_text(buf, scr.x + 2, scr.line(8), &st.rt.message, pal.ink, pal.bg);
}

fn draw_acchi(buf: &mut CellBuffer, st: &GameState, game: &AcchiGame, scr: &Screen, pal: Palette) {
    let phase = match game.phase {
        AcchiPhase::Janken => "JANKEN",
        AcchiPhase::Hoi => "ACCHI MUITE HOI",
        AcchiPhase::Result => "RESULT",
    };
    draw_text(buf, scr.x + 2, scr.line(1), phase, pal.shell, pal.bg);

    // hands stay hidden until the reveal fires
    let hidden = game.awaiting_reveal && game.phase == AcchiPhase::Janken;
    let you = game.player_hand.map_or("?", |h| h.label());
    let them = if hidden {
        "..."
    } else {
        game.opponent_hand.map_or("?", |h| h.label())
    };
    draw_text(buf, scr.x + 2, scr.line(3), &format!("you  {you}"), pal.ink, pal.bg);
    draw_text(buf, scr.x + 2, scr.line(4), &format!("pet  {them}"), pal.ink, pal.bg);

    if game.phase != AcchiPhase::Janken {
        let you = game.player_dir.map_or(' ', arrow);
        let them = if game.awaiting_reveal {
            ' '
        } else {
            game.opponent_dir.map_or(' ', arrow)
        };
        draw_text(buf, scr.x + 2, scr.line(6), &format!("{you}   {them}"), pal.accent, pal.bg);
    }
    if let Some(outcome) = game.outcome {
        let text = match outcome {
            HoiOutcome::PlayerWins => "you win!",
            HoiOutcome::OpponentWins => "pet wins!",
            HoiOutcome::Again => "again",
        };
        draw_text(buf, scr.x + 2, scr.line(8), text, pal.accent, pal.bg);
    } else {
        draw_text(buf, scr.x + 2, scr.line(8), &st.rt.message, pal.ink, pal.bg);
    }
}

fn draw_breeding(buf: &mut CellBuffer, st: &GameState, scr: &Screen, pal: Palette) {
    let mut items = vec!["Hatch alone".to_string()];
    items.extend(
        st.legacy
            .iter()
            .map(|p| format!("{} (gen {}, training {})", p.name, p.generation, p.final_training)),
    );
    draw_list(buf, scr, "Choose a partner", &items, st.selected_menu_index, pal);
}

fn draw_banner(buf: &mut CellBuffer, scr: &Screen, lines: &[&str], fg: Color, bg: Color) {
    let top = scr.y + scr.h / 2 - (lines.len() as u16) / 2;
    for (i, l) in lines.iter().enumerate() {
        let x = scr.x + scr.w.saturating_sub(l.chars().count() as u16) / 2;
        draw_text(buf, x, top + i as u16, l, fg, bg);
    }
}

/// Draws one full frame for the current state into `buf`.
pub(crate) fn draw_frame(buf: &mut CellBuffer, st: &GameState, settings: &Settings, rules: &Rules) {
    let pal = Palette::new(st.shell_design, settings.enable_color);
    buf.clear(pal.bg);
    let scr = Screen::fit(buf.w, buf.h);
    draw_frame_box(
        buf,
        scr.x.saturating_sub(1),
        scr.y.saturating_sub(1),
        scr.w + 2,
        scr.h + 2,
        pal.shell,
        pal.bg,
    );
    draw_header(buf, st, rules, pal);

    let name = character(st.character_id).name;
    match &st.mode {
        Mode::Room => draw_room(buf, st, &scr, pal),
        Mode::Talk => {
            draw_room(buf, st, &scr, pal);
            draw_text(buf, scr.x + 2, scr.line(1), &st.rt.message, pal.accent, pal.bg);
        }
        Mode::Menu => {
            let labels: Vec<&str> = MenuItem::ALL.iter().map(|m| m.label()).collect();
            draw_list(buf, &scr, "Menu", &labels, st.selected_menu_index, pal);
        }
        Mode::GameSelect => draw_list(buf, &scr, "Games", &GAMES, st.selected_menu_index, pal),
        Mode::Status => draw_status(buf, st, &scr, pal),
        Mode::EvoReady => {
            draw_pet(buf, st, &scr, pal);
            draw_text(buf, scr.x + 2, scr.line(1), "Something is happening...", pal.accent, pal.bg);
        }
        Mode::EvoChoice => draw_banner(buf, &scr, &[name, "", "Evolve now?"], pal.accent, pal.bg),
        Mode::Evo => {
            let line = format!("became {}!", name);
            draw_banner(buf, &scr, &["Evolution!", "", line.as_str()], pal.accent, pal.bg);
        }
        Mode::GameCatch(game) => draw_catch(buf, st, game, &scr, pal),
        Mode::GameAcchi(game) => draw_acchi(buf, st, game, &scr, pal),
        Mode::GameJanken(game) => draw_janken(buf, st, game, &scr, pal),
        Mode::Dead => draw_banner(buf, &scr, &[name, "has passed away."], pal.warn, pal.bg),
        Mode::LifeEnd => {
            let training = format!("training {}", st.stats.training);
            draw_banner(buf, &scr, &[name, "lived a full life.", training.as_str()], pal.accent, pal.bg);
        }
        Mode::Breeding => draw_breeding(buf, st, &scr, pal),
    }

    draw_text(buf, 1, buf.h.saturating_sub(1), help_line(&st.mode), pal.shell, pal.bg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(buf: &CellBuffer, y: u16) -> String {
        (0..buf.w)
            .map(|x| buf.cells[buf.idx(x, y)].ch)
            .collect()
    }

    #[test]
    fn bar_rounds_to_nearest_cell() {
        assert_eq!(bar(0.0, 4), "[    ]");
        assert_eq!(bar(0.5, 4), "[██  ]");
        assert_eq!(bar(2.0, 4), "[████]");
    }

    #[test]
    fn room_corners_map_inside_the_screen() {
        let scr = Screen::fit(80, 30);
        assert_eq!(scr.to_cell(Point::new(0, 0)), (scr.x as i32, scr.y as i32));
        let (x, y) = scr.to_cell(Point::new(100, 100));
        assert_eq!(x, (scr.x + scr.w - 1) as i32);
        assert_eq!(y, (scr.y + scr.h - 1) as i32);
    }

    #[test]
    fn sprites_alternate_by_frame() {
        for s in [Species::Beast, Species::Ghost, Species::Robot] {
            assert_ne!(sprite(s, 3, 0), sprite(s, 3, 1));
            assert_eq!(sprite(s, 3, 0), sprite(s, 3, 2));
        }
    }

    #[test]
    fn text_is_clipped_at_the_edge() {
        let mut buf = CellBuffer::new(4, 1);
        draw_text(&mut buf, 2, 0, "hello", Color::White, Color::Black);
        assert_eq!(row(&buf, 0), "  he");
    }

    #[test]
    fn menu_frame_marks_the_selection() {
        let mut st = GameState::new(Utc::now());
        st.set_mode(Mode::Menu);
        st.selected_menu_index = 1;
        let mut buf = CellBuffer::new(80, 30);
        draw_frame(&mut buf, &st, &Settings::default(), &Rules::default());
        let scr = Screen::fit(80, 30);
        assert!(row(&buf, scr.line(4)).contains("> Clean"));
        assert!(row(&buf, 29).contains("esc back"));
    }
}
