/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The board is drawn with upper-half blocks: each terminal cell carries
/// two vertically stacked picture pixels (fg = top, bg = bottom), which
/// keeps the pixels roughly square.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, SetTitle},
};

use crate::sim::fade::RENDER_EXTENT;
use crate::sim::layout::TileQuad;
use crate::sim::level::LevelIndex;
use crate::sim::session::{Phase, Session};

use super::frame::{Cell, FrameBuffer};
use super::picture::{Picture, PictureStore};
use super::widget::{Area, StatusBar, TextBlock, Widget};

// ── Layout ──

const STATUS_ROW: usize = 0;
const BANNER_ROW: usize = 1;
const BOARD_ROW: usize = 2;
const HELP_ROWS: usize = 3;
/// Rows not available to the board: status, banner, gap, help.
const RESERVED_ROWS: usize = BOARD_ROW + 1 + HELP_ROWS;

const HALF_BLOCK: char = '▀';

const BOARD_BG: Color = Color::Rgb { r: 10, g: 10, b: 18 };
const STATUS_FG: Color = Color::Rgb { r: 230, g: 230, b: 240 };
const STATUS_BG: Color = Color::Rgb { r: 40, g: 44, b: 70 };
const HELP_FG: Color = Color::Rgb { r: 150, g: 150, b: 170 };
const BANNER_FG: Color = Color::Rgb { r: 255, g: 220, b: 50 };

pub const HELP_TEXT: &str = "Place each piece in its place\n\
                             Arrow keys move the empty square\n\
                             Enter: skip fade   R: reshuffle   Esc: quit";

pub const VICTORY_TITLE: &str = "Win!";

/// Where the board lands on screen: top-left cell and side in pixels.
/// The board covers `size` columns and `size / 2` rows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct BoardArea {
    x: usize,
    y: usize,
    size: usize,
}

fn board_area(term_w: usize, term_h: usize) -> Option<BoardArea> {
    let rows = term_h.saturating_sub(RESERVED_ROWS);
    let mut size = term_w.min(rows * 2);
    size -= size % 2;
    if size < 4 {
        return None;
    }
    Some(BoardArea {
        x: (term_w - size) / 2,
        y: BOARD_ROW + (rows - size / 2) / 2,
        size,
    })
}

fn phase_label(session: &Session) -> &'static str {
    if session.is_victory() {
        return VICTORY_TITLE;
    }
    match session.phase() {
        Phase::FadeIn => "Get ready",
        Phase::Shuffling => "Shuffling",
        Phase::InProgress => "Playing",
        Phase::FadeOut | Phase::End => "Solved!",
    }
}

fn level_label(session: &Session) -> String {
    let level = session.level();
    match level.index {
        LevelIndex::Playable(i) => format!(
            "Level {}/{}  {}  {side}x{side}",
            i + 1,
            session.levels().playable_count(),
            level.name,
            side = session.settings().side,
        ),
        LevelIndex::Victory => VICTORY_TITLE.to_string(),
    }
}

fn window_title(session: &Session) -> String {
    if session.is_victory() {
        VICTORY_TITLE.to_string()
    } else {
        format!("tileshift - {}", session.level().name)
    }
}

// ══════════════════════════════════════════════════════════════
// Screen: everything composed into the front buffer
// ══════════════════════════════════════════════════════════════

struct Screen {
    status: StatusBar,
    banner: TextBlock,
    help: TextBlock,
    mounted: Option<(usize, usize)>,
}

impl Screen {
    fn new() -> Self {
        Screen {
            status: StatusBar::new(STATUS_FG, STATUS_BG),
            banner: TextBlock::new("", BANNER_FG),
            help: TextBlock::new(HELP_TEXT, HELP_FG),
            mounted: None,
        }
    }

    fn mount(&mut self, w: usize, h: usize) {
        if self.mounted == Some((w, h)) {
            return;
        }
        self.status.mount(Area::new(0, STATUS_ROW, w, 1));
        self.banner.mount(Area::new(0, BANNER_ROW, w, 1));
        let help_y = h.saturating_sub(HELP_ROWS).max(BOARD_ROW);
        self.help.mount(Area::new(0, help_y, w, h.saturating_sub(help_y)));
        self.mounted = Some((w, h));
    }

    fn compose(&mut self, buf: &mut FrameBuffer, session: &Session, pictures: &PictureStore) {
        let (w, h) = (buf.width(), buf.height());
        self.mount(w, h);

        let right = if session.is_victory() {
            String::new()
        } else {
            format!("{}  Moves {}", phase_label(session), session.moves())
        };
        self.status.set(level_label(session), right);
        self.banner.set_text(if session.is_victory() { VICTORY_TITLE } else { "" });

        self.status.draw(buf);
        self.banner.draw(buf);

        match board_area(w, h) {
            Some(area) => {
                let picture = pictures.get(session.level().asset);
                compose_board(buf, session, picture, area);
            }
            None => {
                buf.put_str(0, BOARD_ROW, "Terminal too small", STATUS_FG, Color::Reset);
            }
        }

        self.help.draw(buf);
    }
}

/// Paint the board: tiles sampled from their home region of the picture,
/// gaps and the empty cell in the board colour.
fn compose_board(buf: &mut FrameBuffer, session: &Session, picture: Option<&Picture>, area: BoardArea) {
    let side = session.grid().side();
    if side == 0 {
        return;
    }
    let extent = RENDER_EXTENT as f32;
    let cell = extent / side as f32;

    // Quad lookup by the cell its destination sits in
    let mut by_cell: Vec<Option<TileQuad>> = vec![None; side * side];
    for q in session.tile_quads() {
        let col = (((q.dst.x + q.dst.w / 2.0) / cell) as usize).min(side - 1);
        let row = (((q.dst.y + q.dst.h / 2.0) / cell) as usize).min(side - 1);
        by_cell[row * side + col] = Some(q);
    }

    let scale = extent / area.size as f32;
    let pixel = |px: usize, py: usize| -> Color {
        let rx = (px as f32 + 0.5) * scale;
        let ry = (py as f32 + 0.5) * scale;
        let col = ((rx / cell) as usize).min(side - 1);
        let row = ((ry / cell) as usize).min(side - 1);
        let quad = match by_cell[row * side + col] {
            Some(q) if q.dst.contains(rx, ry) => q,
            _ => return BOARD_BG,
        };
        match picture {
            Some(pic) => {
                let c = pic.sample(quad.src.x + (rx - quad.dst.x), quad.src.y + (ry - quad.dst.y));
                Color::Rgb { r: c[0], g: c[1], b: c[2] }
            }
            None => {
                // No picture: shade by tile number
                let shade = 60 + (quad.tile * 160 / (side * side)) as u8;
                Color::Rgb { r: shade, g: shade, b: shade }
            }
        }
    };

    for ty in 0..area.size / 2 {
        for tx in 0..area.size {
            let top = pixel(tx, ty * 2);
            let bottom = pixel(tx, ty * 2 + 1);
            buf.set(area.x + tx, area.y + ty, Cell::new(HALF_BLOCK, top, bottom));
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Renderer
// ══════════════════════════════════════════════════════════════

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_level: Option<LevelIndex>,
    screen: Screen,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(65536, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_level: None,
            screen: Screen::new(),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.invalidate();

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.back.invalidate();
    }

    pub fn render(&mut self, session: &Session, pictures: &PictureStore) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // New level → clean repaint and a fresh window title
        let level = session.levels().current();
        if self.last_level != Some(level) {
            self.back.invalidate();
            queue!(
                self.writer,
                SetTitle(window_title(session)),
                SetBackgroundColor(Cell::BASE_BG),
                Clear(ClearType::All)
            )?;
            self.last_level = Some(level);
        }

        self.front.clear();
        self.screen.compose(&mut self.front, session, pictures);

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors, never ResetColor: the terminal default may
        // differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height() {
            for x in 0..self.front.width() {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{DiscoveredLevel, LevelSequencer};
    use crate::sim::session::SessionSettings;
    use crate::sim::step;
    use crate::ui::picture::{builtin_picture, builtin_victory};

    fn fixture() -> (Session, PictureStore) {
        fixture_at(false)
    }

    fn fixture_at(victory: bool) -> (Session, PictureStore) {
        let mut store = PictureStore::new();
        let entries = vec![
            DiscoveredLevel { name: "rainbow".into(), asset: store.add(builtin_picture(0)), is_victory: false },
            DiscoveredLevel { name: "winner".into(), asset: store.add(builtin_victory()), is_victory: true },
        ];
        let mut levels = LevelSequencer::new(entries).unwrap();
        if victory {
            levels.advance();
        }
        let session = Session::new(levels, SessionSettings { side: 3, difficulty: 10 }, 99).unwrap();
        (session, store)
    }

    #[test]
    fn board_area_fits_and_centres() {
        let a = board_area(80, 24).unwrap();
        // 24 - 6 = 18 rows → 36 px wide
        assert_eq!(a.size, 36);
        assert_eq!(a.x, 22);
        assert_eq!(a.y, BOARD_ROW);
        assert!(board_area(3, 24).is_none());
        assert!(board_area(80, 7).is_none());
    }

    #[test]
    fn hidden_board_is_all_background() {
        let (session, store) = fixture();
        assert_eq!(session.phase(), Phase::FadeIn);
        let mut fb = FrameBuffer::new(60, 20);
        Screen::new().compose(&mut fb, &session, &store);

        let area = board_area(60, 20).unwrap();
        let mid = fb.get(area.x + area.size / 2, area.y + area.size / 4);
        assert_eq!(mid.ch, HALF_BLOCK);
        // Fully inset tiles have zero size
        assert_eq!(mid.fg, BOARD_BG);
        assert!(fb.row_text(STATUS_ROW).contains("Level 1/1  rainbow  3x3"));
        assert!(fb.row_text(STATUS_ROW).contains("Get ready"));
    }

    #[test]
    fn shown_board_samples_the_picture() {
        let (mut session, store) = fixture();
        session.skip_fade();
        step::tick(&mut session).unwrap();
        let mut fb = FrameBuffer::new(40, 20);
        Screen::new().compose(&mut fb, &session, &store);

        let area = board_area(40, 20).unwrap();
        let coloured = (0..area.size)
            .filter(|&x| fb.get(area.x + x, area.y + 1).fg != BOARD_BG)
            .count();
        assert!(coloured > area.size / 2);
    }

    #[test]
    fn victory_shows_banner() {
        let (session, store) = fixture_at(true);
        let mut fb = FrameBuffer::new(40, 20);
        Screen::new().compose(&mut fb, &session, &store);
        assert!(fb.row_text(BANNER_ROW).contains(VICTORY_TITLE));
        assert!(fb.row_text(STATUS_ROW).contains(VICTORY_TITLE));
        assert_eq!(window_title(&session), "Win!");
    }

    #[test]
    fn help_text_sits_at_the_bottom() {
        let (session, store) = fixture();
        let mut fb = FrameBuffer::new(60, 20);
        Screen::new().compose(&mut fb, &session, &store);
        assert!(fb.row_text(17).contains("Place each piece in its place"));
        assert!(fb.row_text(18).contains("Arrow keys move the empty square"));
    }

    #[test]
    fn tiny_terminal_gets_a_notice() {
        let (session, store) = fixture();
        let mut fb = FrameBuffer::new(20, 6);
        Screen::new().compose(&mut fb, &session, &store);
        assert!(fb.row_text(BOARD_ROW).starts_with("Terminal too small"));
    }
}
