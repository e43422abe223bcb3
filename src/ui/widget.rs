/// Small drawable components for the screen around the board.
///
/// A widget is mounted into a rectangular area of the frame (whenever the
/// terminal size changes) and drawn every frame.

use crossterm::style::Color;

use super::frame::FrameBuffer;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Area {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Area {
    pub const fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Area { x, y, w, h }
    }
}

pub trait Widget {
    fn mount(&mut self, area: Area);
    fn draw(&self, buf: &mut FrameBuffer);
}

// ── TextBlock ──

/// Lines of text centred horizontally in their area. Lines past the
/// area's height are dropped; long lines are clipped.
pub struct TextBlock {
    lines: Vec<String>,
    fg: Color,
    area: Area,
}

impl TextBlock {
    pub fn new(text: &str, fg: Color) -> Self {
        TextBlock {
            lines: text.lines().map(str::to_string).collect(),
            fg,
            area: Area::default(),
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = text.lines().map(str::to_string).collect();
    }
}

impl Widget for TextBlock {
    fn mount(&mut self, area: Area) {
        self.area = area;
    }

    fn draw(&self, buf: &mut FrameBuffer) {
        let a = self.area;
        for (i, line) in self.lines.iter().take(a.h).enumerate() {
            let len = line.chars().count();
            let x = a.x + a.w.saturating_sub(len) / 2;
            let clipped: String = line.chars().take(a.w).collect();
            buf.put_str(x, a.y + i, &clipped, self.fg, Color::Reset);
        }
    }
}

// ── StatusBar ──

/// One-row bar with text on the left and on the right. The left side
/// wins when both do not fit.
pub struct StatusBar {
    left: String,
    right: String,
    fg: Color,
    bg: Color,
    area: Area,
}

impl StatusBar {
    pub fn new(fg: Color, bg: Color) -> Self {
        StatusBar {
            left: String::new(),
            right: String::new(),
            fg,
            bg,
            area: Area::default(),
        }
    }

    pub fn set(&mut self, left: impl Into<String>, right: impl Into<String>) {
        self.left = left.into();
        self.right = right.into();
    }
}

impl Widget for StatusBar {
    fn mount(&mut self, area: Area) {
        self.area = area;
    }

    fn draw(&self, buf: &mut FrameBuffer) {
        let a = self.area;
        if a.h == 0 || a.w == 0 {
            return;
        }
        buf.fill_span(a.x, a.y, a.w, self.bg);

        let left: String = format!(" {}", self.left).chars().take(a.w).collect();
        let used = buf.put_str(a.x, a.y, &left, self.fg, self.bg);

        let right = format!("{} ", self.right);
        let right_len = right.chars().count();
        if used + right_len < a.w {
            buf.put_str(a.x + a.w - right_len, a.y, &right, self.fg, self.bg);
        }
    }
}
