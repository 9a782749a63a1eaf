/// Terminal drawing surface: a 240x240 native-pixel canvas shown with
/// half-block glyphs, double-buffered and diff-flushed.
///
/// How it works:
///   1. Drawing calls paint into `Canvas` (RGB565 pixels + text runs)
///   2. `update()` samples the canvas into `front`: one terminal cell
///      covers 4x8 pixels, drawn as '▀' with the top half as foreground
///      and the bottom half as background
///   3. Text runs are laid over the cells at their scaled position
///   4. Only cells that differ from `back` are emitted, batched with
///      `queue!` and flushed once
///   5. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::color::{self, NativeColor, BLACK};
use crate::error::Result;
use crate::ui::board::SCREEN;
use crate::ui::device::DrawSurface;

const CANVAS: usize = SCREEN as usize;
const PX_PER_COL: usize = 4;
const PX_PER_ROW: usize = 8;
const COLS: usize = CANVAS / PX_PER_COL;
const ROWS: usize = CANVAS / PX_PER_ROW;

const HALF_BLOCK: char = '▀';

fn term_color(native: NativeColor) -> Color {
    let c = color::decode(native);
    Color::Rgb { r: c.red, g: c.green, b: c.blue }
}

// ── Canvas: what the game draws into ──

#[derive(Clone, Debug, PartialEq, Eq)]
struct TextRun {
    text: String,
    col: usize,
    row: usize,
    color: NativeColor,
}

struct Canvas {
    pixels: Vec<NativeColor>,
    texts: Vec<TextRun>,
    pen: NativeColor,
}

impl Canvas {
    fn new() -> Self {
        Canvas {
            pixels: vec![BLACK; CANVAS * CANVAS],
            texts: Vec::new(),
            pen: BLACK,
        }
    }

    fn pixel(&self, x: usize, y: usize) -> NativeColor {
        self.pixels[y * CANVAS + x]
    }

    fn clear(&mut self) {
        self.pixels.fill(self.pen);
        self.texts.clear();
    }

    fn rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let x0 = x.clamp(0, CANVAS as i32) as usize;
        let y0 = y.clamp(0, CANVAS as i32) as usize;
        let x1 = (x + w).clamp(0, CANVAS as i32) as usize;
        let y1 = (y + h).clamp(0, CANVAS as i32) as usize;
        if x1 <= x0 {
            return;
        }
        for row in y0..y1 {
            self.pixels[row * CANVAS + x0..row * CANVAS + x1].fill(self.pen);
        }
    }

    fn circle(&mut self, cx: i32, cy: i32, r: i32) {
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(CANVAS as i32 - 1);
        for y in y0..=y1 {
            let dy = y - cy;
            let span = ((r * r - dy * dy) as f32).sqrt() as i32;
            self.rectangle(cx - span, y, 2 * span + 1, 1);
        }
    }

    fn text(&mut self, s: &str, x: i32, y: i32, max_width: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let max_chars = max_width.max(0) as usize / PX_PER_COL;
        self.texts.push(TextRun {
            text: s.chars().take(max_chars).collect(),
            col: x as usize / PX_PER_COL,
            row: y as usize / PX_PER_ROW,
            color: self.pen,
        });
    }

    /// Sample pixels and overlay text into `fb`, with the canvas placed
    /// at terminal cell (ox, oy).
    fn compose(&self, fb: &mut FrameBuffer, ox: usize, oy: usize) {
        for row in 0..ROWS {
            for col in 0..COLS {
                let px = col * PX_PER_COL + PX_PER_COL / 2;
                let top = self.pixel(px, row * PX_PER_ROW + PX_PER_ROW / 4);
                let bottom = self.pixel(px, row * PX_PER_ROW + 3 * PX_PER_ROW / 4);
                fb.set(ox + col, oy + row, Cell {
                    ch: HALF_BLOCK,
                    fg: term_color(top),
                    bg: term_color(bottom),
                });
            }
        }

        for run in &self.texts {
            if run.row >= ROWS {
                continue;
            }
            for (i, ch) in run.text.chars().enumerate() {
                let col = run.col + i;
                if col >= COLS {
                    break;
                }
                let under = self.pixel(col * PX_PER_COL + PX_PER_COL / 2, run.row * PX_PER_ROW + PX_PER_ROW / 2);
                fb.set(ox + col, oy + run.row, Cell {
                    ch,
                    fg: term_color(run.color),
                    bg: term_color(under),
                });
            }
        }
    }
}

// ── Cell / FrameBuffer: what the terminal shows ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Backdrop outside the canvas.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Differs from every real cell; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }
}

// ── TerminalSurface ──

pub struct TerminalSurface {
    writer: BufWriter<io::Stdout>,
    canvas: Canvas,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    enhanced_keys: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        TerminalSurface {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            canvas: Canvas::new(),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns whether the
    /// terminal reports key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    fn present(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        let ox = self.term_w.saturating_sub(COLS) / 2;
        let oy = self.term_h.saturating_sub(ROWS) / 2;
        self.canvas.compose(&mut self.front, ox, oy);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
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

impl DrawSurface for TerminalSurface {
    fn set_pen(&mut self, color: NativeColor) {
        self.canvas.pen = color;
    }

    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.canvas.rectangle(x, y, w, h);
    }

    fn circle(&mut self, x: i32, y: i32, r: i32) {
        self.canvas.circle(x, y, r);
    }

    fn text(&mut self, s: &str, x: i32, y: i32, max_width: i32, _scale: u8) {
        self.canvas.text(s, x, y, max_width);
    }

    fn update(&mut self) -> Result<()> {
        Ok(self.present()?)
    }
}
