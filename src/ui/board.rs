/// Board renderer: the 2x2 button grid, the level disc, and the few
/// full-screen texts (title, win, lose).
///
/// Every `render` is one full redraw: clear, draw, flush.

use crate::domain::button::{Button, Tone, QUADRANT};
use crate::domain::color::{Palette, BLACK, WHITE};
use crate::domain::difficulty::Difficulty;
use crate::error::Result;
use crate::ui::device::{DrawSurface, InputSource};

/// Display is square, 240 px a side.
pub const SCREEN: i32 = 2 * QUADRANT;

/// Pixel widths of the digits 0-9 at scale 4, used to center the level.
const DIGIT_WIDTHS: [i32; 10] = [12, 6, 10, 10, 12, 10, 12, 12, 12, 12];

const CENTER: i32 = SCREEN / 2;

const CREDIT: &str = "by: OneMadGypsy                                        2021";

/// A cell that lit up during a render, with the tone it owns.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pressed {
    pub button: Button,
    pub tone: Tone,
}

pub struct BoardRenderer {
    palette: Palette,
}

impl BoardRenderer {
    pub fn new(palette: Palette) -> Self {
        BoardRenderer { palette }
    }

    /// Draw one frame of the board.
    ///
    /// A cell is lit if it is `active`, or if `listen` is set and its
    /// button is held. The last lit cell in scan order is returned, so
    /// when several buttons are held the highest index wins.
    pub fn render<H>(
        &self,
        hw: &mut H,
        level: u32,
        active: Option<Button>,
        listen: bool,
    ) -> Result<Option<Pressed>>
    where
        H: DrawSurface + InputSource + ?Sized,
    {
        let mut pressed = None;
        hw.set_pen(BLACK);
        hw.clear();

        for button in Button::ALL {
            let held = listen && hw.is_pressed(button)?;
            let lit = held || active == Some(button);
            if lit {
                pressed = Some(Pressed { button, tone: button.tone() });
            }

            let (x, y) = button.origin();
            hw.set_pen(self.palette.frame(button));
            hw.rectangle(x + 2, y + 2, QUADRANT - 4, QUADRANT - 4);
            hw.set_pen(self.palette.cell(button, lit));
            hw.rectangle(x + 7, y + 7, QUADRANT - 14, QUADRANT - 14);
        }

        hw.set_pen(BLACK);
        hw.circle(CENTER, CENTER, 40);
        hw.set_pen(self.palette.ring());
        hw.circle(CENTER, CENTER, 36);
        hw.set_pen(self.palette.disc());
        hw.circle(CENTER, CENTER, 31);

        hw.set_pen(WHITE);
        hw.text(&level.to_string(), CENTER + 1 - level_offset(level), 108, 160, 4);
        hw.update()?;

        Ok(pressed)
    }

    /// Title screen with one line per difficulty preset.
    pub fn render_title<H: DrawSurface + ?Sized>(&self, hw: &mut H) -> Result<()> {
        hw.set_pen(self.palette.title_background());
        hw.clear();
        hw.set_pen(self.palette.title_heading());
        hw.text("DO SAME", 10, 20, 235, 6);
        hw.text(CREDIT, 10, 60, SCREEN, 1);
        hw.set_pen(BLACK);
        for (row, difficulty) in Difficulty::ALL.iter().enumerate() {
            hw.text(&difficulty.menu_line(), 40, 100 + 20 * row as i32, 240, 2);
        }
        hw.update()
    }

    /// Overlay a message on whatever is on screen and flush.
    pub fn banner<H: DrawSurface + ?Sized>(&self, hw: &mut H, banner: Banner) -> Result<()> {
        let (text, x, y, scale) = match banner {
            Banner::Win => ("You Win!", 10, 30, 6),
            Banner::Lose => ("You Lose!", 16, 30, 5),
        };
        hw.set_pen(WHITE);
        hw.text(text, x, y, SCREEN, scale);
        hw.update()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Banner {
    Win,
    Lose,
}

/// Horizontal offset that centers the level number on the disc.
/// Single digits use their own width; longer numbers sum their digits.
fn level_offset(level: u32) -> i32 {
    if level < 10 {
        return DIGIT_WIDTHS[level as usize];
    }
    level
        .to_string()
        .bytes()
        .map(|d| DIGIT_WIDTHS[(d - b'0') as usize])
        .sum()
}
