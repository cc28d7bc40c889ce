use std::io;
use std::io::Write;

use crossterm::cursor;
use crossterm::queue;
use crossterm::style;
use crossterm::style::Color;

/// The display boundary consumed by the engine: one `draw_cell` per cell,
/// then a `present` to flush the frame.
pub trait Renderer {
    fn draw_cell(&mut self, x: usize, y: usize, alive: bool);

    fn present(&mut self) -> io::Result<()>;
}

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// A terminal renderer packing 2x4 grid cells into each braille character.
pub struct BrailleScreen {
    /// The cell buffer
    cb: Vec<bool>,

    /// Codepoints. This allows us to construct the frame more easily
    cp: Vec<u32>,

    /// Width of the cell buffer
    w: usize,

    /// Height of the cell buffer
    h: usize,

    alive_color: Color,
    dead_color: Color,
}

impl BrailleScreen {
    pub fn new(w: usize, h: usize, alive_color: Color, dead_color: Color) -> Self {
        let cb = vec![false; w * h];

        // Let `w` and `h` refer to width and height of the cell buffer. Then
        // `bw = ceil(w / 2)` and `bh = ceil(h / 4)` are the width and height
        // of our frame in braille characters.
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));
        let cp = vec![BRAILLE_EMPTY; bw * bh];

        Self {
            cb,
            cp,
            w,
            h,
            alive_color,
            dead_color,
        }
    }

    /// Grid cells covered by the terminal cell at `(col, row)`, top-left
    /// corner. This is where pointer input converts to grid coordinates.
    pub fn cell_at(col: u16, row: u16) -> (usize, usize) {
        (col as usize * 2, row as usize * 4)
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

impl Renderer for BrailleScreen {
    fn draw_cell(&mut self, x: usize, y: usize, alive: bool) {
        if x >= self.w || y >= self.h {
            return;
        }

        self.cb[y * self.w + x] = alive;
    }

    fn present(&mut self) -> io::Result<()> {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            let (x, y) = (n % self.w, n / self.w);

            if px {
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        let mut stdout = io::stdout();

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            style::SetForegroundColor(self.alive_color),
            style::SetBackgroundColor(self.dead_color),
        )?;

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                queue!(stdout, cursor::MoveToNextLine(1))?;
            }

            let c = char::from_u32(c).unwrap_or(' ');
            queue!(stdout, style::Print(c))?;
        }

        queue!(stdout, style::ResetColor)?;
        stdout.flush()
    }
}
