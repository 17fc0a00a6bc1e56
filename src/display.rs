use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::interpreter::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Display is what the driver hands the framebuffer to. It should abstract
/// the implementation details, so a variety of kinds of screen would work.
///
/// The framebuffer is one byte per pixel, value 0 or 1, row-major with the
/// origin at the top left.
pub trait Display {
    /// render a full frame of pixel cells
    fn draw(&mut self, cells: &[u8]) -> Result<(), io::Error>;

    /// how many cells a frame must contain
    fn cell_count(&self) -> usize;
}

// store useful metadata about the terminal
struct Resolution(usize, usize);

impl Resolution {
    fn cell_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// expand the cells holding `value` into x, y float coords, suitable
    /// for rendering with TUI
    fn cells_with_value<'a>(
        &self,
        cells: &'a [u8],
        value: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.cell_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                if cells[count] == value {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI over crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, cells: &[u8]) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            cells.len(),
            self.resolution.cell_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );

        // 1:1 ratio between terminal cells, chip8 pixels and the TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + self.resolution.0 as u16,
                2 + self.resolution.1 as u16,
            );

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(self.resolution.x_bounds())
                .y_bounds(self.resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &self.resolution.cells_with_value(cells, 0).collect::<Vec<_>>(),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &self.resolution.cells_with_value(cells, 1).collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn cell_count(&self) -> usize {
        self.resolution.cell_count()
    }
}

/// useful for testing non-display routines
pub struct DummyDisplay {
    pub frames: usize,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay { frames: 0 }
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, _cells: &[u8]) -> Result<(), io::Error> {
        self.frames += 1;
        Ok(())
    }

    fn cell_count(&self) -> usize {
        DISPLAY_WIDTH * DISPLAY_HEIGHT
    }
}
