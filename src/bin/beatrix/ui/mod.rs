//! TUI for the matrix editor.
//!
//! The grid mirrors the original hardware panel: hjkl or the arrows move
//! the cursor, space toggles a connection, + and - turn the numeric knobs,
//! and `d` swaps the scope panels for the compiled-program listing.

mod grid;
mod program;
mod scope;
mod spectrum;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use beatrix::engine::MAX_SHIFT;
use beatrix::matrix::Config;
use beatrix::Engine;

use grid::{cell_at, render_grid, Cell, GridCursor, GRID_ROWS};
use program::render_program;
use scope::render_scope;
use spectrum::SpectrumView;

/// Scope window length; also the spectrum's FFT size.
const SCOPE_LEN: usize = 512;

/// Largest constant-knob value whose `<< 6` still fits a sample.
const MAX_CONST_KNOB: i16 = 511;

pub struct UiApp {
    engine: Arc<Mutex<Engine>>,
    scope_rx: Consumer<f32>,
    scope_buf: Vec<f32>,
    spectrum: SpectrumView,
    cursor: GridCursor,
    /// Knob behind the constant cell; the constant row carries `knob << 6`.
    const_knob: i16,
    show_debug: bool,
    should_quit: bool,
}

impl UiApp {
    pub fn new(engine: Arc<Mutex<Engine>>, scope_rx: Consumer<f32>) -> UiApp {
        let const_knob = engine.lock().unwrap().config().constant >> 6;
        UiApp {
            engine,
            scope_rx,
            scope_buf: vec![0.0; SCOPE_LEN],
            spectrum: SpectrumView::new(SCOPE_LEN),
            // start on the audio column, like the original panel
            cursor: GridCursor { x: 10, y: 3 },
            const_knob,
            show_debug: false,
            should_quit: false,
        }
    }

    /// Run the UI event loop.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            let (config, listing) = self.snapshot();
            terminal.draw(|frame| self.render(frame, &config, &listing))?;

            // non-blocking input, ~60 fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain pending scope samples, keeping the last `SCOPE_LEN`.
    fn poll_scope(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope_buf.push(sample);
        }
        if self.scope_buf.len() > SCOPE_LEN {
            let excess = self.scope_buf.len() - SCOPE_LEN;
            self.scope_buf.drain(0..excess);
        }
        self.spectrum.update(&self.scope_buf);
    }

    /// Copy out what a draw needs so the engine lock is not held while
    /// rendering.
    fn snapshot(&self) -> (Config, Vec<String>) {
        let engine = self.engine.lock().unwrap();
        let config = *engine.config();
        let listing = if self.show_debug {
            engine.program().disassemble()
        } else {
            Vec::new()
        };
        (config, listing)
    }

    fn render(&self, frame: &mut Frame, config: &Config, listing: &[String]) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(GRID_ROWS as u16 + 2),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let grid_block = Block::default().title(" Matrix ").borders(Borders::ALL);
        let grid_area = grid_block.inner(rows[0]);
        frame.render_widget(grid_block, rows[0]);
        render_grid(frame, grid_area, config, self.const_knob, self.cursor);

        if self.show_debug {
            render_program(frame, rows[1], config, listing);
        } else {
            let panels = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(rows[1]);
            render_scope(frame, panels[0], &self.scope_buf);
            self.spectrum.render(frame, panels[1]);
        }

        let help = Line::from(" space: toggle   +/-: adjust   hjkl: move   d: program   q: quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('d') => self.show_debug = !self.show_debug,
            KeyCode::Left | KeyCode::Char('h') => self.cursor.left(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.down(),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.up(),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.right(),
            KeyCode::Char(' ') | KeyCode::Char('+') | KeyCode::Enter => self.edit(1),
            KeyCode::Char('-') | KeyCode::Backspace => self.edit(-1),
            _ => {}
        }
    }

    /// Apply an edit to the cell under the cursor. Toggles ignore the
    /// direction, knobs step by it.
    fn edit(&mut self, delta: i16) {
        let mut engine = self.engine.lock().unwrap();
        match cell_at(self.cursor) {
            Cell::Toggle { row, col } => engine.toggle(row, col),
            Cell::ConstKnob => {
                self.const_knob = (self.const_knob + delta).clamp(0, MAX_CONST_KNOB);
                engine.set_constant(self.const_knob << 6);
            }
            Cell::TimeShift(index) => {
                let shift = match index {
                    0 => engine.config().shift1,
                    1 => engine.config().shift2,
                    _ => engine.config().shift3,
                };
                engine.set_time_shift(index, step_shift(shift, delta));
            }
            Cell::AudioShift => {
                let shift = engine.config().audio_shift;
                engine.set_audio_shift(step_shift(shift, delta));
            }
            Cell::RowLabel | Cell::ColumnLabel => {}
        }
    }
}

fn step_shift(shift: u8, delta: i16) -> u8 {
    (i16::from(shift) + delta).clamp(0, i16::from(MAX_SHIFT)) as u8
}
