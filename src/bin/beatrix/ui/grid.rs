//! The matrix grid widget: source rows down the left, sink columns along
//! the bottom, togglable connection cells in between.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

use beatrix::matrix::{Config, RowId, MATRIX_COLS, MATRIX_ROWS};

/// Grid geometry: one label column plus the ten sink columns, the seven
/// source rows plus the label row.
pub const GRID_COLS: usize = MATRIX_COLS + 1;
pub const GRID_ROWS: usize = MATRIX_ROWS + 1;

const LABEL_WIDTH: usize = 10;
const CELL_WIDTH: usize = 4;

/// Cursor position on the grid, in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    pub x: usize,
    pub y: usize,
}

impl GridCursor {
    pub fn left(&mut self) {
        self.x = (self.x + GRID_COLS - 1) % GRID_COLS;
    }

    pub fn right(&mut self) {
        self.x = (self.x + 1) % GRID_COLS;
    }

    pub fn up(&mut self) {
        self.y = (self.y + GRID_ROWS - 1) % GRID_ROWS;
    }

    pub fn down(&mut self) {
        self.y = (self.y + 1) % GRID_ROWS;
    }
}

/// What kind of cell the cursor is on, and so which edit applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// The constant knob; the constant row carries `knob << 6`.
    ConstKnob,
    /// One of the three time-shift amounts (index 0..3).
    TimeShift(usize),
    /// A combinator row's formula label; nothing to edit.
    RowLabel,
    /// A togglable connection between a row and a sink column.
    Toggle { row: RowId, col: usize },
    /// A sink column's name; nothing to edit.
    ColumnLabel,
    /// The output shift on the audio column's label.
    AudioShift,
}

pub fn cell_at(cursor: GridCursor) -> Cell {
    if cursor.y < MATRIX_ROWS {
        let row = RowId::ALL[cursor.y];
        if cursor.x == 0 {
            return match cursor.y {
                0 => Cell::ConstKnob,
                1..=3 => Cell::TimeShift(cursor.y - 1),
                _ => Cell::RowLabel,
            };
        }
        return Cell::Toggle {
            row,
            col: cursor.x - 1,
        };
    }
    match cursor.x {
        0 => Cell::RowLabel,
        x if x == GRID_COLS - 1 => Cell::AudioShift,
        _ => Cell::ColumnLabel,
    }
}

fn row_label(config: &Config, const_knob: i16, y: usize) -> String {
    match y {
        0 => format!("{const_knob}<<6"),
        1 => format!("t>>{}", config.shift1),
        2 => format!("t>>{}", config.shift2),
        3 => format!("t>>{}", config.shift3),
        4 => "xa^xb^xc".to_string(),
        5 => "pa*pb*pc".to_string(),
        6 => "sa+sb+sc".to_string(),
        _ => "-".to_string(),
    }
}

fn column_label(config: &Config, col: usize) -> String {
    match col {
        0..=2 => format!("s{}", (b'a' + col as u8) as char),
        3..=5 => format!("p{}", (b'a' + (col - 3) as u8) as char),
        6..=8 => format!("x{}", (b'a' + (col - 6) as u8) as char),
        _ => format!("a>>{}", config.audio_shift),
    }
}

pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    config: &Config,
    const_knob: i16,
    cursor: GridCursor,
) {
    let cursor_style = Style::default()
        .bg(Color::White)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::with_capacity(GRID_ROWS);
    for y in 0..GRID_ROWS {
        let mut spans = Vec::with_capacity(GRID_COLS);
        for x in 0..GRID_COLS {
            let text = if x == 0 {
                format!("{:<LABEL_WIDTH$}", row_label(config, const_knob, y))
            } else if y < MATRIX_ROWS {
                let row = RowId::ALL[y];
                let wired = config.columns[x - 1].contains(row);
                format!("{:<CELL_WIDTH$}", if wired { "x" } else { "" })
            } else {
                format!("{:<CELL_WIDTH$}", column_label(config, x - 1))
            };

            let style = if cursor.x == x && cursor.y == y {
                cursor_style
            } else if x == 0 || y == MATRIX_ROWS {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Cyan)
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(ratatui::widgets::Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_around_the_grid() {
        let mut cursor = GridCursor { x: 0, y: 0 };
        cursor.left();
        assert_eq!(cursor.x, GRID_COLS - 1);
        cursor.right();
        assert_eq!(cursor.x, 0);
        cursor.up();
        assert_eq!(cursor.y, GRID_ROWS - 1);
        cursor.down();
        assert_eq!(cursor.y, 0);
    }

    #[test]
    fn cells_classify_by_position() {
        assert_eq!(cell_at(GridCursor { x: 0, y: 0 }), Cell::ConstKnob);
        assert_eq!(cell_at(GridCursor { x: 0, y: 2 }), Cell::TimeShift(1));
        assert_eq!(cell_at(GridCursor { x: 0, y: 5 }), Cell::RowLabel);
        assert_eq!(
            cell_at(GridCursor { x: 1, y: 6 }),
            Cell::Toggle {
                row: RowId::Sum,
                col: 0
            }
        );
        assert_eq!(cell_at(GridCursor { x: 4, y: 7 }), Cell::ColumnLabel);
        assert_eq!(
            cell_at(GridCursor { x: GRID_COLS - 1, y: 7 }),
            Cell::AudioShift
        );
    }
}
