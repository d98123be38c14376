//! Relative positioning and clamped text drawing.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Row/column offset inside an area. Signed so out-of-range positions can be
/// expressed before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Self {
        Coord { row, col }
    }

    pub fn down(self, rows: i32) -> Self {
        Coord {
            row: self.row + rows,
            col: self.col,
        }
    }
}

/// Scales the area's dimensions by the ratios. Not clamped: a ratio of 1.0
/// lands one past the last row/column.
pub fn relative_coord(area: Rect, row_ratio: f32, col_ratio: f32) -> Coord {
    Coord {
        row: (f32::from(area.height) * row_ratio) as i32,
        col: (f32::from(area.width) * col_ratio) as i32,
    }
}

pub fn clamp_coord(area: Rect, coord: Coord) -> Coord {
    let max_row = i32::from(area.height) - 1;
    let max_col = i32::from(area.width) - 1;
    Coord {
        row: coord.row.min(max_row).max(0),
        col: coord.col.min(max_col).max(0),
    }
}

/// Draws one line of text at `coord` (clamped into `area`), clipped at the
/// right edge of the area.
pub fn draw_text(frame: &mut Frame, area: Rect, coord: Coord, text: &str, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let at = clamp_coord(area, coord);
    let (row, col) = (at.row as u16, at.col as u16);
    let target = Rect::new(area.x + col, area.y + row, area.width - col, 1);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text.to_string(), style))),
        target,
    );
}
