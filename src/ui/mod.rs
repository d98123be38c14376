pub mod cpu_panel;
pub mod header;
pub mod layout;
pub mod memory_panel;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::App;
use crate::ui::layout::{Coord, clamp_coord, relative_coord};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        app.sampler.phase(),
        app.refresh_ms,
        &app.theme,
    );

    let content = chunks[1];
    let (cpu_row, cpu_col) = app.anchors.cpu;
    let (mem_row, mem_col) = app.anchors.memory;
    let cpu_at = relative_coord(content, cpu_row, cpu_col);
    let mem_at = relative_coord(content, mem_row, mem_col);
    let (cpu_width, mem_width) = panel_widths(content, cpu_at, mem_at);

    cpu_panel::render(
        frame,
        content,
        cpu_at,
        cpu_width,
        &app.descriptor,
        &app.cpu,
        &app.theme,
    );
    memory_panel::render(frame, content, mem_at, mem_width, &app.memory, &app.theme);

    statusbar::render(frame, chunks[2], &app.keybinds, &app.theme);
}

/// Each panel may use the columns up to the next panel to its right, or to
/// the area edge.
fn panel_widths(area: Rect, cpu: Coord, mem: Coord) -> (usize, usize) {
    let cpu_col = clamp_coord(area, cpu).col;
    let mem_col = clamp_coord(area, mem).col;
    let right = i32::from(area.width);
    let span = |from: i32, other: i32| {
        let end = if other > from { other - 1 } else { right };
        (end - from).max(1) as usize
    };
    (span(cpu_col, mem_col), span(mem_col, cpu_col))
}
