use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::app::Reading;
use crate::format::truncate_unicode;
use crate::system::MemorySummary;
use crate::ui::layout::{Coord, draw_text};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    at: Coord,
    width: usize,
    memory: &Reading<MemorySummary>,
    theme: &Theme,
) {
    let text = Style::default().fg(theme.text_primary);
    let err_style = Style::default().fg(theme.status_err);
    let mut lines: Vec<(String, Style)> = Vec::new();

    match &memory.value {
        Some(summary) => {
            let [phys_total, phys_usage, swap_total, swap_usage] = summary.lines();
            lines.push((phys_total, text.add_modifier(Modifier::BOLD)));
            lines.push((
                phys_usage,
                Style::default().fg(theme.usage_color(summary.physical_usage_percent)),
            ));
            lines.push((swap_total, text.add_modifier(Modifier::BOLD)));
            lines.push((
                swap_usage,
                Style::default().fg(theme.usage_color(summary.swap_usage_percent)),
            ));
            if let Some(err) = &memory.error {
                lines.push((format!("Stale: {err}"), err_style));
            }
        }
        None => {
            let marker = memory.error.as_deref().unwrap_or("n/a");
            lines.push((format!("Memory: {marker}"), err_style));
        }
    }

    for (offset, (line, style)) in lines.iter().enumerate() {
        let coord = at.down(offset as i32);
        if coord.row >= i32::from(area.height) {
            break;
        }
        draw_text(frame, area, coord, &truncate_unicode(line, width), *style);
    }
}
