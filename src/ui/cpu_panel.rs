use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::app::Reading;
use crate::format::{truncate_unicode, usage_line};
use crate::system::{CpuUtilization, ProcessorDescriptor};
use crate::ui::layout::{Coord, draw_text};
use crate::ui::theme::Theme;

/// Label column plus percentage plus the bar brackets.
const LINE_OVERHEAD: usize = 16;
const MAX_BAR_WIDTH: usize = 20;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    at: Coord,
    width: usize,
    descriptor: &ProcessorDescriptor,
    cpu: &Reading<CpuUtilization>,
    theme: &Theme,
) {
    let mut lines: Vec<(String, Style)> = Vec::new();
    let text = Style::default().fg(theme.text_primary);
    let secondary = Style::default().fg(theme.text_secondary);

    lines.push((
        truncate_unicode(&format!("CPU: {}", descriptor.name), width),
        text.add_modifier(Modifier::BOLD),
    ));
    lines.push((
        truncate_unicode(
            &format!(
                "Cores: {}  Threads: {}",
                descriptor.physical_cores, descriptor.logical_threads
            ),
            width,
        ),
        secondary,
    ));

    if let Some(err) = &cpu.error {
        let label = if cpu.is_stale() { "Stale" } else { "Error" };
        lines.push((
            truncate_unicode(&format!("{label}: {err}"), width),
            Style::default().fg(theme.status_err),
        ));
    }

    match &cpu.value {
        None => lines.push(("Sampling\u{2026}".to_string(), secondary)),
        Some(usage) => {
            let bar = width.saturating_sub(LINE_OVERHEAD).min(MAX_BAR_WIDTH);
            lines.push((
                truncate_unicode(&usage_line("total", usage.aggregate, bar), width),
                Style::default()
                    .fg(theme.usage_color(usage.aggregate))
                    .add_modifier(Modifier::BOLD),
            ));
            for (i, pct) in usage.per_thread.iter().enumerate() {
                lines.push((
                    truncate_unicode(&usage_line(&format!("cpu{i}"), *pct, bar), width),
                    Style::default().fg(theme.usage_color(*pct)),
                ));
            }
        }
    }

    for (offset, (line, style)) in lines.iter().enumerate() {
        let coord = at.down(offset as i32);
        if coord.row >= i32::from(area.height) {
            break;
        }
        draw_text(frame, area, coord, line, *style);
    }
}
