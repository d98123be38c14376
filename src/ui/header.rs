use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::system::SamplerPhase;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    phase: SamplerPhase,
    refresh_ms: u64,
    theme: &Theme,
) {
    let state = match phase {
        SamplerPhase::Uninitialized => "starting",
        SamplerPhase::Primed => "priming",
        SamplerPhase::Steady => "live",
    };

    let line = Line::from(vec![
        Span::styled(
            " procmon ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(state, Style::default().fg(theme.text_secondary)),
        Span::raw("  "),
        Span::styled(
            format!("every {refresh_ms} ms"),
            Style::default().fg(theme.text_secondary),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
