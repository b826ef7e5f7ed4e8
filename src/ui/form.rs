use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use crate::app::{App, LoginField};
use crate::ui::colors::Palette;
use crate::ui::utils::centered_rect;

pub fn render_login(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let popup = centered_rect(50, 60, area);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" sign in ")
        .border_style(Style::default().fg(p.accent));
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(2), // Hints
            Constraint::Min(1),    // Error
        ])
        .split(popup);

    let blink = (app.loading_tick / 15) % 2 == 0;
    let user_active = app.login_field == LoginField::Username;
    f.render_widget(
        render_input(p, "username", app.input_username.value().to_string(), user_active, blink),
        chunks[0],
    );

    let mask: String = app.input_password.value().chars().map(|_| '*').collect();
    f.render_widget(render_input(p, "password", mask, !user_active, blink), chunks[1]);

    let key_style = Style::default().fg(p.accent);
    let label_style = Style::default().fg(p.text_dim);
    let hints = Line::from(vec![
        Span::styled("tab", key_style),
        Span::styled(" next  ", label_style),
        Span::styled("enter", key_style),
        Span::styled(" sign in  ", label_style),
        Span::styled("esc", key_style),
        Span::styled(" quit", label_style),
    ]);
    f.render_widget(Paragraph::new(hints).alignment(Alignment::Center), chunks[2]);

    if let Some(err) = &app.login_error {
        let error_msg = Paragraph::new(format!(" {}", err))
            .style(Style::default().fg(p.error_fg).bg(p.error_bg).add_modifier(Modifier::BOLD));
        f.render_widget(error_msg, chunks[3]);
    }
}

fn render_input<'a>(p: &Palette, label: &'a str, mut value: String, active: bool, blink: bool) -> Paragraph<'a> {
    if active && blink {
        value.push('▏');
    }
    let (label_style, border) = if active {
        (Style::default().fg(p.accent).add_modifier(Modifier::BOLD), p.accent)
    } else {
        (Style::default().fg(p.text_dim), p.border)
    };
    Paragraph::new(value)
        .style(Style::default().fg(p.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", label), label_style))
                .border_style(Style::default().fg(border)),
        )
}
