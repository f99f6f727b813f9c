pub mod layout;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    field::{Field, ItemKind},
    game::Reason,
    hud::Hud,
    session::{popup_message, Tally},
};

use self::layout::{ScreenLayout, SLOT_WIDTH};

/// Everything drawn in one frame
pub struct Board<'a> {
    pub hud: &'a Hud,
    pub field: &'a Field,
    pub popup: Option<Reason>,
    pub tally: Tally,
}

impl Board<'_> {
    pub fn layout(&self, area: Rect) -> ScreenLayout {
        layout::compute(area, self.field.columns(), self.field.rows())
    }
}

impl Widget for &Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let areas = self.layout(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("clamtap", bold_style.fg(Color::Cyan)),
            Span::styled(format!("   {}", self.tally), dim_style),
        ]))
        .alignment(Alignment::Center);
        header.render(areas.header, buf);

        if self.hud.button_visible {
            Paragraph::new(Span::styled(
                self.hud.button_icon.glyph(),
                bold_style.fg(Color::Yellow),
            ))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .render(areas.button, buf);
        }

        if self.hud.timer_visible {
            Paragraph::new(Span::styled(self.hud.timer_text.as_str(), bold_style))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("time"))
                .render(areas.timer, buf);
        }

        if self.hud.score_visible {
            Paragraph::new(Span::styled(self.hud.score_text.as_str(), bold_style))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("clams"))
                .render(areas.score, buf);
        }

        if areas.field_fits {
            render_field(self.field, &areas, buf);
        } else {
            render_too_small(self.field, &areas, buf);
        }

        if let Some(reason) = self.popup {
            render_popup(reason, areas.popup, buf);
        }

        Paragraph::new(Span::styled(
            "(click)/(space) start·stop   (r)eplay   (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(areas.footer, buf);
    }
}

fn render_field(field: &Field, areas: &ScreenLayout, buf: &mut Buffer) {
    for (cell, kind) in field.items() {
        let slot = areas.slot_rect(cell);
        let glyph = kind.glyph();
        let width = glyph.width() as u16;
        // skip slots the terminal is too small to show whole
        if slot.width < SLOT_WIDTH || slot.height == 0 {
            continue;
        }

        let style = match kind {
            ItemKind::Clam => Style::default().fg(Color::LightYellow),
            ItemKind::Crab => Style::default().fg(Color::Red),
        };
        buf.set_string(slot.x + (slot.width - width) / 2, slot.y, glyph, style);
    }
}

fn render_too_small(field: &Field, areas: &ScreenLayout, buf: &mut Buffer) {
    let (width, height) = layout::field_size(field.columns(), field.rows());
    Paragraph::new(vec![
        Line::from(Span::styled(
            "terminal too small",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("the field needs {width}x{height}, resize to play")),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(areas.field_area, buf);
}

fn render_popup(reason: Reason, area: Rect, buf: &mut Buffer) {
    let accent = match reason {
        Reason::Win => Color::Green,
        Reason::Lose => Color::Red,
        Reason::Cancel => Color::Yellow,
    };

    Clear.render(area, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            popup_message(reason),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "click here or (r) to replay",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent)),
    )
    .render(area, buf);
}
