//! Rendering for the contact list screen.
//!
//! Pure consumer of the controller's view model: nothing in here mutates
//! state. Layout is header, search bar, contact table, footer.

use crate::controller::ContactListView;
use crate::styles::{focused_border_style, theme, unfocused_border_style};
use crate::widgets::TextInput;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

// UI labels
const TITLE: &str = "Contacts";
const SEARCH_LABEL: &str = "Search";
const SEARCH_PLACEHOLDER: &str = "Type to filter by name, email, or phone";
const EMPTY_STATE: &str = "No contacts to display.";
const INACTIVE_STATE: &str =
    "No account selected.\n\nPass an account id on the command line or set one in the config file.";
const LOADING_MESSAGE: &str = "Loading contacts...";
const PAGE_LABEL: &str = "Page";
const PREV_LABEL: &str = "PgUp: prev";
const NEXT_LABEL: &str = "PgDn: next";
const QUIT_LABEL: &str = "Esc: quit";

// Column labels
const COL_NAME: &str = "Name";
const COL_TITLE: &str = "Title";
const COL_EMAIL: &str = "Email";
const COL_PHONE: &str = "Phone";
const COL_ACCOUNT: &str = "Primary Account";

/// Render the whole screen.
///
/// `active` is false when no account id is configured; the widget then shows
/// an inactive placeholder instead of the table.
pub fn render(frame: &mut Frame, view: &ContactListView, search: &TextInput, active: bool) {
    let area = frame.area();
    let [header_area, search_area, content_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area, view);
    render_search_bar(frame, search_area, search, active);
    if active {
        render_contacts(frame, content_area, view);
    } else {
        render_inactive(frame, content_area);
    }
    render_footer(frame, footer_area, view);
}

fn render_header(frame: &mut Frame, area: Rect, view: &ContactListView) {
    let t = theme();
    let mut title = vec![Span::styled(TITLE, t.title_style())];
    if view.loading {
        title.push(Span::styled(format!("  {LOADING_MESSAGE}"), t.muted_style()));
    }
    let header = Paragraph::new(Line::from(title))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(unfocused_border_style()));
    frame.render_widget(header, area);
}

fn render_search_bar(frame: &mut Frame, area: Rect, search: &TextInput, active: bool) {
    let t = theme();
    let (display, style) = if search.is_empty() {
        (SEARCH_PLACEHOLDER, t.muted_style())
    } else {
        (search.text(), t.text_style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(SEARCH_LABEL)
        .border_style(if active {
            focused_border_style()
        } else {
            unfocused_border_style()
        });
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(display).style(style).block(block), area);

    // Cursor only while the widget accepts input
    if active {
        let x = inner.x + search.cursor().min(inner.width as usize) as u16;
        frame.set_cursor_position((x, inner.y));
    }
}

fn render_contacts(frame: &mut Frame, area: Rect, view: &ContactListView) {
    let t = theme();

    if !view.has_results {
        let message = if view.loading { LOADING_MESSAGE } else { EMPTY_STATE };
        let empty = Paragraph::new(message)
            .style(t.muted_style())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(unfocused_border_style())
                    .padding(Padding::new(2, 2, 1, 1)),
            );
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new([COL_NAME, COL_TITLE, COL_EMAIL, COL_PHONE, COL_ACCOUNT])
        .style(t.header_row_style())
        .bottom_margin(1);

    let rows = view.visible_rows.iter().map(|row| {
        Row::new([
            // Name doubles as the link target; styled like one
            Cell::from(Span::styled(row.record.name.clone(), t.link_style())),
            Cell::from(row.record.title.clone()),
            Cell::from(row.record.email.clone()),
            Cell::from(row.record.phone.clone()),
            Cell::from(row.record.account_name.clone()),
        ])
        .style(t.text_style())
    });

    let widths = [
        Constraint::Percentage(24),
        Constraint::Percentage(18),
        Constraint::Percentage(24),
        Constraint::Percentage(14),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(Style::default().bg(t.highlight_bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(unfocused_border_style()),
        );
    frame.render_widget(table, area);
}

fn render_inactive(frame: &mut Frame, area: Rect) {
    let t = theme();
    let message = Paragraph::new(INACTIVE_STATE)
        .style(t.muted_style())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(unfocused_border_style())
                .padding(Padding::new(2, 2, 2, 2)),
        );
    frame.render_widget(message, area);
}

fn render_footer(frame: &mut Frame, area: Rect, view: &ContactListView) {
    let t = theme();
    let nav_style = |disabled: bool| {
        if disabled {
            t.muted_style()
        } else {
            t.text_style()
        }
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {PAGE_LABEL} {} of {} ", view.page, view.total_pages),
            t.text_style(),
        ),
        Span::styled("│ ", t.muted_style()),
        Span::styled(PREV_LABEL, nav_style(view.prev_disabled)),
        Span::raw("  "),
        Span::styled(NEXT_LABEL, nav_style(view.next_disabled)),
        Span::styled("  │ ", t.muted_style()),
        Span::styled(QUIT_LABEL, t.muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
