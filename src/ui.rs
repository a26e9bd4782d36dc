use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use crate::domain::{HELP_TEXT, TableConfig};
use crate::editor::{EditorField, RowEditor};
use crate::model::Model;
use crate::table::FieldKind;
use crate::view::{CellView, Highlight, RowView, Segment, TableView};

pub const STATUS_HEIGHT: u16 = 4;
pub const CONTROLS_HEIGHT: u16 = 1;
pub const CMDLINE_HEIGHT: u16 = 1;
const COLUMN_WIDTH_MARGIN: usize = 2;
const HEADER_TOGGLE: &str = " [x]";
const IMAGE_MARKER: &str = "▣ ";

#[derive(Debug)]
pub struct TableUI {
    max_column_width: usize,
}

impl TableUI {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            max_column_width: config.max_column_width,
        }
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(STATUS_HEIGHT),
                Constraint::Length(CONTROLS_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(CMDLINE_HEIGHT),
            ])
            .split(frame.area());

        let view = model.table().view();
        self.draw_status(model, frame, layout[0]);
        frame.render_widget(Paragraph::new(controls_line(view)), layout[1]);
        self.draw_table(model, view, frame, layout[2]);
        self.draw_cmdline(model, frame, layout[3]);

        if let Some(editor) = model.editor() {
            self.draw_editor(editor, frame);
        }
        if model.show_popup() {
            self.draw_help(frame);
        }
    }

    fn draw_status(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let table = model.table();
        let title = Line::from(" recview ".bold());
        let counts = Line::from(format!(
            " page {}/{} | {} records ",
            table.current_page() + 1,
            table.pages().len().max(1),
            table.total_rows()
        ));
        let block = Block::bordered()
            .title(title)
            .title_bottom(counts.right_aligned())
            .border_set(border::THICK);
        let status = Paragraph::new(table.status().to_string())
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(status, area);
    }

    fn column_width(&self, view: &TableView, idx: usize) -> u16 {
        let header = view.headers[idx].header().chars().count() + HEADER_TOGGLE.len();
        let content = view
            .rows
            .iter()
            .filter_map(|r| r.cells.get(idx))
            .map(cell_width)
            .max()
            .unwrap_or(0);
        let width = std::cmp::min(
            std::cmp::max(header, content) + COLUMN_WIDTH_MARGIN,
            self.max_column_width,
        );
        width as u16
    }

    fn draw_table(&self, model: &Model, view: &TableView, frame: &mut Frame, area: Rect) {
        let header = Row::new(view.headers.iter().map(|c| {
            Cell::from(Line::from(vec![
                Span::raw(c.header()),
                Span::styled(HEADER_TOGGLE, Style::default().fg(Color::DarkGray)),
            ]))
        }))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

        let rows = view.rows.iter().map(table_row);
        let widths: Vec<Constraint> = (0..view.headers.len())
            .map(|idx| Constraint::Length(self.column_width(view, idx)))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::TOP))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .column_highlight_style(Style::default().fg(Color::Cyan))
            .highlight_symbol("> ");

        let mut state = TableState::default();
        if !view.rows.is_empty() {
            state.select(Some(model.curser_row()));
        }
        if !view.headers.is_empty() {
            state.select_column(Some(model.curser_column()));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_cmdline(&self, model: &Model, frame: &mut Frame, area: Rect) {
        if let Some((mode, input)) = model.prompt() {
            let prompt = mode.prompt();
            let line = Line::from(vec![
                Span::styled(prompt, Style::default().fg(Color::Cyan)),
                Span::raw(input.input.clone()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let x = area.x + (prompt.chars().count() + input.curser_pos) as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        } else if !model.notice().is_empty() {
            frame.render_widget(
                Paragraph::new(model.notice().to_string()).fg(Color::Green),
                area,
            );
        } else {
            let hints = Line::from(vec![
                " ?".blue().bold(),
                " help ".into(),
                "/".blue().bold(),
                " filter ".into(),
                "f".blue().bold(),
                " filter column ".into(),
                "x/s".blue().bold(),
                " hide/show ".into(),
                "r".blue().bold(),
                " reset ".into(),
                "Enter".blue().bold(),
                " edit ".into(),
                "q".blue().bold(),
                " quit".into(),
            ]);
            frame.render_widget(Paragraph::new(hints), area);
        }
    }

    fn draw_editor(&self, editor: &RowEditor, frame: &mut Frame) {
        let area = centered_rect(70, 60, frame.area());
        let mut lines = Vec::new();
        for (field, input) in editor.fields() {
            let focused = field == editor.focused();
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let label = format!("{:>12}: ", field.label());
            let mut values = input.value().split('\n');
            lines.push(Line::from(vec![
                Span::styled(label, label_style),
                Span::raw(values.next().unwrap_or_default().to_string()),
            ]));
            if field == EditorField::Memo {
                for value in values {
                    lines.push(Line::from(format!("{:>14}{value}", "")));
                }
            }
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{:>12}: ", "img"), Style::default().fg(Color::DarkGray)),
            Span::raw(editor.img().to_string()).italic(),
        ]));

        let hints = Line::from(vec![
            " Tab".blue().bold(),
            " next ".into(),
            "Alt+Enter".blue().bold(),
            " new memo line ".into(),
            "Enter".blue().bold(),
            " save ".into(),
            "Esc".blue().bold(),
            " cancel ".into(),
        ]);
        let block = Block::bordered()
            .title(format!(" Edit record #{} ", editor.index() + 1))
            .title_bottom(hints.centered())
            .border_set(border::THICK);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn draw_help(&self, frame: &mut Frame) {
        let area = centered_rect(50, 80, frame.area());
        let block = Block::bordered()
            .title(" Help ".bold())
            .title_bottom(Line::from(" Esc to close ").centered());
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(HELP_TEXT).block(block), area);
    }
}

fn controls_line(view: &TableView) -> Line<'static> {
    let mut spans = vec![Span::raw(" Page ")];
    for selector in &view.page_selectors {
        let label = format!(" {} ", selector.index);
        spans.push(if selector.active {
            Span::styled(label, Style::default().add_modifier(Modifier::REVERSED))
        } else {
            Span::raw(label)
        });
    }
    if !view.restore_controls.is_empty() {
        spans.push(Span::raw("  Hidden:"));
        for column in &view.restore_controls {
            spans.push(Span::styled(
                format!(" show-{}", column.key()),
                Style::default().fg(Color::Magenta),
            ));
        }
    }
    Line::from(spans)
}

fn segment_span(segment: &Segment) -> Span<'static> {
    match segment {
        Segment::Plain(s) => Span::raw(s.clone()),
        Segment::Highlight(s, Highlight::Keyword) => {
            Span::styled(s.clone(), Style::default().bg(Color::Yellow).fg(Color::Black))
        }
        Segment::Highlight(s, Highlight::Column) => {
            Span::styled(s.clone(), Style::default().bg(Color::Red).fg(Color::White))
        }
    }
}

fn cell_text(cell: &CellView) -> Text<'static> {
    match cell.kind {
        FieldKind::Image => Line::from(vec![
            Span::raw(IMAGE_MARKER),
            Span::raw(cell.text()).dim(),
        ])
        .into(),
        FieldKind::Text | FieldKind::NamePart | FieldKind::List => cell
            .lines()
            .iter()
            .map(|line| Line::from(line.iter().map(segment_span).collect::<Vec<_>>()))
            .collect::<Vec<Line>>()
            .into(),
    }
}

fn cell_width(cell: &CellView) -> usize {
    let text = cell.text();
    let widest = text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0);
    match cell.kind {
        FieldKind::Image => widest + IMAGE_MARKER.chars().count(),
        _ => widest,
    }
}

fn table_row(row: &RowView) -> Row<'static> {
    Row::new(row.cells.iter().map(|c| Cell::from(cell_text(c)))).height(row.height() as u16)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
