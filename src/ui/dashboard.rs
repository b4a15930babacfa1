use crate::analysis::{format_impact, ResultStatus};
use crate::resolve::VolumeSource;
use crate::ui::app::{App, FocusPanel, IssueKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table,
    },
    Frame,
};

// Brand colors
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C);
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0);
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68);
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C);
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65);

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const WARNING_COLOR: Color = BRAND_ORANGE;
const IMPACT_COLOR: Color = BRAND_GREEN;

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Main content
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);
    draw_footer(
        frame,
        chunks[2],
        " ←→ Panel | ↑↓ Select | Enter Elements | q Quit ",
    );
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " IFC LCA | {} | {} elements | {} materials | Total: {} ",
        app.project_name,
        app.total_elements,
        app.report.results.len(),
        format_impact(app.report.total_impact())
    );

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(70), // Results
        Constraint::Percentage(30), // Issues
    ])
    .split(area);

    draw_results(frame, chunks[0], app);
    draw_issues(frame, chunks[1], app);
}

fn focus_border(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

fn draw_results(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Results;
    let results = app.ranked_results();

    // Borders and header row
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll_offset = if app.selected_result >= visible_rows {
        app.selected_result - visible_rows + 1
    } else {
        0
    };

    let header = Row::new(vec![
        "Material", "Record", "Elements", "Volume", "Mass", "Impact", "Share", "Status",
    ])
    .style(HEADER_STYLE)
    .height(1);

    let rows: Vec<Row> = results
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, result)| {
            let is_selected = i == app.selected_result;
            let style = if is_selected && is_focused {
                SELECTED_STYLE
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else if result.status == ResultStatus::Computed {
                Style::default()
            } else {
                Style::default().fg(WARNING_COLOR)
            };

            Row::new(vec![
                result.material.clone(),
                result.record_name.clone(),
                format!("{}/{}", result.elements_with_volume, result.element_count),
                format!("{:.2} m³", result.total_volume),
                format!("{:.0} kg", result.total_mass),
                format_impact(result.total_impact),
                format!("{:.1}%", app.impact_share(result)),
                result.status.label().to_string(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(18),
        Constraint::Percentage(22),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(17),
        Constraint::Length(7),
        Constraint::Min(10),
    ];

    let title = format!(" Results ({} materials) ", results.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_border(is_focused)),
    );

    frame.render_widget(table, area);

    if results.len() > visible_rows {
        draw_scrollbar(frame, area, results.len(), app.selected_result);
    }
}

fn draw_issues(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Issues;

    let mut items: Vec<ListItem> = app
        .issues()
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let is_selected = i == app.selected_issue;
            let style = if is_selected && is_focused {
                SELECTED_STYLE
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let tag = match issue.kind {
                IssueKind::MissingRecord => "missing ",
                IssueKind::ZeroImpact => "zero    ",
                IssueKind::Unmapped => "unmapped",
            };
            let marker = if is_selected && is_focused { " ◄" } else { "" };

            ListItem::new(Line::from(vec![
                Span::styled(tag, Style::default().fg(WARNING_COLOR)),
                Span::raw(" "),
                Span::styled(issue.text.as_str(), style),
                Span::styled(marker, Style::default().fg(BRAND_ORANGE)),
            ]))
        })
        .collect();

    if app.skipped_records > 0 {
        items.push(ListItem::new(Span::styled(
            format!("{} database records skipped", app.skipped_records),
            Style::default().fg(BRAND_MUTED),
        )));
    }

    let title = format!(" Issues ({}) ", app.issues().len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_border(is_focused)),
    );

    frame.render_widget(list, area);
}

fn draw_scrollbar(frame: &mut Frame, area: Rect, len: usize, position: usize) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut scrollbar_state = ScrollbarState::new(len).position(position);

    let scrollbar_area = Rect {
        x: area.x + area.width - 1,
        y: area.y + 2,
        width: 1,
        height: area.height.saturating_sub(3),
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str) {
    let footer = Paragraph::new(help)
        .style(Style::default().fg(BRAND_MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn volume_source_label(source: &VolumeSource) -> String {
    match source {
        VolumeSource::Declared { group, key } => format!("{group}.{key}"),
        VolumeSource::SurfaceAreaApproximation {
            group,
            key,
            thickness,
        } => format!("≈ {group}.{key} × {thickness} m"),
        VolumeSource::Dimensions {
            height,
            width,
            length,
        } => format!("≈ {height} × {width} × {length}"),
        VolumeSource::None => "-".to_string(),
    }
}

pub fn draw_material_detail(frame: &mut Frame, app: &App) {
    let Some(result) = app.selected_material() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header: material → record
        Constraint::Length(3), // Totals
        Constraint::Min(6),    // Element contributions (scrollable)
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let header = Paragraph::new(format!(
        " {} → {} [{}] ",
        result.material, result.record_name, result.record_id
    ))
    .style(HEADER_STYLE)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let mut info = vec![
        Span::raw(format!(
            "{}  |  {:.0} kg/m³  |  {} kg CO₂-eq/kg  |  {:.2} m³  |  {:.0} kg  |  ",
            result.category, result.density, result.impact_per_kg, result.total_volume, result.total_mass
        )),
        Span::styled(
            format_impact(result.total_impact),
            Style::default().fg(IMPACT_COLOR).add_modifier(Modifier::BOLD),
        ),
    ];
    if result.status != ResultStatus::Computed {
        info.push(Span::styled(
            format!("  ({})", result.status.label()),
            Style::default().fg(WARNING_COLOR),
        ));
    }
    let info_widget =
        Paragraph::new(Line::from(info)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(info_widget, chunks[1]);

    let contributions = app.selected_contributions();
    let visible_rows = (chunks[2].height as usize).saturating_sub(3);

    let rows: Vec<Row> = contributions
        .iter()
        .skip(app.contribution_scroll_offset)
        .take(visible_rows)
        .map(|contribution| {
            let style = if contribution.volume > 0.0 {
                Style::default()
            } else {
                Style::default().fg(BRAND_MUTED)
            };
            Row::new(vec![
                format!("#{}", contribution.element_id),
                contribution.entity_type.clone(),
                contribution.name.clone(),
                format!("{:.3}", contribution.volume),
                volume_source_label(&contribution.source),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Percentage(18),
        Constraint::Percentage(32),
        Constraint::Length(10),
        Constraint::Min(20),
    ];
    let table_header =
        Row::new(vec!["ID", "Entity", "Name", "Volume", "Source"]).style(HEADER_STYLE);

    let table = Table::new(rows, widths).header(table_header).block(
        Block::default()
            .title(format!(
                " Elements ({} with volume of {}) ",
                result.elements_with_volume, result.element_count
            ))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, chunks[2]);

    if contributions.len() > visible_rows {
        draw_scrollbar(
            frame,
            chunks[2],
            contributions.len(),
            app.contribution_scroll_offset,
        );
    }

    draw_footer(
        frame,
        chunks[3],
        " Esc Back | ↑↓ Scroll | ←→ Material | q Quit ",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn approximated_sources_are_marked() {
        assert_eq!(
            volume_source_label(&VolumeSource::Declared {
                group: "Qto_WallBaseQuantities".to_string(),
                key: "NetVolume".to_string(),
            }),
            "Qto_WallBaseQuantities.NetVolume"
        );
        assert_eq!(
            volume_source_label(&VolumeSource::SurfaceAreaApproximation {
                group: "Qto_SlabBaseQuantities".to_string(),
                key: "NetArea".to_string(),
                thickness: 0.2,
            }),
            "≈ Qto_SlabBaseQuantities.NetArea × 0.2 m"
        );
        assert_eq!(volume_source_label(&VolumeSource::None), "-");
    }
}
