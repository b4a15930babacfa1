use crate::analysis::{AggregationReport, ElementContribution, MaterialResult};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Dashboard,
    MaterialDetail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Results,
    Issues,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IssueKind {
    /// A model material with no database record.
    Unmapped,
    /// A mapping to a record id the database does not have.
    MissingRecord,
    /// A mapped material whose impact stayed zero.
    ZeroImpact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub kind: IssueKind,
    pub text: String,
}

pub struct App {
    pub report: AggregationReport,
    pub project_name: String,
    pub total_elements: usize,
    pub skipped_records: usize,
    pub view: View,
    pub focus_panel: FocusPanel,
    pub selected_result: usize,
    pub selected_issue: usize,
    pub contribution_scroll_offset: usize,
    pub should_quit: bool,
    ranked: Vec<String>, // material names, highest impact first
    issues: Vec<Issue>,
}

impl App {
    #[must_use]
    pub fn new(report: AggregationReport) -> Self {
        let ranked = report
            .ranked()
            .iter()
            .map(|result| result.material.clone())
            .collect();
        let issues = collect_issues(&report);

        Self {
            report,
            project_name: String::new(),
            total_elements: 0,
            skipped_records: 0,
            view: View::Dashboard,
            focus_panel: FocusPanel::Results,
            selected_result: 0,
            selected_issue: 0,
            contribution_scroll_offset: 0,
            should_quit: false,
            ranked,
            issues,
        }
    }

    #[must_use]
    pub fn with_model(mut self, project_name: impl Into<String>, total_elements: usize) -> Self {
        self.project_name = project_name.into();
        self.total_elements = total_elements;
        self
    }

    #[must_use]
    pub fn with_skipped_records(mut self, skipped_records: usize) -> Self {
        self.skipped_records = skipped_records;
        self
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => super::dashboard::draw_dashboard(frame, self),
            View::MaterialDetail => super::dashboard::draw_material_detail(frame, self),
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            self.handle_key(key.code);
        }
        Ok(())
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) {
        match self.view {
            View::Dashboard => self.handle_dashboard_keys(code),
            View::MaterialDetail => self.handle_detail_keys(code),
        }
    }

    fn handle_dashboard_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Left | KeyCode::Char('h') => self.focus_panel = FocusPanel::Results,
            KeyCode::Right | KeyCode::Char('l') => self.focus_panel = FocusPanel::Issues,
            KeyCode::Tab => {
                self.focus_panel = match self.focus_panel {
                    FocusPanel::Results => FocusPanel::Issues,
                    FocusPanel::Issues => FocusPanel::Results,
                };
            }
            KeyCode::Enter => self.enter_material_detail(),
            _ => {}
        }
    }

    fn handle_detail_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => {
                self.view = View::Dashboard;
                self.contribution_scroll_offset = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.contribution_scroll_offset = self.contribution_scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_contributions_down(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_material_in_detail(),
            KeyCode::Right | KeyCode::Char('l') => self.next_material_in_detail(),
            _ => {}
        }
    }

    fn navigate_up(&mut self) {
        let selected = match self.focus_panel {
            FocusPanel::Results => &mut self.selected_result,
            FocusPanel::Issues => &mut self.selected_issue,
        };
        *selected = selected.saturating_sub(1);
    }

    fn navigate_down(&mut self) {
        let (selected, count) = match self.focus_panel {
            FocusPanel::Results => (&mut self.selected_result, self.ranked.len()),
            FocusPanel::Issues => (&mut self.selected_issue, self.issues.len()),
        };
        if *selected < count.saturating_sub(1) {
            *selected += 1;
        }
    }

    fn enter_material_detail(&mut self) {
        if self.focus_panel == FocusPanel::Results && self.selected_material().is_some() {
            self.view = View::MaterialDetail;
            self.contribution_scroll_offset = 0;
        }
    }

    fn scroll_contributions_down(&mut self) {
        let max = self.selected_contributions().len().saturating_sub(1);
        if self.contribution_scroll_offset < max {
            self.contribution_scroll_offset += 1;
        }
    }

    /// Previous material in Detail view (wrap around)
    fn previous_material_in_detail(&mut self) {
        let count = self.ranked.len();
        if count == 0 {
            return;
        }
        self.selected_result = if self.selected_result > 0 {
            self.selected_result - 1
        } else {
            count - 1
        };
        self.contribution_scroll_offset = 0;
    }

    /// Next material in Detail view (wrap around)
    fn next_material_in_detail(&mut self) {
        let count = self.ranked.len();
        if count == 0 {
            return;
        }
        self.selected_result = (self.selected_result + 1) % count;
        self.contribution_scroll_offset = 0;
    }

    /// Results ranked by total impact, highest first.
    #[must_use]
    pub fn ranked_results(&self) -> Vec<&MaterialResult> {
        self.ranked
            .iter()
            .filter_map(|material| self.report.results.get(material))
            .collect()
    }

    #[must_use]
    pub fn selected_material(&self) -> Option<&MaterialResult> {
        self.ranked
            .get(self.selected_result)
            .and_then(|material| self.report.results.get(material))
    }

    #[must_use]
    pub fn selected_contributions(&self) -> &[ElementContribution] {
        self.selected_material()
            .map(|result| result.contributions.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Share of the total impact, in percent.
    #[must_use]
    pub fn impact_share(&self, result: &MaterialResult) -> f64 {
        let total = self.report.total_impact();
        if total > 0.0 {
            result.total_impact / total * 100.0
        } else {
            0.0
        }
    }
}

fn collect_issues(report: &AggregationReport) -> Vec<Issue> {
    let unmapped = report.unmapped_materials.iter().map(|usage| Issue {
        kind: IssueKind::Unmapped,
        text: format!("{} ({} elements)", usage.name, usage.element_count),
    });
    let missing = report.unresolved_mappings.iter().map(|unresolved| Issue {
        kind: IssueKind::MissingRecord,
        text: format!("{} → {}", unresolved.material, unresolved.record_id),
    });
    let zero = report
        .ranked()
        .into_iter()
        .filter(|result| result.total_impact == 0.0)
        .map(|result| {
            let reason = if result.elements_with_volume == 0 {
                "no volume"
            } else {
                result.status.label()
            };
            Issue {
                kind: IssueKind::ZeroImpact,
                text: format!("{}: {reason}", result.material),
            }
        });

    missing.chain(zero).chain(unmapped).collect()
}
