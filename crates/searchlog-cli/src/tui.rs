//! Interactive chart viewer

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Style, Stylize as _},
    text::Line,
    widgets::Tabs,
};

use crate::chart::Chart;

#[derive(Debug)]
struct ChartViewer {
    charts: Vec<Chart>,
    selected: usize,
    exiting: bool,
}

impl ChartViewer {
    fn new(charts: Vec<Chart>) -> Self {
        Self {
            charts,
            selected: 0,
            exiting: false,
        }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.exiting {
            terminal.draw(|f| self.draw(f))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [tabs_area, chart_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let tabs = Tabs::new(self.charts.iter().map(Chart::title))
            .select(self.selected)
            .highlight_style(Style::default().bold().reversed());
        frame.render_widget(tabs, tabs_area);

        if let Some(chart) = self.charts.get(self.selected) {
            frame.render_widget(chart, chart_area);
        }

        let help = Line::from("←/→ or Tab: switch chart  q/Esc: quit").dim();
        frame.render_widget(help, help_area);
    }

    fn handle_events(&mut self) -> anyhow::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        let count = self.charts.len();
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exiting = true,
            KeyCode::Right | KeyCode::Tab if count > 0 => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Left | KeyCode::BackTab if count > 0 => {
                self.selected = (self.selected + count - 1) % count;
            }
            _ => {}
        }
    }
}

pub(crate) fn run(charts: Vec<Chart>) -> anyhow::Result<()> {
    let mut viewer = ChartViewer::new(charts);
    ratatui::run(|terminal| viewer.run(terminal))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};
    use searchlog_analysis::event::Group;

    use super::*;

    fn sample_viewer() -> ChartViewer {
        ChartViewer::new(vec![
            Chart::Rate {
                title: "Average daily click-through rate".to_string(),
                by_group: BTreeMap::from([(Group::A, 0.4), (Group::B, 0.2)]),
                ungrouped: Some(0.3),
            },
            Chart::SessionCounts {
                by_group: BTreeMap::new(),
            },
        ])
    }

    fn press(viewer: &mut ChartViewer, code: KeyCode) {
        viewer.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_switch_charts() {
        let mut viewer = sample_viewer();
        press(&mut viewer, KeyCode::Right);
        assert_eq!(viewer.selected, 1);
        press(&mut viewer, KeyCode::Tab);
        assert_eq!(viewer.selected, 0);
        press(&mut viewer, KeyCode::Left);
        assert_eq!(viewer.selected, 1);
        press(&mut viewer, KeyCode::BackTab);
        assert_eq!(viewer.selected, 0);
        assert!(!viewer.exiting);
    }

    #[test]
    fn test_quit() {
        let mut viewer = sample_viewer();
        press(&mut viewer, KeyCode::Char('q'));
        assert!(viewer.exiting);

        let mut viewer = sample_viewer();
        press(&mut viewer, KeyCode::Esc);
        assert!(viewer.exiting);
    }

    #[test]
    fn test_no_charts() {
        let mut viewer = ChartViewer::new(vec![]);
        press(&mut viewer, KeyCode::Right);
        assert_eq!(viewer.selected, 0);

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|f| viewer.draw(f)).unwrap();
    }

    #[test]
    fn test_draw_selected_chart() {
        let viewer = sample_viewer();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| viewer.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let text = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Session Length Between The Groups"));
        assert!(text.contains("ungrouped"));
        assert!(text.contains("q/Esc: quit"));
    }
}
