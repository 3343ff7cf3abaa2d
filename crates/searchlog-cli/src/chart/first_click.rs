use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, Block, Paragraph, Widget},
};
use searchlog_analysis::first_click::DailyFirstClickCounts;

const COLUMNS: usize = 2;

/// Grid of per-day panels, each a bar chart of first-click counts by result
/// position. All panels share the same y-axis maximum.
pub(crate) struct DailyFirstClickChart<'a> {
    pub days: &'a [DailyFirstClickCounts],
    pub y_max: u64,
}

struct DayPanel<'a> {
    day: &'a DailyFirstClickCounts,
    y_max: u64,
}

impl Widget for DayPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block = Block::bordered()
            .title(Line::from(self.day.day.to_string()).centered())
            .title_bottom(Line::from("Result Position").centered());

        if self.day.counts.is_empty() {
            Paragraph::new("no clicks")
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buf);
            return;
        }

        let bars = self
            .day
            .counts
            .iter()
            .map(|&(position, count)| {
                Bar::with_label(position.to_string(), count)
                    .text_value(count.to_string())
                    .style(Style::default().fg(Color::Cyan))
            })
            .collect::<Vec<_>>();
        let chart = BarChart::new(bars)
            .block(block)
            .bar_width(3)
            .bar_gap(1)
            .max(self.y_max.max(1));
        Widget::render(chart, area, buf);
    }
}

impl Widget for DailyFirstClickChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let [header, grid] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        Line::from("Sessions by first clicked result position")
            .centered()
            .render(header, buf);

        if self.days.is_empty() {
            Paragraph::new("no first clicks")
                .alignment(Alignment::Center)
                .render(grid, buf);
            return;
        }

        let rows = self.days.len().div_ceil(COLUMNS);
        let row_areas = Layout::vertical(vec![Constraint::Fill(1); rows]).split(grid);
        for (row_area, days) in row_areas.iter().zip(self.days.chunks(COLUMNS)) {
            let cells = Layout::horizontal([Constraint::Fill(1); COLUMNS]).split(*row_area);
            for (cell, day) in cells.iter().zip(days) {
                DayPanel {
                    day,
                    y_max: self.y_max,
                }
                .render(*cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::chart::render_to_string;

    fn day(d: u32, counts: Vec<(u32, u64)>) -> DailyFirstClickCounts {
        DailyFirstClickCounts {
            day: NaiveDate::from_ymd_opt(2016, 3, d).unwrap(),
            counts,
        }
    }

    #[test]
    fn test_one_panel_per_day() {
        let days = vec![
            day(1, vec![(1, 120), (2, 40), (3, 9)]),
            day(2, vec![(1, 80)]),
            day(3, vec![]),
        ];
        let chart = DailyFirstClickChart {
            days: &days,
            y_max: 150,
        };
        let text = render_to_string(chart, 80, 40);
        assert!(text.contains("2016-03-01"));
        assert!(text.contains("2016-03-02"));
        assert!(text.contains("2016-03-03"));
        assert!(text.contains("no clicks"));
        assert!(text.contains("Result Position"));
        assert!(text.contains("120"));
    }

    #[test]
    fn test_no_days() {
        let chart = DailyFirstClickChart {
            days: &[],
            y_max: 100,
        };
        let text = render_to_string(chart, 40, 6);
        assert!(text.contains("no first clicks"));
    }
}
