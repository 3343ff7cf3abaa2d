use std::collections::BTreeMap;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, Block, Widget},
};
use searchlog_analysis::event::Group;

use super::{group_color, scale_ratio};

/// One bar per group plus an "ungrouped" bar, labelled with percentages.
pub(crate) struct GroupedRateChart<'a> {
    pub title: &'a str,
    pub by_group: &'a BTreeMap<Group, f64>,
    pub ungrouped: Option<f64>,
}

fn rate_bar(label: String, value: f64, color: Color) -> Bar<'static> {
    Bar::with_label(label, scale_ratio(value))
        .text_value(format!("{:.1}%", value * 100.0))
        .style(Style::default().fg(color))
}

impl Widget for GroupedRateChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut bars = Group::ALL
            .into_iter()
            .filter_map(|group| {
                let value = *self.by_group.get(&group)?;
                Some(rate_bar(format!("group {group}"), value, group_color(group)))
            })
            .collect::<Vec<_>>();
        if let Some(value) = self.ungrouped {
            bars.push(rate_bar("ungrouped".to_string(), value, Color::Gray));
        }

        let chart = BarChart::new(bars)
            .block(Block::bordered().title(Line::from(self.title).centered()))
            .bar_width(11)
            .bar_gap(4);
        Widget::render(chart, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render_to_string;

    #[test]
    fn test_labels_and_values() {
        let by_group = BTreeMap::from([(Group::A, 0.5), (Group::B, 0.125)]);
        let chart = GroupedRateChart {
            title: "Click-through rate",
            by_group: &by_group,
            ungrouped: Some(0.3),
        };
        let text = render_to_string(chart, 60, 20);
        assert!(text.lines().next().unwrap().contains("Click-through rate"));
        assert!(text.contains("group a"));
        assert!(text.contains("group b"));
        assert!(text.contains("ungrouped"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("12.5%"));
    }

    #[test]
    fn test_missing_group_is_skipped() {
        let by_group = BTreeMap::from([(Group::B, 0.2)]);
        let chart = GroupedRateChart {
            title: "Zero results rate",
            by_group: &by_group,
            ungrouped: None,
        };
        let text = render_to_string(chart, 60, 20);
        assert!(!text.contains("group a"));
        assert!(text.contains("group b"));
        assert!(!text.contains("ungrouped"));
    }
}
