use std::collections::BTreeMap;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize as _},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Paragraph, Widget},
};
use searchlog_analysis::{event::Group, session::SessionLengthDistribution};

use super::{group_color, scale_ratio};

const X_TITLE: &str = "Session Length In Seconds";

/// Widest bar that lets `slots` slots of `bar + gap` fit in `inner` columns.
fn fit_bar_width(inner: u16, slots: usize, gap: u16) -> u16 {
    let slots = u16::try_from(slots).unwrap_or(u16::MAX).max(1);
    (inner / slots).saturating_sub(gap).max(1)
}

fn edge_label(upper: f64) -> String {
    format!("{upper}")
}

/// Session-length shares of group a and group b in two panels sharing the
/// same y-axis maximum.
pub(crate) struct SessionLengthComparisonChart<'a> {
    pub title: &'a str,
    pub by_group: &'a BTreeMap<Group, SessionLengthDistribution>,
    /// Upper bound of the y-axis as a fraction.
    pub y_max: f64,
}

struct SharePanel<'a> {
    group: Group,
    dist: Option<&'a SessionLengthDistribution>,
    y_max: u64,
}

impl Widget for SharePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let color = group_color(self.group);
        let block = Block::bordered()
            .border_style(Style::default().fg(color))
            .title(Line::from(format!("Group {}", self.group)).centered())
            .title_bottom(Line::from(X_TITLE).centered());

        let Some(dist) = self.dist.filter(|dist| dist.total_sessions > 0) else {
            Paragraph::new("no sessions")
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buf);
            return;
        };

        let bar_width = fit_bar_width(block.inner(area).width, dist.bins.len(), 1);
        let bars = dist
            .bins
            .iter()
            .map(|bin| {
                Bar::with_label(edge_label(bin.upper), scale_ratio(bin.fraction))
                    .text_value(format!("{:.0}", bin.fraction * 100.0))
                    .style(Style::default().fg(color))
            })
            .collect::<Vec<_>>();
        let chart = BarChart::new(bars)
            .block(block)
            .bar_width(bar_width)
            .bar_gap(1)
            .max(self.y_max.max(1));
        Widget::render(chart, area, buf);
    }
}

impl Widget for SessionLengthComparisonChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let [header, panels] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        Line::from(format!("{} (%)", self.title))
            .centered()
            .render(header, buf);

        let y_max = scale_ratio(self.y_max);
        let cells = Layout::horizontal([Constraint::Fill(1); Group::ALL.len()]).split(panels);
        for (cell, group) in cells.iter().zip(Group::ALL) {
            SharePanel {
                group,
                dist: self.by_group.get(&group),
                y_max,
            }
            .render(*cell, buf);
        }
    }
}

/// Session counts per length bin with group a and group b side by side.
pub(crate) struct SessionLengthCountChart<'a> {
    pub title: &'a str,
    pub by_group: &'a BTreeMap<Group, SessionLengthDistribution>,
}

impl Widget for SessionLengthCountChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut legend = vec![];
        for group in Group::ALL {
            legend.push(Span::raw("  "));
            legend.push(Span::from("■ ").fg(group_color(group)));
            legend.push(Span::raw(format!("Group {group}")));
        }
        let block = Block::bordered()
            .title(Line::from(self.title).centered())
            .title_bottom(Line::from(X_TITLE).centered());
        let inner = block.inner(area);
        block.render(area, buf);

        let [legend_area, chart_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
        Line::from(legend).render(legend_area, buf);

        // Every distribution shares the same bins; use the first as reference.
        let Some(reference) = self.by_group.values().next() else {
            Paragraph::new("no sessions")
                .alignment(Alignment::Center)
                .render(chart_area, buf);
            return;
        };

        let bar_width = fit_bar_width(chart_area.width, reference.bins.len(), 1) / 2;
        let mut chart = BarChart::default()
            .bar_width(bar_width.max(1))
            .bar_gap(0)
            .group_gap(1);
        for (i, bin) in reference.bins.iter().enumerate() {
            let bars = Group::ALL
                .into_iter()
                .map(|group| {
                    let count = self
                        .by_group
                        .get(&group)
                        .and_then(|dist| dist.bins.get(i))
                        .map_or(0, |bin| bin.count);
                    Bar::default()
                        .value(count)
                        .text_value(count.to_string())
                        .style(Style::default().fg(group_color(group)))
                })
                .collect::<Vec<_>>();
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(edge_label(bin.upper)))
                    .bars(&bars),
            );
        }
        Widget::render(chart, chart_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use searchlog_analysis::session::SessionLengthBin;

    use super::*;
    use crate::chart::render_to_string;

    fn dist(counts: &[u64]) -> SessionLengthDistribution {
        let edges = [0.0, 10.0, 30.0, 60.0];
        let total = counts.iter().sum::<u64>();
        #[expect(clippy::cast_precision_loss)]
        let bins = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| SessionLengthBin {
                lower: edges[i],
                upper: edges[i + 1],
                count,
                fraction: count as f64 / total as f64,
            })
            .collect();
        SessionLengthDistribution {
            bins,
            total_sessions: total,
        }
    }

    #[test]
    fn test_fit_bar_width() {
        assert_eq!(fit_bar_width(48, 15, 1), 2);
        assert_eq!(fit_bar_width(10, 0, 1), 9);
        assert_eq!(fit_bar_width(3, 10, 1), 1);
    }

    #[test]
    fn test_comparison_panels() {
        let by_group = BTreeMap::from([(Group::A, dist(&[2, 1, 1])), (Group::B, dist(&[0, 3, 1]))]);
        let chart = SessionLengthComparisonChart {
            title: "Percentage Of Sessions By Session Length",
            by_group: &by_group,
            y_max: 0.8,
        };
        let text = render_to_string(chart, 100, 24);
        assert!(text.contains("Percentage Of Sessions By Session Length (%)"));
        assert!(text.contains("Group a"));
        assert!(text.contains("Group b"));
        assert!(text.contains(X_TITLE));
        assert!(text.contains("75"));
    }

    #[test]
    fn test_comparison_missing_group() {
        let by_group = BTreeMap::from([(Group::B, dist(&[1, 1, 0]))]);
        let chart = SessionLengthComparisonChart {
            title: "Sessions",
            by_group: &by_group,
            y_max: 0.5,
        };
        let text = render_to_string(chart, 80, 20);
        assert!(text.contains("no sessions"));
        assert!(text.contains("Group b"));
    }

    #[test]
    fn test_count_chart_legend() {
        let by_group = BTreeMap::from([(Group::A, dist(&[4, 12, 1])), (Group::B, dist(&[3, 2, 7]))]);
        let chart = SessionLengthCountChart {
            title: "Session Length Between The Groups",
            by_group: &by_group,
        };
        let text = render_to_string(chart, 60, 20);
        assert!(text.contains("Session Length Between The Groups"));
        assert!(text.contains("Group a"));
        assert!(text.contains("Group b"));
        assert!(text.contains("12"));
        assert!(text.contains("30"));
    }

    #[test]
    fn test_count_chart_empty() {
        let chart = SessionLengthCountChart {
            title: "Session Length Between The Groups",
            by_group: &BTreeMap::new(),
        };
        let text = render_to_string(chart, 50, 8);
        assert!(text.contains("no sessions"));
    }
}
