//! Bar charts of search-log summaries
//!
//! Each chart is a `ratatui` widget, so the same code draws into the
//! interactive viewer and into an off-screen buffer for `--print`.

use std::collections::BTreeMap;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};
use searchlog_analysis::{
    event::Group, first_click::DailyFirstClickCounts, session::SessionLengthDistribution,
};

pub(crate) use self::{
    first_click::DailyFirstClickChart,
    rate::GroupedRateChart,
    session_length::{SessionLengthComparisonChart, SessionLengthCountChart},
};

mod first_click;
mod rate;
mod session_length;

/// Bar values are integers; ratios are drawn in units of 1/10000.
const RATIO_SCALE: f64 = 10_000.0;

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_ratio(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value * RATIO_SCALE).round() as u64
    } else {
        0
    }
}

fn group_color(group: Group) -> Color {
    match group {
        Group::A => Color::Blue,
        Group::B => Color::Red,
    }
}

/// Chart data ready to draw.
#[derive(Debug, Clone)]
pub(crate) enum Chart {
    /// Per-group value plus the ungrouped reference value.
    Rate {
        title: String,
        by_group: BTreeMap<Group, f64>,
        ungrouped: Option<f64>,
    },
    /// One panel per day of first-click position counts.
    FirstClicks {
        days: Vec<DailyFirstClickCounts>,
        y_max: u64,
    },
    /// Side-by-side session-length shares of group a and group b.
    SessionLength {
        title: String,
        by_group: BTreeMap<Group, SessionLengthDistribution>,
        y_max: f64,
    },
    /// Session-length counts of both groups in one chart.
    SessionCounts {
        by_group: BTreeMap<Group, SessionLengthDistribution>,
    },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Rate { title, .. } | Chart::SessionLength { title, .. } => title,
            Chart::FirstClicks { .. } => "First Click Position By Day",
            Chart::SessionCounts { .. } => "Session Length Between The Groups",
        }
    }
}

impl Widget for &Chart {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        match self {
            Chart::Rate {
                title,
                by_group,
                ungrouped,
            } => GroupedRateChart {
                title,
                by_group,
                ungrouped: *ungrouped,
            }
            .render(area, buf),
            Chart::FirstClicks { days, y_max } => DailyFirstClickChart {
                days,
                y_max: *y_max,
            }
            .render(area, buf),
            Chart::SessionLength {
                title,
                by_group,
                y_max,
            } => SessionLengthComparisonChart {
                title,
                by_group,
                y_max: *y_max,
            }
            .render(area, buf),
            Chart::SessionCounts { by_group } => SessionLengthCountChart {
                title: self.title(),
                by_group,
            }
            .render(area, buf),
        }
    }
}

/// Renders a widget into a `width` x `height` buffer and returns its text,
/// one line per row with trailing blanks removed.
pub(crate) fn render_to_string<W>(widget: W, width: u16, height: u16) -> String
where
    W: Widget,
{
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf);

    let mut text = String::new();
    for y in 0..height {
        let line = (0..width).map(|x| buf[(x, y)].symbol()).collect::<String>();
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}
