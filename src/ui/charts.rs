//! Pressure and temperature charts.
//!
//! Each chart plots the rolling window against a `mm:ss` time axis, with
//! the flow operating bands and alarm thresholds drawn as horizontal
//! reference lines across the visible span.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition},
    Frame,
};

use crate::app::App;
use crate::telemetry::duration::format_clock;
use crate::telemetry::ChannelLimits;
use crate::ui::Theme;

/// What a horizontal reference line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    FlowA,
    FlowB,
    Emergency,
    Warning,
    LowReference,
}

/// A horizontal line at `value`. Only the first line of each kind carries a
/// legend label so bands appear once in the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub kind: ReferenceKind,
    pub value: f64,
    pub label: Option<String>,
}

/// Reference lines for one channel, in drawing order.
pub fn reference_lines(limits: &ChannelLimits) -> Vec<ReferenceLine> {
    let line = |kind, value, label: Option<&str>| ReferenceLine {
        kind,
        value,
        label: label.map(str::to_string),
    };

    vec![
        line(ReferenceKind::FlowA, limits.flow_a[0], Some("Flow A")),
        line(ReferenceKind::FlowA, limits.flow_a[1], None),
        line(ReferenceKind::FlowB, limits.flow_b[0], Some("Flow B")),
        line(ReferenceKind::FlowB, limits.flow_b[1], None),
        line(ReferenceKind::Emergency, limits.emergency_high, Some("Emergency")),
        line(ReferenceKind::Warning, limits.warn_high, Some("Warning")),
        line(
            ReferenceKind::LowReference,
            limits.low_reference,
            Some(limits.low_reference_label.as_str()),
        ),
    ]
}

fn reference_style(theme: &Theme, kind: ReferenceKind) -> (Style, Marker) {
    match kind {
        ReferenceKind::FlowA => (Style::default().fg(theme.flow_a), Marker::Dot),
        ReferenceKind::FlowB => (Style::default().fg(theme.flow_b), Marker::Dot),
        ReferenceKind::Emergency => (Style::default().fg(theme.alarm), Marker::Braille),
        ReferenceKind::Warning => (Style::default().fg(theme.caution), Marker::Dot),
        ReferenceKind::LowReference => (Style::default().fg(theme.low_reference), Marker::Dot),
    }
}

/// Labels at the left edge, midpoint and right edge of the time axis.
pub fn time_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        format_clock(bounds[0]),
        format_clock(mid),
        format_clock(bounds[1]),
    ]
}

fn value_labels(axis: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (axis[0] + axis[1]) / 2.0;
    [axis[0], mid, axis[1]]
        .iter()
        .map(|v| Span::raw(format!("{:.0}", v)))
        .collect()
}

struct ChannelChart<'a> {
    title: &'a str,
    y_title: &'a str,
    series_name: &'a str,
    color: Color,
    limits: &'a ChannelLimits,
    points: Vec<(f64, f64)>,
}

/// Render the pressure chart.
pub fn render_pressure(frame: &mut Frame, app: &App, area: Rect) {
    let channel = ChannelChart {
        title: " Pressure (kPa) vs Time ",
        y_title: "kPa",
        series_name: "Pressure",
        color: app.theme.pressure_line,
        limits: &app.limits.pressure,
        points: app.chart_window().pressure_points(),
    };
    render_channel(frame, app, area, channel);
}

/// Render the temperature chart.
pub fn render_temperature(frame: &mut Frame, app: &App, area: Rect) {
    let channel = ChannelChart {
        title: " Temperature (°C) vs Time ",
        y_title: "°C",
        series_name: "Temperature",
        color: app.theme.temperature_line,
        limits: &app.limits.temperature,
        points: app.chart_window().temperature_points(),
    };
    render_channel(frame, app, area, channel);
}

fn render_channel(frame: &mut Frame, app: &App, area: Rect, channel: ChannelChart) {
    let bounds = app.chart_bounds();

    let references: Vec<(ReferenceLine, [(f64, f64); 2])> = reference_lines(channel.limits)
        .into_iter()
        .map(|r| {
            let span = [(bounds[0], r.value), (bounds[1], r.value)];
            (r, span)
        })
        .collect();

    let mut datasets: Vec<Dataset> = references
        .iter()
        .map(|(reference, span)| {
            let (style, marker) = reference_style(&app.theme, reference.kind);
            let dataset = Dataset::default()
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(style)
                .data(span);
            match &reference.label {
                Some(label) => dataset.name(label.clone()),
                None => dataset,
            }
        })
        .collect();

    // Live trace last so it is drawn on top
    datasets.push(
        Dataset::default()
            .name(channel.series_name.to_string())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(channel.color))
            .data(&channel.points),
    );

    let block = Block::default()
        .title(Span::styled(channel.title, app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let x_axis = Axis::default()
        .title("mm:ss")
        .style(Style::default().fg(app.theme.border))
        .bounds(bounds)
        .labels(time_labels(bounds).into_iter().map(Span::raw).collect::<Vec<_>>());

    let y_axis = Axis::default()
        .title(channel.y_title)
        .style(Style::default().fg(app.theme.border))
        .bounds(channel.limits.axis)
        .labels(value_labels(channel.limits.axis));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Percentage(40), Constraint::Percentage(90)));

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_lines_pressure() {
        let lines = reference_lines(&ChannelLimits::pressure());
        assert_eq!(lines.len(), 7);

        let values: Vec<f64> = lines.iter().map(|l| l.value).collect();
        assert_eq!(values, vec![310.0, 350.0, 260.0, 300.0, 460.0, 380.0, 220.0]);

        // Each band is named once
        let labels: Vec<&str> = lines.iter().filter_map(|l| l.label.as_deref()).collect();
        assert_eq!(labels, vec!["Flow A", "Flow B", "Emergency", "Warning", "Recovery"]);
    }

    #[test]
    fn test_reference_lines_temperature_low_reference() {
        let lines = reference_lines(&ChannelLimits::temperature());
        let low = lines.iter().find(|l| l.kind == ReferenceKind::LowReference).unwrap();
        assert_eq!(low.value, 110.0);
        assert_eq!(low.label.as_deref(), Some("Preheat"));
    }

    #[test]
    fn test_time_labels() {
        assert_eq!(time_labels([0.0, 1.0]), vec!["00:00", "00:00", "00:01"]);
        assert_eq!(time_labels([100.0, 120.2]), vec!["01:40", "01:50", "02:00"]);
    }
}
