//! SVG bar chart of monthly forecast totals

use crate::error::{ForecastError, ForecastResult};
use crate::types::MonthlyTotal;
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

pub const CHART_TITLE: &str = "Forecast Revenue by Year-Month";
pub const X_AXIS_LABEL: &str = "Year-Month";
pub const Y_AXIS_LABEL: &str = "Forecast Revenue";

const Y_TICKS: usize = 5;

/// Bar chart renderer configuration
#[derive(Clone, Debug)]
pub struct BarChartRenderer {
    /// Width of the plot area in pixels
    pub plot_width: u32,
    /// Height of the plot area in pixels
    pub plot_height: u32,
    /// Left margin (y tick labels and axis title)
    pub margin_left: u32,
    /// Bottom margin (month labels and axis title)
    pub margin_bottom: u32,
    /// Top margin (chart title)
    pub margin_top: u32,
    pub margin_right: u32,
    pub bar_color: String,
    pub axis_color: String,
    pub grid_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for BarChartRenderer {
    fn default() -> Self {
        Self {
            plot_width: 640,
            plot_height: 360,
            margin_left: 90,
            margin_bottom: 80,
            margin_top: 50,
            margin_right: 20,
            bar_color: "#1f77b4".into(),
            axis_color: "#2c3e50".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl BarChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plot_width(mut self, width: u32) -> Self {
        self.plot_width = width;
        self
    }

    pub fn plot_height(mut self, height: u32) -> Self {
        self.plot_height = height;
        self
    }

    fn total_width(&self) -> u32 {
        self.margin_left + self.plot_width + self.margin_right
    }

    fn total_height(&self) -> u32 {
        self.margin_top + self.plot_height + self.margin_bottom
    }

    /// Value range covered by the y axis, always including zero
    fn value_range(totals: &[MonthlyTotal]) -> (f64, f64) {
        let min = totals.iter().map(|t| t.value).fold(0.0_f64, f64::min);
        let max = totals.iter().map(|t| t.value).fold(0.0_f64, f64::max);
        if (max - min).abs() < f64::EPSILON {
            (min, min + 1.0)
        } else {
            (min, max)
        }
    }

    fn value_to_y(&self, value: f64, range: (f64, f64)) -> f64 {
        let (min, max) = range;
        let top = self.margin_top as f64;
        top + (max - value) / (max - min) * self.plot_height as f64
    }

    fn render_axes(&self, range: (f64, f64)) -> Group {
        let mut group = Group::new().set("class", "axes");
        let left = self.margin_left as f64;
        let right = left + self.plot_width as f64;

        for tick in 0..=Y_TICKS {
            let value = range.0 + (range.1 - range.0) * tick as f64 / Y_TICKS as f64;
            let y = self.value_to_y(value, range);

            group = group.add(
                Line::new()
                    .set("x1", left)
                    .set("y1", y)
                    .set("x2", right)
                    .set("y2", y)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", 1),
            );
            group = group.add(
                Text::new(format_value(value))
                    .set("x", left - 8.0)
                    .set("y", y + 4.0)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size - 1)
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "end"),
            );
        }

        let zero_y = self.value_to_y(0.0, range);
        group = group.add(
            Line::new()
                .set("x1", left)
                .set("y1", zero_y)
                .set("x2", right)
                .set("y2", zero_y)
                .set("stroke", self.axis_color.as_str())
                .set("stroke-width", 1),
        );
        group = group.add(
            Line::new()
                .set("x1", left)
                .set("y1", self.margin_top)
                .set("x2", left)
                .set("y2", self.margin_top + self.plot_height)
                .set("stroke", self.axis_color.as_str())
                .set("stroke-width", 1),
        );

        group
    }

    fn render_bars(&self, totals: &[MonthlyTotal], range: (f64, f64)) -> Group {
        let mut group = Group::new().set("class", "bars");
        if totals.is_empty() {
            return group;
        }

        let slot = self.plot_width as f64 / totals.len() as f64;
        let bar_width = (slot * 0.8).max(1.0);
        let zero_y = self.value_to_y(0.0, range);
        let label_y = (self.margin_top + self.plot_height) as f64 + 16.0;

        for (idx, total) in totals.iter().enumerate() {
            let x = self.margin_left as f64 + slot * idx as f64 + (slot - bar_width) / 2.0;
            let value_y = self.value_to_y(total.value, range);
            let (y, height) = if value_y <= zero_y {
                (value_y, zero_y - value_y)
            } else {
                (zero_y, value_y - zero_y)
            };

            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", bar_width)
                    .set("height", height)
                    .set("fill", self.bar_color.as_str())
                    .set("data-month", total.month.as_str())
                    .set("data-value", total.value),
            );

            let label_x = x + bar_width / 2.0;
            group = group.add(
                Text::new(total.month.as_str())
                    .set("x", label_x)
                    .set("y", label_y)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size - 1)
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "end")
                    .set("transform", format!("rotate(-45 {} {})", label_x, label_y)),
            );
        }

        group
    }

    fn render_labels(&self) -> Group {
        let width = self.total_width();
        let height = self.total_height();
        let plot_mid_y = self.margin_top + self.plot_height / 2;

        Group::new()
            .set("class", "labels")
            .add(
                Text::new(CHART_TITLE)
                    .set("x", width / 2)
                    .set("y", self.margin_top / 2 + 6)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size + 4)
                    .set("font-weight", "bold")
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "middle"),
            )
            .add(
                Text::new(X_AXIS_LABEL)
                    .set("x", self.margin_left + self.plot_width / 2)
                    .set("y", height - 10)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size)
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "middle"),
            )
            .add(
                Text::new(Y_AXIS_LABEL)
                    .set("x", 18)
                    .set("y", plot_mid_y)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size)
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "middle")
                    .set("transform", format!("rotate(-90 18 {})", plot_mid_y)),
            )
    }

    /// Render the totals as a standalone SVG document
    pub fn render(&self, totals: &[MonthlyTotal]) -> ForecastResult<String> {
        let width = self.total_width();
        let height = self.total_height();
        let range = Self::value_range(totals);

        let document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg")
            .add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", "#ffffff"),
            )
            .add(self.render_axes(range))
            .add(self.render_bars(totals, range))
            .add(self.render_labels());

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| ForecastError::Render(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| ForecastError::Render(format!("Invalid UTF-8: {}", e)))
    }
}

/// Compact axis label: 1250000 → "1.25M", 1500 → "1.5K"
fn format_value(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1_000_000.0 {
        (value / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (value / 1_000.0, "K")
    } else {
        (value, "")
    };
    let text = format!("{:.2}", scaled);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", text, suffix)
}

/// Render with default styling
pub fn render_bar_chart(totals: &[MonthlyTotal]) -> ForecastResult<String> {
    BarChartRenderer::default().render(totals)
}
