//! Terminal styles.
use anstyle::Color;
use anstyle::RgbColor;
use anstyle::Style;
use crate::config::Settings;
use crate::util::ColorPair;

/// Badge, badge arrow and text style of one kind of output.
pub struct LineStyle {
    /// Badge style.
    pub badge: Style,
    /// Badge arrow style.
    pub arrow: Style,
    /// Text style.
    pub text: Style,
}

impl LineStyle {
    fn new(colors: ColorPair, default_fg: [u8;3], default_bg: [u8;3]) -> Self {
        let [r1,g1,b1] = colors.0.unwrap_or(default_fg);
        let [r2,g2,b2] = colors.1.unwrap_or(default_bg);
        let fg = Color::Rgb(RgbColor(r1,g1,b1));
        let bg = Color::Rgb(RgbColor(r2,g2,b2));
        let white = Color::Rgb(RgbColor(255,255,255));

        LineStyle {
            badge: Style::new().bold().bg_color(Some(bg)).fg_color(Some(white)),
            arrow: Style::new().bold().fg_color(Some(bg)),
            text: Style::new().fg_color(Some(fg)),
        }
    }
}

/// Styles.
pub struct Styles {
    /// Agent thoughts.
    pub thought: LineStyle,
    /// Tool calls and observations.
    pub tool: LineStyle,
    /// Final answers.
    pub answer: LineStyle,
    /// Failed steps and outcomes.
    pub error: Style,
}

impl Styles {

    /// Load styles.
    pub fn new(settings: &Settings) -> Self {
        Self {
            thought: LineStyle::new(settings.thought_color, [96, 96, 160], [64, 64, 128]),
            tool: LineStyle::new(settings.tool_color, [128, 128, 0], [64, 64, 0]),
            answer: LineStyle::new(settings.answer_color, [64, 128, 64], [0, 128, 0]),
            error: Style::new().bold().fg_color(Some(Color::Rgb(RgbColor(192, 32, 32)))),
        }
    }
}
