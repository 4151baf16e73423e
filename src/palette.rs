// Color, size and label encodings for bubble markers

use crate::ir::Rgba;

pub const FILL_ALPHA: f64 = 0.7;
pub const BORDER_ALPHA: f64 = 0.95;
/// Per-channel darkening applied to the fill to get the border
pub const BORDER_SHADE: u8 = 40;

pub const MISSING_FILL: Rgba = Rgba::new(200, 200, 200, 0.6);
pub const MISSING_BORDER: Rgba = Rgba::new(120, 120, 120, 1.0);

/// Marker fill and border colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerColor {
    pub fill: Rgba,
    pub border: Rgba,
}

/// Two-stop linear gradient from a low color to a high color
pub struct ColorGradient {
    low: (u8, u8, u8),
    high: (u8, u8, u8),
}

impl ColorGradient {
    /// Blue (0,102,255) for the lowest value, red (255,60,60) for the highest
    pub fn blue_to_red() -> Self {
        ColorGradient {
            low: (0, 102, 255),
            high: (255, 60, 60),
        }
    }

    /// Color for a normalized value in [0, 1]; `None` gets the neutral gray
    pub fn marker_color(&self, t: Option<f64>) -> MarkerColor {
        let Some(t) = t else {
            return MarkerColor {
                fill: MISSING_FILL,
                border: MISSING_BORDER,
            };
        };

        let r = lerp_channel(self.low.0, self.high.0, t);
        let g = lerp_channel(self.low.1, self.high.1, t);
        let b = lerp_channel(self.low.2, self.high.2, t);

        MarkerColor {
            fill: Rgba::new(r, g, b, FILL_ALPHA),
            border: Rgba::new(
                r.saturating_sub(BORDER_SHADE),
                g.saturating_sub(BORDER_SHADE),
                b.saturating_sub(BORDER_SHADE),
                BORDER_ALPHA,
            ),
        }
    }
}

/// Interpolate one channel, truncating toward zero
fn lerp_channel(low: u8, high: u8, t: f64) -> u8 {
    let value = low as f64 + (high as f64 - low as f64) * t;
    value.clamp(0.0, 255.0) as u8
}

/// Bubble diameter: linear in the magnitude of the value, floored at 20
pub fn bubble_size(return_on_assets: f64) -> f64 {
    return_on_assets.abs() * 500.0 + 20.0
}

/// Label text and font size for a bubble of the given diameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerLabel {
    pub text: String,
    pub font_size: u32,
}

struct LabelTier {
    max_diameter: f64,
    font_size: u32,
    /// (names longer than this, keep this many chars)
    truncate: Option<(usize, usize)>,
}

const LABEL_TIERS: [LabelTier; 3] = [
    LabelTier { max_diameter: 50.0, font_size: 8, truncate: Some((4, 3)) },
    LabelTier { max_diameter: 80.0, font_size: 10, truncate: Some((6, 5)) },
    LabelTier { max_diameter: f64::INFINITY, font_size: 12, truncate: None },
];

pub fn marker_label(name: &str, diameter: f64) -> MarkerLabel {
    let tier = LABEL_TIERS
        .iter()
        .find(|t| diameter < t.max_diameter)
        .unwrap_or(&LABEL_TIERS[LABEL_TIERS.len() - 1]);

    let text = match tier.truncate {
        Some((limit, keep)) if name.chars().count() > limit => {
            let head: String = name.chars().take(keep).collect();
            format!("{}...", head)
        }
        _ => name.to_string(),
    };

    MarkerLabel {
        text,
        font_size: tier.font_size,
    }
}
