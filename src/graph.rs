use crate::ir::{ChartSpec, Rgba};
use crate::scale;
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub struct GraphConfig {
    pub width: u32,
    /// Falls back to the height carried by the chart layout
    pub height: Option<u32>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            width: 1200,
            height: None,
        }
    }
}

fn plot_color(c: &Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a)
}

/// Parse "#rrggbb"; anything else renders black
fn hex_color(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    if digits.len() == 6 {
        RGBColor(channel(0), channel(2), channel(4))
    } else {
        BLACK
    }
}

/// Draw a bubble chart spec and return it PNG-encoded
pub fn render_bubble_chart(spec: &ChartSpec, config: &GraphConfig) -> Result<Vec<u8>> {
    if spec.points.is_empty() {
        anyhow::bail!("Cannot create graph with no data points");
    }

    let width = config.width;
    let height = config.height.unwrap_or(spec.layout.height);
    let buffer_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .with_context(|| format!("Image size {}x{} is too large", width, height))?;
    let mut buffer = vec![0u8; buffer_len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();

        root.fill(&WHITE)
            .context("Failed to fill background")?;

        let domains = scale::axis_domains(&spec.points);

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(&spec.title, ("sans-serif", 24.0).into_font())
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(domains.x.0..domains.x.1, domains.y.0..domains.y.1)
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .x_desc(&spec.x_axis_title)
            .y_desc(&spec.y_axis_title)
            .light_line_style(&RGBAColor(128, 128, 128, 0.2))
            .draw()
            .context("Failed to draw mesh")?;

        let min_radius = spec.layout.min_marker_size / 2.0;
        let border_width = spec.layout.border_width;

        chart
            .draw_series(spec.points.iter().map(|p| {
                let radius = (p.size / 2.0).max(min_radius).round() as i32;
                Circle::new((p.x, p.y), radius, plot_color(&p.fill).filled())
            }))
            .context("Failed to draw bubbles")?;

        chart
            .draw_series(spec.points.iter().map(|p| {
                let radius = (p.size / 2.0).max(min_radius).round() as i32;
                Circle::new((p.x, p.y), radius, plot_color(&p.border).stroke_width(border_width))
            }))
            .context("Failed to draw bubble borders")?;

        let label_color = hex_color(&spec.layout.label_color);
        chart
            .draw_series(spec.points.iter().map(|p| {
                let style = ("sans-serif", p.font_size as f64)
                    .into_font()
                    .color(&label_color)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                Text::new(p.label.clone(), (p.x, p.y), style)
            }))
            .context("Failed to draw labels")?;

        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}
