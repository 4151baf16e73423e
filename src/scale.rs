use crate::ir::ChartPoint;

/// Observed minimum and maximum of a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn of<I>(values: I) -> Option<MinMax>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for val in values {
            if val < min { min = val; }
            if val > max { max = val; }
        }
        if min > max {
            None
        } else {
            Some(MinMax { min, max })
        }
    }

    /// Width of the interval, or 1 when every value is identical
    pub fn span(&self) -> f64 {
        if self.max == self.min {
            1.0
        } else {
            self.max - self.min
        }
    }
}

/// Linear rescaling of a value into [0, 1] relative to the filtered set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    bounds: MinMax,
}

impl ColorScale {
    pub fn new(bounds: MinMax) -> Self {
        ColorScale { bounds }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.bounds.min) / self.bounds.span()
    }
}

/// Data-space axis domains for drawing a chart
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDomains {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

pub fn axis_domains(points: &[ChartPoint]) -> AxisDomains {
    let x = MinMax::of(points.iter().map(|p| p.x)).unwrap_or(MinMax { min: 0.0, max: 1.0 });
    let y = MinMax::of(points.iter().map(|p| p.y)).unwrap_or(MinMax { min: 0.0, max: 1.0 });
    AxisDomains {
        x: pad_range(x.min, x.max, 0.15),
        y: pad_range(y.min, y.max, 0.15),
    }
}

/// Pad a range by a fraction of its width; degenerate ranges widen by 1 each side
fn pad_range(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * fraction;
        (min - padding, max + padding)
    }
}
