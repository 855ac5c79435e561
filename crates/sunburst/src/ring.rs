use strum::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum RingId {
    Inner,
    Middle,
    Outer,
}

/// Half-open angular interval `[start, end)` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// One concentric band and its running angular cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: RingId,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Percent shift applied to label placement along the midline.
    pub label_offset: f64,
    prev_degrees: f64,
    degrees: f64,
}

impl Ring {
    pub fn new(id: RingId, inner_radius: f64, outer_radius: f64, label_offset: f64) -> Self {
        Self {
            id,
            inner_radius,
            outer_radius,
            label_offset,
            prev_degrees: 0.0,
            degrees: 0.0,
        }
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn prev_degrees(&self) -> f64 {
        self.prev_degrees
    }

    /// The sector most recently allocated.
    pub fn current(&self) -> Span {
        Span::new(self.prev_degrees, self.degrees)
    }

    /// Allocates the next `width` degrees and returns the new sector.
    ///
    /// Negative widths are clamped to zero so the cursor never moves backwards.
    pub fn advance(&mut self, width: f64) -> Span {
        self.prev_degrees = self.degrees;
        self.degrees += width.max(0.0);
        self.current()
    }

    /// `label_offset` as the `startOffset` attribute value.
    pub fn label_start_offset(&self) -> String {
        format!("{}%", 50.0 + self.label_offset)
    }
}
