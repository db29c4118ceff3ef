//! Buffer parameters: curve approximation quality, end caps, joins.

use config::constants::{DEFAULT_MITRE_LIMIT, DEFAULT_QUADRANT_SEGMENTS};
use serde::{Deserialize, Serialize};

use crate::error::{BufferError, BufferResult};

/// Shape of the cap closing an open line end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EndCapStyle {
    /// Semicircular cap around the endpoint.
    #[default]
    Round,
    /// Straight cut through the endpoint.
    Flat,
    /// Squared-off cap extending half the buffer width past the endpoint.
    Square,
}

/// Shape of the join at a convex corner of the offset curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinStyle {
    /// Circular arc fillet.
    #[default]
    Round,
    /// Extended corner point, clipped by the mitre limit.
    Mitre,
    /// Straight chord between the offset edges.
    Bevel,
}

/// Configuration for a buffer operation.
///
/// Collapses the distance-plus-options call variants into a single value
/// with documented defaults for unset fields.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{BufferParameters, EndCapStyle, JoinStyle};
///
/// let params = BufferParameters::default()
///     .with_quadrant_segments(16)
///     .with_end_cap_style(EndCapStyle::Square);
/// assert_eq!(params.quadrant_segments(), 16);
/// assert_eq!(params.join_style(), JoinStyle::Round);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferParameters {
    /// Line segments per quarter circle when approximating arcs.
    quadrant_segments: u32,
    /// End cap style for open lines.
    end_cap_style: EndCapStyle,
    /// Join style at convex corners.
    join_style: JoinStyle,
    /// Mitre length bound as a multiple of the buffer distance.
    mitre_limit: f64,
}

impl Default for BufferParameters {
    fn default() -> Self {
        Self {
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
            end_cap_style: EndCapStyle::Round,
            join_style: JoinStyle::Round,
            mitre_limit: DEFAULT_MITRE_LIMIT,
        }
    }
}

impl BufferParameters {
    /// Sets the number of segments per quarter circle.
    #[must_use]
    pub fn with_quadrant_segments(mut self, quadrant_segments: u32) -> Self {
        self.quadrant_segments = quadrant_segments;
        self
    }

    /// Sets the end cap style.
    #[must_use]
    pub fn with_end_cap_style(mut self, style: EndCapStyle) -> Self {
        self.end_cap_style = style;
        self
    }

    /// Sets the join style.
    #[must_use]
    pub fn with_join_style(mut self, style: JoinStyle) -> Self {
        self.join_style = style;
        self
    }

    /// Sets the mitre limit.
    #[must_use]
    pub fn with_mitre_limit(mut self, mitre_limit: f64) -> Self {
        self.mitre_limit = mitre_limit;
        self
    }

    /// Segments per quarter circle.
    #[must_use]
    pub fn quadrant_segments(&self) -> u32 {
        self.quadrant_segments
    }

    /// End cap style for open lines.
    #[must_use]
    pub fn end_cap_style(&self) -> EndCapStyle {
        self.end_cap_style
    }

    /// Join style at convex corners.
    #[must_use]
    pub fn join_style(&self) -> JoinStyle {
        self.join_style
    }

    /// Mitre length bound as a multiple of the buffer distance.
    #[must_use]
    pub fn mitre_limit(&self) -> f64 {
        self.mitre_limit
    }

    /// Validates the parameter combination.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero quadrant segment count or a
    /// non-positive or non-finite mitre limit.
    pub fn validate(&self) -> BufferResult<()> {
        if self.quadrant_segments < 1 {
            return Err(BufferError::invalid_argument(
                "quadrant segment count must be at least 1",
            ));
        }
        if !self.mitre_limit.is_finite() || self.mitre_limit <= 0.0 {
            return Err(BufferError::invalid_argument(format!(
                "mitre limit must be positive and finite: {}",
                self.mitre_limit
            )));
        }
        Ok(())
    }
}
