//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic or projected bounding box.
///
/// For layer extents read from capabilities documents the coordinates are
/// WGS84 degrees. WFS `bbox` filters use whatever CRS the request names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse an OGC bbox string: "minx,miny,maxx,maxy" (W,S,E,N).
    pub fn from_wms_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let number = |raw: &str| -> Result<f64, BboxParseError> {
            raw.parse()
                .map_err(|_| BboxParseError::InvalidNumber(raw.to_string()))
        };

        Ok(Self {
            min_x: number(parts[0])?,
            min_y: number(parts[1])?,
            max_x: number(parts[2])?,
            max_y: number(parts[3])?,
        })
    }

    /// Render as the comma separated W,S,E,N form used in OGC query strings.
    pub fn to_wms_string(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Corners as `[min_x, min_y, max_x, max_y]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Grow the box so that it contains the point.
    pub fn extend(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let mut bbox = Self::new(x, y, x, y);
        for (x, y) in iter {
            bbox.extend(x, y);
        }
        Some(bbox)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wms_bbox() {
        let bbox = BoundingBox::from_wms_string("-125.0,24.0,-66.0,50.0").unwrap();
        assert_eq!(bbox.min_x, -125.0);
        assert_eq!(bbox.min_y, 24.0);
        assert_eq!(bbox.max_x, -66.0);
        assert_eq!(bbox.max_y, 50.0);
    }

    #[test]
    fn test_wms_string_is_comma_separated() {
        let bbox = BoundingBox::new(19.5, 49.9, 20.1, 50.2);
        assert_eq!(bbox.to_wms_string(), "19.5,49.9,20.1,50.2");
    }

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points([(10.0, 20.0), (-5.0, 30.0), (2.0, -1.0)]).unwrap();
        assert_eq!(bbox.to_array(), [-5.0, -1.0, 10.0, 30.0]);
        assert!(BoundingBox::from_points(Vec::<(f64, f64)>::new()).is_none());
    }
}
