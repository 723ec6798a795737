//! Fuzzy image coordinates used as tag content.
//!
//! A [`FuzzyPoint`] is an `(x, y)` pixel with a vagueness radius: it stands
//! for the square area `radius` pixels around the midpoint. A [`FuzzyRect`]
//! is an `(x, y, w, h)` area with the same kind of vagueness. Both parse
//! from and render to a fixed textual grammar — `"(x,y[,r])"` and
//! `"(x,y,w,h[,r])"` — which is how they travel inside tag content.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnError, Result};

fn parse_fields(text: &str, expected: &'static str) -> Result<Vec<i64>> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| AnnError::Type {
            value: text.to_owned(),
            expected,
        })?;
    inner
        .split(',')
        .map(|f| {
            f.trim().parse::<i64>().map_err(|_| AnnError::Type {
                value: text.to_owned(),
                expected,
            })
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// FuzzyPoint
// ─────────────────────────────────────────────────────────────────────────────

/// An image point `(x, y)` with a vagueness radius.
///
/// Two fuzzy points are equal when the area of one contains the midpoint
/// (or a corner of the area) of the other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FuzzyPoint {
    x: i64,
    y: i64,
    radius: Option<i64>,
}

impl FuzzyPoint {
    /// A point with no vagueness.
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y, radius: None }
    }

    /// A point with an explicit radius. Negative radii are rejected.
    pub fn with_radius(x: i64, y: i64, radius: i64) -> Result<Self> {
        if radius < 0 {
            return Err(AnnError::NegativeValue(radius as f64));
        }
        Ok(Self {
            x,
            y,
            radius: Some(radius),
        })
    }

    /// The midpoint coordinates.
    #[must_use]
    pub fn midpoint(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// The radius, if one was assigned.
    #[must_use]
    pub fn radius(&self) -> Option<i64> {
        self.radius
    }

    /// Whether `(x, y)` falls inside the vagueness area of self.
    #[must_use]
    pub fn contains(&self, coord: (i64, i64)) -> bool {
        let r = self.radius.unwrap_or(0);
        coord.0 >= self.x - r
            && coord.0 <= self.x + r
            && coord.1 >= self.y - r
            && coord.1 <= self.y + r
    }
}

impl FromStr for FuzzyPoint {
    type Err = AnnError;

    fn from_str(s: &str) -> Result<Self> {
        const EXPECTED: &str = "fuzzy point \"(x,y[,r])\"";
        let fields = parse_fields(s, EXPECTED)?;
        match fields.as_slice() {
            [x, y] => Ok(Self::new(*x, *y)),
            [x, y, r] => Self::with_radius(*x, *y, *r),
            _ => Err(AnnError::Type {
                value: s.to_owned(),
                expected: EXPECTED,
            }),
        }
    }
}

impl fmt::Display for FuzzyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radius {
            Some(r) => write!(f, "({},{},{})", self.x, self.y, r),
            None => write!(f, "({},{})", self.x, self.y),
        }
    }
}

impl PartialEq for FuzzyPoint {
    /// Area-overlap equality: the other midpoint, or one of the corners of
    /// the other area, lies inside the area of self.
    fn eq(&self, other: &Self) -> bool {
        match other.radius {
            None | Some(0) => self.contains(other.midpoint()),
            Some(r) => {
                self.contains((other.x - r, other.y - r))
                    || self.contains((other.x - r, other.y + r))
                    || self.contains((other.x + r, other.y - r))
                    || self.contains((other.x + r, other.y + r))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FuzzyRect
// ─────────────────────────────────────────────────────────────────────────────

/// An image area `(x, y, w, h)` with a vagueness radius.
///
/// All four coordinates must be non-negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FuzzyRect {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
    radius: Option<i64>,
}

impl FuzzyRect {
    /// A rect with no vagueness.
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Result<Self> {
        for v in [x, y, w, h] {
            if v < 0 {
                return Err(AnnError::NegativeValue(v as f64));
            }
        }
        Ok(Self {
            x,
            y,
            w,
            h,
            radius: None,
        })
    }

    /// A rect with an explicit radius. Negative values are rejected.
    pub fn with_radius(x: i64, y: i64, w: i64, h: i64, radius: i64) -> Result<Self> {
        if radius < 0 {
            return Err(AnnError::NegativeValue(radius as f64));
        }
        let mut rect = Self::new(x, y, w, h)?;
        rect.radius = Some(radius);
        Ok(rect)
    }

    /// The `(x, y, w, h)` coordinates.
    #[must_use]
    pub fn coords(&self) -> (i64, i64, i64, i64) {
        (self.x, self.y, self.w, self.h)
    }

    /// The radius, if one was assigned.
    #[must_use]
    pub fn radius(&self) -> Option<i64> {
        self.radius
    }

    /// Whether `(x, y)` falls inside the vagueness area of self.
    #[must_use]
    pub fn contains(&self, coord: (i64, i64)) -> bool {
        let r = self.radius.unwrap_or(0);
        coord.0 >= self.x - r
            && coord.0 <= self.x + self.w + r
            && coord.1 >= self.y - r
            && coord.1 <= self.y + self.h + r
    }
}

impl FromStr for FuzzyRect {
    type Err = AnnError;

    fn from_str(s: &str) -> Result<Self> {
        const EXPECTED: &str = "fuzzy rect \"(x,y,w,h[,r])\"";
        let fields = parse_fields(s, EXPECTED)?;
        match fields.as_slice() {
            [x, y, w, h] => Self::new(*x, *y, *w, *h),
            [x, y, w, h, r] => Self::with_radius(*x, *y, *w, *h, *r),
            _ => Err(AnnError::Type {
                value: s.to_owned(),
                expected: EXPECTED,
            }),
        }
    }
}

impl fmt::Display for FuzzyRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radius {
            Some(r) => write!(f, "({},{},{},{},{})", self.x, self.y, self.w, self.h, r),
            None => write!(f, "({},{},{},{})", self.x, self.y, self.w, self.h),
        }
    }
}

impl PartialEq for FuzzyRect {
    /// Area-overlap equality: a corner of the other rect, expanded by its
    /// radius, lies inside the area of self.
    fn eq(&self, other: &Self) -> bool {
        let r = other.radius.unwrap_or(0);
        self.contains((other.x - r, other.y - r))
            || self.contains((other.x - r, other.y + other.h + r))
            || self.contains((other.x + other.w + r, other.y - r))
            || self.contains((other.x + other.w + r, other.y + other.h + r))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // ── FuzzyPoint ───────────────────────────────────────────────────────

    #[test]
    fn point_parse_without_radius() {
        let p: FuzzyPoint = "(1,2)".parse().unwrap();
        assert_eq!(p.midpoint(), (1, 2));
        assert_eq!(p.radius(), None);
    }

    #[test]
    fn point_parse_with_radius_and_spaces() {
        let p: FuzzyPoint = "(1, 2, 3)".parse().unwrap();
        assert_eq!(p.midpoint(), (1, 2));
        assert_eq!(p.radius(), Some(3));
    }

    #[test]
    fn point_parse_malformed() {
        assert_matches!("(a,b)".parse::<FuzzyPoint>(), Err(AnnError::Type { .. }));
        assert_matches!("1,2".parse::<FuzzyPoint>(), Err(AnnError::Type { .. }));
        assert_matches!("(1)".parse::<FuzzyPoint>(), Err(AnnError::Type { .. }));
        assert_matches!(
            "(1,2,3,4)".parse::<FuzzyPoint>(),
            Err(AnnError::Type { .. })
        );
    }

    #[test]
    fn point_negative_radius_rejected() {
        assert_matches!(
            FuzzyPoint::with_radius(1, 2, -1),
            Err(AnnError::NegativeValue(_))
        );
    }

    #[test]
    fn point_negative_coords_allowed() {
        let p = FuzzyPoint::new(-3, -4);
        assert_eq!(p.midpoint(), (-3, -4));
    }

    #[test]
    fn point_contains() {
        let p = FuzzyPoint::with_radius(1, 2, 3).unwrap();
        assert!(p.contains((1, 1)));
        assert!(p.contains((0, 0)));
        assert!(p.contains((4, 5)));
        assert!(!p.contains((6, 5)));
    }

    #[test]
    fn point_display_roundtrip() {
        assert_eq!(FuzzyPoint::new(1, 2).to_string(), "(1,2)");
        assert_eq!(
            FuzzyPoint::with_radius(1, 2, 0).unwrap().to_string(),
            "(1,2,0)"
        );
    }

    #[test]
    fn point_equality_contains_based() {
        let p1 = FuzzyPoint::new(1, 2);
        let p2 = FuzzyPoint::with_radius(1, 2, 0).unwrap();
        assert_eq!(p1, p2);
        assert_ne!(p1, FuzzyPoint::new(3, 2));

        let p1 = FuzzyPoint::with_radius(1, 2, 3).unwrap();
        assert_eq!(p1, FuzzyPoint::new(1, 2));
        assert_eq!(p1, FuzzyPoint::new(3, 4));
        assert_eq!(p1, FuzzyPoint::new(4, 5));
        assert_ne!(p1, FuzzyPoint::new(5, 5));
        assert_eq!(p1, FuzzyPoint::with_radius(5, 5, 1).unwrap());
        assert_ne!(p1, FuzzyPoint::with_radius(6, 6, 1).unwrap());
    }

    // ── FuzzyRect ────────────────────────────────────────────────────────

    #[test]
    fn rect_parse() {
        let r: FuzzyRect = "(1,2,10,12)".parse().unwrap();
        assert_eq!(r.coords(), (1, 2, 10, 12));
        assert_eq!(r.radius(), None);

        let r: FuzzyRect = "(1, 2, 10, 12)".parse().unwrap();
        assert_eq!(r.coords(), (1, 2, 10, 12));

        let r: FuzzyRect = "(1,2,10,12,2)".parse().unwrap();
        assert_eq!(r.radius(), Some(2));
    }

    #[test]
    fn rect_parse_malformed() {
        assert_matches!(
            "(a,b,10,24)".parse::<FuzzyRect>(),
            Err(AnnError::Type { .. })
        );
        assert_matches!("(1,2)".parse::<FuzzyRect>(), Err(AnnError::Type { .. }));
    }

    #[test]
    fn rect_negative_coord_rejected() {
        assert_matches!(FuzzyRect::new(1, -1, 0, 0), Err(AnnError::NegativeValue(_)));
    }

    #[test]
    fn rect_contains() {
        let r = FuzzyRect::with_radius(1, 2, 10, 10, 3).unwrap();
        assert!(r.contains((1, 1)));
        assert!(r.contains((0, 0)));
        assert!(r.contains((14, 12)));
        assert!(!r.contains((16, 5)));
        assert!(r.contains((10, 15)));
        assert!(!r.contains((10, 16)));
    }

    #[test]
    fn rect_display_roundtrip() {
        let r = FuzzyRect::with_radius(1, 2, 3, 4, 5).unwrap();
        assert_eq!(r.to_string(), "(1,2,3,4,5)");
        assert_eq!(r.to_string().parse::<FuzzyRect>().unwrap(), r);
    }

    #[test]
    fn rect_equality_overlap_based() {
        let a = FuzzyRect::new(0, 0, 10, 10).unwrap();
        let b = FuzzyRect::new(5, 5, 10, 10).unwrap();
        let c = FuzzyRect::new(20, 20, 2, 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
