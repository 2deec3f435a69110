use egui::Vec2;

pub type PointId = u64;

/// Longest label a point can carry.
pub const MAX_LABEL_LEN: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn rounded(self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    pub fn delta(self, other: Point) -> Vec2 {
        Vec2::new(other.x - self.x, other.y - self.y)
    }
}

/// A labeled location on the map. `pos` is in native image pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct MapPoint {
    pub id: PointId,
    pub pos: Point,
    pub label: String,
    /// Reference points loaded from a file: never get a label input and are
    /// never discarded for having a blank label.
    pub is_marker: bool,
}

impl MapPoint {
    /// A user point nobody finished labeling.
    pub fn is_abandoned(&self) -> bool {
        !self.is_marker && self.label.is_empty()
    }
}

/// An unlabeled route coordinate in native image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub pos: Point,
}

/// Start and end of a route, referencing point labels by value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteEndpoints {
    pub start: String,
    pub end: String,
}

impl RouteEndpoints {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: uppercase_ascii(start),
            end: uppercase_ascii(end),
        }
    }

    pub fn is_endpoint(&self, label: &str) -> bool {
        !label.is_empty() && (label == self.start || label == self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }
}

/// Upper-cases ASCII `a-z` only; everything else passes through untouched.
pub fn uppercase_ascii(text: &str) -> String {
    text.chars().map(|c| c.to_ascii_uppercase()).collect()
}

/// Normalization applied to a point label on every edit.
pub fn normalize_label(text: &str) -> String {
    uppercase_ascii(text).chars().take(MAX_LABEL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize_label, uppercase_ascii, MapPoint, Point, RouteEndpoints};

    #[test]
    fn label_is_uppercased_and_capped() {
        assert_eq!(normalize_label("ab3"), "AB3");
        assert_eq!(normalize_label("abcdef"), "ABCD");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn uppercase_leaves_non_ascii_alone() {
        assert_eq!(uppercase_ascii("é-z"), "é-Z");
        assert_eq!(normalize_label("ñañaña"), "ñAñA");
    }

    #[test]
    fn blank_endpoint_never_matches() {
        let route = RouteEndpoints::new("a1", "");
        assert_eq!(route.start, "A1");
        assert!(route.is_endpoint("A1"));
        assert!(!route.is_endpoint(""));
        assert!(!route.is_endpoint("a1"));
    }

    #[test]
    fn marker_with_blank_label_is_not_abandoned() {
        let mut point = MapPoint {
            id: 1,
            pos: Point::new(1.0, 2.0),
            label: String::new(),
            is_marker: true,
        };
        assert!(!point.is_abandoned());
        point.is_marker = false;
        assert!(point.is_abandoned());
    }
}
