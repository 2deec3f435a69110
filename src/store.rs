use crate::annotation::{
    normalize_label, uppercase_ascii, MapPoint, Point, PointId, RouteEndpoints, Waypoint,
};

/// What happened to a point when its label input lost focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelCommit {
    Kept,
    Removed,
    Missing,
}

/// Ordered points and route waypoints of one session. All positions are in
/// native image pixels; callers convert from canvas space before storing.
#[derive(Clone, Debug)]
pub struct AnnotationStore {
    points: Vec<MapPoint>,
    waypoints: Vec<Waypoint>,
    route: RouteEndpoints,
    next_id: PointId,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            waypoints: Vec::new(),
            route: RouteEndpoints::default(),
            next_id: 1,
        }
    }
}

impl AnnotationStore {
    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn route(&self) -> &RouteEndpoints {
        &self.route
    }

    pub fn find(&self, id: PointId) -> Option<&MapPoint> {
        self.points.iter().find(|point| point.id == id)
    }

    fn find_mut(&mut self, id: PointId) -> Option<&mut MapPoint> {
        self.points.iter_mut().find(|point| point.id == id)
    }

    fn next_point_id(&mut self) -> PointId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Appends a blank user point and returns its handle.
    pub fn add_point(&mut self, pos: Point) -> PointId {
        self.push_point(pos, String::new(), false)
    }

    /// Appends a point as read from a data file. The label is kept as written
    /// apart from surrounding whitespace; keystroke rules apply only to edits.
    pub fn push_point(&mut self, pos: Point, label: String, is_marker: bool) -> PointId {
        let id = self.next_point_id();
        self.points.push(MapPoint {
            id,
            pos: pos.rounded(),
            label: label.trim().to_string(),
            is_marker,
        });
        id
    }

    /// Applies keystroke normalization and stores the result. Returns the
    /// normalized text so the input surface can mirror it.
    pub fn set_label(&mut self, id: PointId, text: &str) -> Option<String> {
        let point = self.find_mut(id)?;
        point.label = normalize_label(text);
        Some(point.label.clone())
    }

    /// Focus-loss rule: a user point whose trimmed label is empty is removed,
    /// anything else keeps its trimmed label.
    pub fn commit_or_discard(&mut self, id: PointId) -> LabelCommit {
        let Some(index) = self.points.iter().position(|point| point.id == id) else {
            return LabelCommit::Missing;
        };
        let point = &mut self.points[index];
        let trimmed = point.label.trim().to_string();
        if trimmed.is_empty() && !point.is_marker {
            self.points.remove(index);
            return LabelCommit::Removed;
        }
        point.label = trimmed;
        LabelCommit::Kept
    }

    pub fn remove_point(&mut self, id: PointId) -> bool {
        let before = self.points.len();
        self.points.retain(|point| point.id != id);
        self.points.len() != before
    }

    /// Drops the run of blank user points at the end of the collection.
    /// Markers are skipped without ending the run; the first labeled user
    /// point stops the scan. Returns how many points were removed.
    pub fn remove_trailing_empty_user_points(&mut self) -> usize {
        let mut removed = 0;
        let mut index = self.points.len();
        while index > 0 {
            index -= 1;
            let point = &self.points[index];
            if point.is_marker {
                continue;
            }
            if !point.label.is_empty() {
                break;
            }
            self.points.remove(index);
            removed += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn add_route_waypoint(&mut self, pos: Point) {
        self.waypoints.push(Waypoint { pos: pos.rounded() });
    }

    /// Removes every waypoint and both endpoint identifiers.
    pub fn clear_route(&mut self) {
        self.waypoints.clear();
        self.route = RouteEndpoints::default();
    }

    pub fn set_route_start(&mut self, text: &str) -> &str {
        self.route.start = uppercase_ascii(text);
        &self.route.start
    }

    pub fn set_route_end(&mut self, text: &str) -> &str {
        self.route.end = uppercase_ascii(text);
        &self.route.end
    }

    pub fn replace_route(&mut self, route: RouteEndpoints, waypoints: Vec<Point>) {
        self.route = route;
        self.waypoints = waypoints
            .into_iter()
            .map(|pos| Waypoint { pos: pos.rounded() })
            .collect();
    }

    pub fn count_user_points(&self) -> usize {
        self.points.iter().filter(|point| !point.is_marker).count()
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Resets everything for a freshly loaded image.
    pub fn reset(&mut self) {
        self.points.clear();
        self.waypoints.clear();
        self.route = RouteEndpoints::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{AnnotationStore, LabelCommit};
    use crate::annotation::Point;

    fn labels(store: &AnnotationStore) -> Vec<&str> {
        store.points().iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn trailing_blank_points_are_dropped_through_markers() {
        let mut store = AnnotationStore::default();
        store.push_point(Point::new(1.0, 1.0), "X1".into(), false);
        store.push_point(Point::new(2.0, 2.0), String::new(), false);
        store.push_point(Point::new(3.0, 3.0), String::new(), true);
        store.push_point(Point::new(4.0, 4.0), String::new(), false);

        let removed = store.remove_trailing_empty_user_points();

        // The marker survives: it is skipped, not deleted.
        assert_eq!(removed, 2);
        assert_eq!(labels(&store), vec!["X1", ""]);
        assert!(store.points()[1].is_marker);
        assert_eq!(store.count_user_points(), 1);
    }

    #[test]
    fn trailing_scan_stops_at_first_labeled_user_point() {
        let mut store = AnnotationStore::default();
        store.push_point(Point::new(1.0, 1.0), String::new(), false);
        store.push_point(Point::new(2.0, 2.0), "B".into(), false);
        store.push_point(Point::new(3.0, 3.0), String::new(), false);

        assert_eq!(store.remove_trailing_empty_user_points(), 1);
        assert_eq!(labels(&store), vec!["", "B"]);
    }

    #[test]
    fn set_label_normalizes_every_edit() {
        let mut store = AnnotationStore::default();
        let id = store.add_point(Point::new(10.0, 10.0));
        assert_eq!(store.set_label(id, "ab3").as_deref(), Some("AB3"));
        assert_eq!(store.set_label(id, "abcdef").as_deref(), Some("ABCD"));
        assert_eq!(store.find(id).map(|p| p.label.as_str()), Some("ABCD"));
        assert_eq!(store.set_label(999, "zz"), None);
    }

    #[test]
    fn commit_removes_blank_user_point_and_trims_others() {
        let mut store = AnnotationStore::default();
        let blank = store.add_point(Point::new(1.0, 1.0));
        let spaced = store.add_point(Point::new(2.0, 2.0));
        store.set_label(blank, "  ");
        store.set_label(spaced, " a ");

        assert_eq!(store.commit_or_discard(blank), LabelCommit::Removed);
        assert_eq!(store.commit_or_discard(spaced), LabelCommit::Kept);
        assert_eq!(store.commit_or_discard(blank), LabelCommit::Missing);
        assert_eq!(labels(&store), vec!["A"]);
    }

    #[test]
    fn commit_keeps_blank_marker() {
        let mut store = AnnotationStore::default();
        let marker = store.push_point(Point::new(1.0, 1.0), String::new(), true);
        assert_eq!(store.commit_or_discard(marker), LabelCommit::Kept);
        assert_eq!(store.points().len(), 1);
    }

    #[test]
    fn handles_survive_removal_of_earlier_points() {
        let mut store = AnnotationStore::default();
        let first = store.add_point(Point::new(1.0, 1.0));
        let second = store.add_point(Point::new(2.0, 2.0));
        assert!(store.remove_point(first));
        assert_eq!(store.set_label(second, "q").as_deref(), Some("Q"));
        assert!(!store.remove_point(first));
    }

    #[test]
    fn clear_route_resets_endpoints() {
        let mut store = AnnotationStore::default();
        store.add_route_waypoint(Point::new(5.4, 6.6));
        assert_eq!(store.set_route_start("a1"), "A1");
        assert_eq!(store.set_route_end("b2"), "B2");
        assert_eq!(store.waypoints()[0].pos, Point::new(5.0, 7.0));

        store.clear_route();
        assert_eq!(store.waypoint_count(), 0);
        assert!(store.route().is_empty());
    }

    #[test]
    fn file_labels_are_kept_verbatim_until_edited() {
        let mut store = AnnotationStore::default();
        let id = store.push_point(Point::new(1.0, 1.0), " Summit ".into(), true);
        assert_eq!(labels(&store), vec!["Summit"]);

        assert_eq!(store.set_label(id, "Summit").as_deref(), Some("SUMM"));
    }

    #[test]
    fn clear_removes_markers_too() {
        let mut store = AnnotationStore::default();
        store.push_point(Point::new(1.0, 1.0), "M".into(), true);
        store.add_point(Point::new(2.0, 2.0));
        store.add_route_waypoint(Point::new(3.0, 3.0));
        store.clear();
        assert!(store.points().is_empty());
        assert_eq!(store.waypoint_count(), 1);
    }
}
