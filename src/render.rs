use egui::{Color32, Painter, Pos2, Rect, Stroke, TextureId, Vec2};

use crate::annotation::{MapPoint, Point, RouteEndpoints};
use crate::mapper::{self, CoordinateMapper};
use crate::store::AnnotationStore;

pub const POINT_RED: Color32 = Color32::from_rgb(0xFF, 0x00, 0x00);
pub const ROUTE_BLUE: Color32 = Color32::from_rgb(0x00, 0x66, 0xFF);
pub const OUTLINE: Color32 = Color32::WHITE;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotStyle {
    pub fill: Color32,
    pub radius: f32,
    pub outline: f32,
}

impl DotStyle {
    pub const ENDPOINT: Self = Self {
        fill: ROUTE_BLUE,
        radius: 4.0,
        outline: 1.5,
    };
    pub const MARKER: Self = Self {
        fill: ROUTE_BLUE,
        radius: 3.0,
        outline: 1.0,
    };
    pub const USER: Self = Self {
        fill: POINT_RED,
        radius: 4.0,
        outline: 1.5,
    };
    pub const WAYPOINT: Self = Self::MARKER;
}

/// Route endpoints win over the marker flag.
pub fn point_style(point: &MapPoint, route: &RouteEndpoints) -> DotStyle {
    if route.is_endpoint(&point.label) {
        DotStyle::ENDPOINT
    } else if point.is_marker {
        DotStyle::MARKER
    } else {
        DotStyle::USER
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot {
    /// Logical canvas position.
    pub center: Point,
    pub style: DotStyle,
}

/// Everything drawn over the base image, bottom layer first: points in
/// collection order, then waypoints in collection order.
pub fn draw_plan(store: &AnnotationStore, mapper: &CoordinateMapper) -> Vec<Dot> {
    let points = store.points().iter().map(|point| Dot {
        center: mapper.to_canvas(point.pos),
        style: point_style(point, store.route()),
    });
    let waypoints = store.waypoints().iter().map(|waypoint| Dot {
        center: mapper.to_canvas(waypoint.pos),
        style: DotStyle::WAYPOINT,
    });
    points.chain(waypoints).collect()
}

/// Blits the base image into `display_rect` and paints `plan` over it.
pub fn paint(
    painter: &Painter,
    texture: TextureId,
    display_rect: Rect,
    canvas_size: Vec2,
    plan: &[Dot],
) {
    painter.image(
        texture,
        display_rect,
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );

    let scale = display_rect.width() / canvas_size.x.max(1.0);
    for dot in plan {
        let center = mapper::canvas_to_display(dot.center, display_rect, canvas_size);
        painter.circle(
            center,
            dot.style.radius * scale,
            dot.style.fill,
            Stroke::new(dot.style.outline * scale, OUTLINE),
        );
    }
}

#[cfg(test)]
mod tests {
    use egui::vec2;

    use super::{draw_plan, point_style, DotStyle};
    use crate::annotation::Point;
    use crate::mapper::CoordinateMapper;
    use crate::store::AnnotationStore;

    #[test]
    fn style_priority_is_endpoint_then_marker_then_user() {
        let mut store = AnnotationStore::default();
        store.push_point(Point::new(0.0, 0.0), "A1".into(), true);
        store.push_point(Point::new(0.0, 0.0), "B".into(), true);
        store.push_point(Point::new(0.0, 0.0), "C".into(), false);
        store.push_point(Point::new(0.0, 0.0), String::new(), false);
        store.set_route_start("a1");

        let styles: Vec<_> = store
            .points()
            .iter()
            .map(|p| point_style(p, store.route()))
            .collect();
        assert_eq!(
            styles,
            vec![DotStyle::ENDPOINT, DotStyle::MARKER, DotStyle::USER, DotStyle::USER]
        );
    }

    #[test]
    fn plan_layers_points_before_waypoints_in_canvas_space() {
        let mut store = AnnotationStore::default();
        store.add_route_waypoint(Point::new(400.0, 300.0));
        store.push_point(Point::new(200.0, 100.0), "A".into(), false);
        let mapper = CoordinateMapper::new(vec2(800.0, 600.0), vec2(400.0, 300.0));

        let plan = draw_plan(&store, &mapper);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].center, Point::new(100.0, 50.0));
        assert_eq!(plan[0].style, DotStyle::USER);
        assert_eq!(plan[1].center, Point::new(200.0, 150.0));
        assert_eq!(plan[1].style, DotStyle::WAYPOINT);
    }

    #[test]
    fn plan_is_stable_across_repeated_draws() {
        let mut store = AnnotationStore::default();
        store.push_point(Point::new(5.0, 5.0), "X".into(), false);
        let mapper = CoordinateMapper::new(vec2(10.0, 10.0), vec2(10.0, 10.0));
        assert_eq!(draw_plan(&store, &mapper), draw_plan(&store, &mapper));
    }
}
