//! JSON schemas for the points file and the route file.
//!
//! Export writes native image coordinates rounded to whole pixels. Import
//! accepts coordinates declared against any image size (`imageInfo`) and
//! rescales them into the loaded image's native space.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use egui::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotation::{Point, RouteEndpoints};
use crate::error::{PickError, PickResult};
use crate::mapper;
use crate::store::AnnotationStore;

pub const WAYPOINT_TYPE: &str = "waypoint";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Points,
    Route,
}

impl ExportKind {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Route => "route",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            width: size.x.round() as u32,
            height: size.y.round() as u32,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointsFile {
    pub total_points: usize,
    pub image_info: ImageInfo,
    pub points: Vec<PointRecord>,
    pub exported_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    pub index: usize,
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub is_marker: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteFile {
    pub route_info: RouteInfo,
    pub image_info: ImageInfo,
    pub points: Vec<WaypointRecord>,
    pub exported_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub start_point_id: String,
    pub end_point_id: String,
    pub waypoint_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WaypointRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub index: usize,
    pub x: i64,
    pub y: i64,
}

// Lenient shapes used on import: required fields are checked by hand so the
// error names the missing field. `imageInfo` only drives rescaling, so any
// shape is accepted and an unusable one counts as absent.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsDoc {
    points: Option<Vec<RawPoint>>,
    image_info: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPoint {
    x: Option<f64>,
    y: Option<f64>,
    id: Option<Value>,
    is_marker: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteDoc {
    points: Option<Vec<RawWaypoint>>,
    route_info: Option<RawRouteInfo>,
    image_info: Option<Value>,
}

/// Older exports wrote `startPoint`/`endPoint`; the `...Id` keys win when a
/// file carries both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRouteInfo {
    start_point_id: Option<String>,
    end_point_id: Option<String>,
    start_point: Option<String>,
    end_point: Option<String>,
}

#[derive(Deserialize)]
struct RawWaypoint {
    #[serde(rename = "type")]
    kind: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedPoint {
    pub pos: Point,
    pub label: String,
    pub is_marker: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedRoute {
    pub route: RouteEndpoints,
    pub waypoints: Vec<Point>,
}

pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn whole(value: f32) -> i64 {
    value.round() as i64
}

pub fn encode_points(store: &AnnotationStore, image: ImageInfo, now: DateTime<Utc>) -> PointsFile {
    let points: Vec<PointRecord> = store
        .points()
        .iter()
        .enumerate()
        .map(|(index, point)| PointRecord {
            index: index + 1,
            id: point.label.clone(),
            x: whole(point.pos.x),
            y: whole(point.pos.y),
            is_marker: point.is_marker,
        })
        .collect();
    PointsFile {
        total_points: points.len(),
        image_info: image,
        points,
        exported_at: timestamp(now),
    }
}

pub fn encode_route(store: &AnnotationStore, image: ImageInfo, now: DateTime<Utc>) -> RouteFile {
    RouteFile {
        route_info: RouteInfo {
            start_point_id: store.route().start.clone(),
            end_point_id: store.route().end.clone(),
            waypoint_count: store.waypoint_count(),
        },
        image_info: image,
        points: store
            .waypoints()
            .iter()
            .enumerate()
            .map(|(index, waypoint)| WaypointRecord {
                kind: WAYPOINT_TYPE.to_string(),
                index: index + 1,
                x: whole(waypoint.pos.x),
                y: whole(waypoint.pos.y),
            })
            .collect(),
        exported_at: timestamp(now),
    }
}

pub fn to_pretty_json<T: Serialize>(file: &T) -> PickResult<String> {
    Ok(serde_json::to_string_pretty(file)?)
}

fn declared_size(info: &Value) -> Option<Vec2> {
    let width = info.get("width")?.as_f64()?;
    let height = info.get("height")?.as_f64()?;
    let usable = |side: f64| side.is_finite() && side > 0.0;
    (usable(width) && usable(height)).then(|| Vec2::new(width as f32, height as f32))
}

fn source_size(info: Option<&Value>, target: Vec2) -> Vec2 {
    match info.and_then(declared_size) {
        Some(size) => size,
        None => {
            if info.is_some() {
                log::warn!("ignoring unusable imageInfo, taking coordinates as native");
            }
            target
        }
    }
}

fn label_text(id: Option<Value>, entry: usize) -> PickResult<String> {
    match id {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(scalar.to_string()),
        Some(_) => Err(PickError::Parse(format!(
            "entry {entry} in `points` has an `id` that is not text"
        ))),
    }
}

fn required_xy(x: Option<f64>, y: Option<f64>, entry: usize) -> PickResult<Point> {
    match (x, y) {
        (Some(x), Some(y)) => Ok(Point::new(x as f32, y as f32)),
        _ => Err(PickError::Parse(format!(
            "entry {entry} in `points` is missing `x` or `y`"
        ))),
    }
}

/// Parses a points file and returns its entries in `target` native space.
pub fn decode_points(text: &str, target: Vec2) -> PickResult<Vec<ImportedPoint>> {
    let doc: PointsDoc = serde_json::from_str(text)?;
    let raw = doc
        .points
        .ok_or_else(|| PickError::Parse("missing `points` array".to_string()))?;
    let from = source_size(doc.image_info.as_ref(), target);

    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let pos = required_xy(entry.x, entry.y, index + 1)?;
            Ok(ImportedPoint {
                pos: mapper::rescale(pos, from, target).rounded(),
                label: label_text(entry.id, index + 1)?,
                is_marker: entry.is_marker.unwrap_or(false),
            })
        })
        .collect()
}

/// Parses a route file. Only `"waypoint"` entries are consumed.
pub fn decode_route(text: &str, target: Vec2) -> PickResult<ImportedRoute> {
    let doc: RouteDoc = serde_json::from_str(text)?;
    let (Some(raw), Some(info)) = (doc.points, doc.route_info) else {
        return Err(PickError::Parse(
            "route file needs both `points` and `routeInfo`".to_string(),
        ));
    };
    let from = source_size(doc.image_info.as_ref(), target);

    let waypoints = raw
        .into_iter()
        .enumerate()
        .filter(|(_, entry)| entry.kind.as_deref() == Some(WAYPOINT_TYPE))
        .map(|(index, entry)| {
            let pos = required_xy(entry.x, entry.y, index + 1)?;
            Ok(mapper::rescale(pos, from, target).rounded())
        })
        .collect::<PickResult<Vec<_>>>()?;

    Ok(ImportedRoute {
        route: RouteEndpoints::new(
            info.start_point_id
                .or(info.start_point)
                .as_deref()
                .unwrap_or_default(),
            info.end_point_id.or(info.end_point).as_deref().unwrap_or_default(),
        ),
        waypoints,
    })
}

/// `<base>_points.json`, or a date-stamped name when the image name is unknown.
pub fn suggested_file_name(base: Option<&str>, kind: ExportKind, today: NaiveDate) -> String {
    match base.filter(|base| !base.is_empty()) {
        Some(base) => format!("{base}_{}.json", kind.suffix()),
        None => format!("{}_{}.json", kind.suffix(), today.format("%Y-%m-%d")),
    }
}
