//! Alignment and even distribution.

use super::{Alignment, Axis};
use crate::scene::Scene;
use crate::shapes::{SceneObject, ShapeId};
use kurbo::{Point, Rect, Size};

/// Scaled, unrotated box of an object.
fn object_box(object: &SceneObject) -> Rect {
    Rect::from_origin_size(
        (object.x(), object.y()),
        (object.scaled_width(), object.scaled_height()),
    )
}

/// New top-left corner for a box aligned within the canvas.
pub fn align_to_canvas(rect: Rect, canvas: Size, alignment: Alignment) -> Point {
    let (x, y) = (rect.x0, rect.y0);
    match alignment {
        Alignment::Left => Point::new(0.0, y),
        Alignment::Right => Point::new(canvas.width - rect.width(), y),
        Alignment::Top => Point::new(x, 0.0),
        Alignment::Bottom => Point::new(x, canvas.height - rect.height()),
        Alignment::CenterHorizontal => Point::new((canvas.width - rect.width()) / 2.0, y),
        Alignment::CenterVertical => Point::new(x, (canvas.height - rect.height()) / 2.0),
    }
}

/// New top-left corners for boxes aligned against their combined bounds.
///
/// Returns `None` for fewer than two boxes.
pub fn align_objects(rects: &[Rect], alignment: Alignment) -> Option<Vec<Point>> {
    if rects.len() < 2 {
        return None;
    }
    let min_x = rects.iter().map(|r| r.x0).fold(f64::INFINITY, f64::min);
    let max_x = rects.iter().map(|r| r.x1).fold(f64::NEG_INFINITY, f64::max);
    let min_y = rects.iter().map(|r| r.y0).fold(f64::INFINITY, f64::min);
    let max_y = rects.iter().map(|r| r.y1).fold(f64::NEG_INFINITY, f64::max);
    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;

    Some(
        rects
            .iter()
            .map(|r| match alignment {
                Alignment::Left => Point::new(min_x, r.y0),
                Alignment::Right => Point::new(max_x - r.width(), r.y0),
                Alignment::Top => Point::new(r.x0, min_y),
                Alignment::Bottom => Point::new(r.x0, max_y - r.height()),
                Alignment::CenterHorizontal => Point::new(center_x - r.width() / 2.0, r.y0),
                Alignment::CenterVertical => Point::new(r.x0, center_y - r.height() / 2.0),
            })
            .collect(),
    )
}

/// New top-left corners spreading boxes evenly across their combined span.
///
/// Boxes are laid out in ascending order of position on `axis`, starting at
/// the lowest edge, with equal gaps between neighbours. Returns `None` for
/// fewer than two boxes. Output order matches input order.
pub fn distribute(rects: &[Rect], axis: Axis) -> Option<Vec<Point>> {
    if rects.len() < 2 {
        return None;
    }
    let (start, extent): (fn(&Rect) -> f64, fn(&Rect) -> f64) = match axis {
        Axis::Horizontal => (|r: &Rect| r.x0, |r: &Rect| r.width()),
        Axis::Vertical => (|r: &Rect| r.y0, |r: &Rect| r.height()),
    };

    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| start(&rects[a]).total_cmp(&start(&rects[b])));

    let min = rects.iter().map(start).fold(f64::INFINITY, f64::min);
    let max = rects
        .iter()
        .map(|r| start(r) + extent(r))
        .fold(f64::NEG_INFINITY, f64::max);
    let total: f64 = rects.iter().map(extent).sum();
    let spacing = (max - min - total) / (rects.len() - 1) as f64;

    let mut result: Vec<Point> = rects.iter().map(|r| r.origin()).collect();
    let mut cursor = min;
    for i in order {
        let r = &rects[i];
        result[i] = match axis {
            Axis::Horizontal => Point::new(cursor, r.y0),
            Axis::Vertical => Point::new(r.x0, cursor),
        };
        cursor += extent(r) + spacing;
    }
    Some(result)
}

fn active_boxes(scene: &Scene) -> Vec<(ShapeId, Rect)> {
    scene
        .active_objects()
        .into_iter()
        .filter_map(|id| scene.get(id).map(|o| (id, object_box(o))))
        .collect()
}

fn apply_positions(scene: &mut Scene, ids: &[ShapeId], positions: &[Point]) {
    for (&id, p) in ids.iter().zip(positions) {
        if let Some(object) = scene.get_mut(id) {
            object.set_x(p.x);
            object.set_y(p.y);
        }
    }
    scene.request_render();
}

/// Align the active selection: a single object against the canvas, several
/// objects against their combined bounds. Returns false with nothing active.
pub fn align_selection(scene: &mut Scene, alignment: Alignment) -> bool {
    let boxes = active_boxes(scene);
    let (ids, rects): (Vec<ShapeId>, Vec<Rect>) = boxes.into_iter().unzip();
    let positions = match rects.as_slice() {
        [] => return false,
        [single] => vec![align_to_canvas(*single, scene.size(), alignment)],
        _ => match align_objects(&rects, alignment) {
            Some(positions) => positions,
            None => return false,
        },
    };
    log::debug!("Aligned {} object(s) {:?}", ids.len(), alignment);
    apply_positions(scene, &ids, &positions);
    true
}

/// Distribute the active selection evenly. Returns false below two objects.
pub fn distribute_selection(scene: &mut Scene, axis: Axis) -> bool {
    let (ids, rects): (Vec<ShapeId>, Vec<Rect>) = active_boxes(scene).into_iter().unzip();
    let Some(positions) = distribute(&rects, axis) else {
        return false;
    };
    log::debug!("Distributed {} objects {:?}", ids.len(), axis);
    apply_positions(scene, &ids, &positions);
    true
}
