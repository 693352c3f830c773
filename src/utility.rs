use macroquad::{
    color::Color,
    math::{Rect, Vec2},
};

use crate::geometry::{Disc, Stroke};

/// Points to append when the pointer moves from `from` to `to` mid gesture.
///
/// Moves shorter than `min_distance` yield nothing. Longer moves are split
/// into even steps no longer than `step`, ending exactly at `to`.
pub fn sample_segment(from: Vec2, to: Vec2, min_distance: f32, step: f32) -> Vec<Vec2> {
    let distance = from.distance(to);
    if distance <= min_distance {
        return Vec::new();
    }
    if step <= 0.0 || distance <= step {
        return vec![to];
    }

    let steps = (distance / step).ceil() as usize;
    (1..=steps)
        .map(|i| {
            if i == steps {
                to
            } else {
                from.lerp(to, i as f32 / steps as f32)
            }
        })
        .collect()
}

pub(crate) fn disc_hit(disc: &Disc, pos: Vec2, radius: f32) -> bool {
    disc.center().distance(pos) <= disc.radius + radius
}

pub fn stroke_intersect(stroke: &Stroke, pos: Vec2, radius: f32) -> bool {
    stroke.discs().iter().any(|d| disc_hit(d, pos, radius))
}

/// Ascending indices of every stroke the eraser circle touches.
pub fn strokes_hit(strokes: &[Stroke], pos: Vec2, radius: f32) -> Vec<usize> {
    strokes
        .iter()
        .enumerate()
        .filter(|(_, s)| stroke_intersect(s, pos, radius))
        .map(|(i, _)| i)
        .collect()
}

/// `(min_x, max_x, min_y, max_y)` of all discs, radii included.
pub fn stroke_bounding_box(discs: &[Disc]) -> (f32, f32, f32, f32) {
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for d in discs {
        min_x = min_x.min(d.center_x - d.radius);
        max_x = max_x.max(d.center_x + d.radius);
        min_y = min_y.min(d.center_y - d.radius);
        max_y = max_y.max(d.center_y + d.radius);
    }
    (min_x, max_x, min_y, max_y)
}

pub fn is_stroke_visible(stroke: &Stroke, view: Rect) -> bool {
    if stroke.discs().is_empty() {
        return false;
    }
    let (min_x, max_x, min_y, max_y) = stroke_bounding_box(stroke.discs());

    // aabb
    !(max_x < view.left() || min_x > view.right() || max_y < view.top() || min_y > view.bottom())
}

pub(crate) fn color_u8(color: Color) -> [u8; 4] {
    [
        (color.r * 255.0) as u8,
        (color.g * 255.0) as u8,
        (color.b * 255.0) as u8,
        (color.a * 255.0) as u8,
    ]
}

/// Reverses the row order of a tightly packed image in place.
pub fn flip_rows(bytes: &mut [u8], width: usize, height: usize, bytes_per_pixel: usize) {
    let row = width * bytes_per_pixel;
    if row == 0 || bytes.len() < row * height {
        return;
    }
    for y in 0..height / 2 {
        let (top, bottom) = bytes.split_at_mut((height - 1 - y) * row);
        top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rgb;
    use macroquad::math::vec2;

    #[test]
    fn tiny_moves_are_dropped() {
        assert!(sample_segment(vec2(0.0, 0.0), vec2(0.005, 0.0), 0.01, 0.05).is_empty());
    }

    #[test]
    fn short_moves_add_only_target() {
        let pts = sample_segment(vec2(0.0, 0.0), vec2(0.03, 0.0), 0.01, 0.05);
        assert_eq!(pts, vec![vec2(0.03, 0.0)]);
    }

    #[test]
    fn long_moves_are_filled_in() {
        let pts = sample_segment(vec2(0.0, 0.0), vec2(0.18, 0.0), 0.01, 0.05);
        assert_eq!(pts.len(), 4);
        assert_eq!(*pts.last().unwrap(), vec2(0.18, 0.0));
        let mut prev = vec2(0.0, 0.0);
        for p in &pts {
            assert!(prev.distance(*p) <= 0.05 + 1e-5);
            prev = *p;
        }
    }

    #[test]
    fn hit_test_accounts_for_disc_radius() {
        let strokes = vec![
            Stroke::new(vec![Disc::new(0.0, 0.0, 0.1)], Rgb::BLACK, 0.1),
            Stroke::new(vec![Disc::new(1.0, 0.0, 0.1)], Rgb::BLACK, 0.1),
            Stroke::new(vec![Disc::new(5.0, 5.0, 0.1), Disc::new(0.25, 0.0, 0.1)], Rgb::BLACK, 0.1),
        ];
        assert_eq!(strokes_hit(&strokes, vec2(0.12, 0.0), 0.05), vec![0, 2]);
        assert!(strokes_hit(&strokes, vec2(3.0, 3.0), 0.05).is_empty());
    }

    #[test]
    fn bounding_box_includes_radius() {
        let discs = [Disc::new(0.0, 0.0, 0.5), Disc::new(2.0, 1.0, 0.25)];
        assert_eq!(stroke_bounding_box(&discs), (-0.5, 2.25, -0.5, 1.25));
    }

    #[test]
    fn visibility_uses_bounding_box() {
        let s = Stroke::new(vec![Disc::new(10.0, 10.0, 0.5)], Rgb::BLACK, 0.5);
        assert!(!is_stroke_visible(&s, Rect::new(-2.0, -2.0, 4.0, 4.0)));
        assert!(is_stroke_visible(&s, Rect::new(9.0, 9.0, 4.0, 4.0)));
    }

    #[test]
    fn flip_rows_reverses_rows() {
        // 1 px wide, 3 rows, 1 byte per pixel
        let mut bytes = vec![1, 2, 3];
        flip_rows(&mut bytes, 1, 3, 1);
        assert_eq!(bytes, vec![3, 2, 1]);

        let mut bytes = vec![1, 1, 2, 2];
        flip_rows(&mut bytes, 2, 2, 1);
        assert_eq!(bytes, vec![2, 2, 1, 1]);
    }
}
