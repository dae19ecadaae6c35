//! Polyline simplification (Ramer–Douglas–Peucker).
//!
//! Iterative with an explicit work stack, so stack depth does not grow with
//! the length of the traced route. Output is always a subsequence of the
//! input that keeps both endpoints.

use crate::core::WorldPoint;

/// Squared perpendicular distance from `point` to the infinite line through
/// `line_start` and `line_end`. Falls back to point distance when the two
/// line points coincide.
fn perpendicular_distance_squared(
    point: &WorldPoint,
    line_start: &WorldPoint,
    line_end: &WorldPoint,
) -> f64 {
    let direction = *line_end - *line_start;
    let length_sq = direction.norm_squared();
    if length_sq == 0.0 {
        return point.distance_squared(line_start);
    }
    let offset = *point - *line_start;
    offset.cross(&direction).norm_squared() / length_sq
}

/// Perpendicular distance from `point` to the line through the two others
pub fn perpendicular_distance(
    point: &WorldPoint,
    line_start: &WorldPoint,
    line_end: &WorldPoint,
) -> f64 {
    perpendicular_distance_squared(point, line_start, line_end).sqrt()
}

/// Indices of the points kept by simplification with tolerance `epsilon`.
///
/// `epsilon <= 0` keeps every point.
pub fn simplify_indices(points: &[WorldPoint], epsilon: f64) -> Vec<usize> {
    let n = points.len();
    if n <= 2 || epsilon <= 0.0 {
        return (0..n).collect();
    }

    let epsilon_sq = epsilon * epsilon;
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }

        let mut max_distance_sq = 0.0;
        let mut split = first;
        for (i, point) in points.iter().enumerate().take(last).skip(first + 1) {
            let d = perpendicular_distance_squared(point, &points[first], &points[last]);
            if d > max_distance_sq {
                max_distance_sq = d;
                split = i;
            }
        }

        if max_distance_sq > epsilon_sq {
            keep[split] = true;
            // Left half is processed first, matching the recursive order
            stack.push((split, last));
            stack.push((first, split));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}

/// Simplify a polyline, returning the kept points.
pub fn simplify_polyline(points: &[WorldPoint], epsilon: f64) -> Vec<WorldPoint> {
    simplify_indices(points, epsilon)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> WorldPoint {
        WorldPoint::new(x, y, 0.0)
    }

    #[test]
    fn test_short_inputs_unchanged() {
        assert!(simplify_polyline(&[], 1.0).is_empty());
        assert_eq!(simplify_polyline(&[p(1.0, 1.0)], 1.0), vec![p(1.0, 1.0)]);
        let two = [p(0.0, 0.0), p(5.0, 5.0)];
        assert_eq!(simplify_polyline(&two, 1.0), two.to_vec());
    }

    #[test]
    fn test_collinear_collapses() {
        let line: Vec<WorldPoint> = (0..10).map(|i| p(i as f64, 2.0 * i as f64)).collect();
        assert_eq!(simplify_indices(&line, 0.01), vec![0, 9]);
    }

    #[test]
    fn test_corner_kept() {
        let path = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(2.0, 2.0)];
        assert_eq!(simplify_indices(&path, 0.1), vec![0, 2, 4]);
    }

    #[test]
    fn test_zero_epsilon_keeps_everything() {
        let line: Vec<WorldPoint> = (0..5).map(|i| p(i as f64, 0.0)).collect();
        assert_eq!(simplify_polyline(&line, 0.0), line);
    }

    #[test]
    fn test_closed_loop_uses_point_distance() {
        let loop_path = vec![p(0.0, 0.0), p(3.0, 4.0), p(0.0, 0.0)];
        assert_eq!(simplify_indices(&loop_path, 1.0), vec![0, 1, 2]);
    }

    #[test]
    fn test_perpendicular_distance_3d() {
        let d = perpendicular_distance(
            &WorldPoint::new(0.0, 3.0, 4.0),
            &WorldPoint::new(-1.0, 0.0, 0.0),
            &WorldPoint::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_zigzag_keeps_every_corner() {
        // Every point is a corner; splits are maximally unbalanced
        let zigzag: Vec<WorldPoint> = (0..5_000)
            .map(|i| p(i as f64, if i % 2 == 0 { 0.0 } else { 10.0 }))
            .collect();
        let kept = simplify_indices(&zigzag, 0.5);
        assert_eq!(kept.len(), zigzag.len());
    }
}
