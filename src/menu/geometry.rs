use super::{INNER_RADIUS_RATIO, MINIMUM_SECTORS, SECTOR_SPACING_RATIO};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Wraps `index` into `[0, count)` by adding or subtracting `count` once.
/// Callers keep `index` within one period of the valid range, so a single
/// correction is always enough.
pub fn resolve_loop_index(index: i64, count: i64) -> i64 {
    if index < 0 {
        index + count
    } else if index >= count {
        index - count
    } else {
        index
    }
}

/// Angle convention: degrees, 0° along +Y, increasing clockwise.
pub fn polar_to_cartesian(angle_deg: f64, radius: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(rad.sin() * radius, rad.cos() * radius)
}

/// Sector layout for one menu level: a ring of `sector_count` wedges, each
/// either bound to an item of the sibling list or left as a dummy filler.
/// Pure function of (item count, radius); owns no mutable state.
#[derive(Debug, Clone)]
pub struct SectorLayout {
    item_count: usize,
    sector_count: usize,
    radius: f64,
    angle_step: f64,
    angle_shift: f64,
    spacing: f64,
}

impl SectorLayout {
    pub fn new(item_count: usize, radius: f64) -> Self {
        let sector_count = item_count.max(MINIMUM_SECTORS);
        let angle_step = 360.0 / sector_count as f64;
        Self {
            item_count,
            sector_count,
            radius,
            angle_step,
            // Rotate the ring so the first logical item sits in the
            // top-centered wedge.
            angle_shift: angle_step / 2.0 + 270.0,
            spacing: SECTOR_SPACING_RATIO * radius,
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn sector_count(&self) -> usize {
        self.sector_count
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn inner_radius(&self) -> f64 {
        INNER_RADIUS_RATIO * self.radius
    }

    pub fn center_radius(&self) -> f64 {
        self.inner_radius() - self.spacing / 3.0
    }

    /// Angular span `[start, end)` of wedge `i`, in degrees.
    pub fn span(&self, wedge: usize) -> (f64, f64) {
        let start = self.angle_shift + self.angle_step * wedge as f64;
        (start, start + self.angle_step)
    }

    /// Centering heuristic for sparse rings: 1-3 items shift by one extra
    /// wedge so they sit symmetrically instead of left-biased. The
    /// thresholds are deliberate, not derived.
    fn index_offset(&self) -> i64 {
        if (1..=3).contains(&self.item_count) {
            -2
        } else {
            -1
        }
    }

    /// Item shown in wedge `wedge`, or `None` for a dummy wedge.
    pub fn item_index(&self, wedge: usize) -> Option<usize> {
        let n = self.sector_count as i64;
        let idx = resolve_loop_index(n - wedge as i64 + self.index_offset(), n);
        (idx >= 0 && (idx as usize) < self.item_count).then_some(idx as usize)
    }

    /// Inverse of [`Self::item_index`].
    pub fn wedge_for_item(&self, item: usize) -> Option<usize> {
        if item >= self.item_count {
            return None;
        }
        let n = self.sector_count as i64;
        Some(resolve_loop_index(n + self.index_offset() - item as i64, n) as usize)
    }

    /// Uniform gap between adjacent wedges is produced by scaling each
    /// wedge's rendered content around its own centroid, keeping the path
    /// math full-width: `scale = (r - delta) / r` where `delta` is the radius
    /// lost to distributing `spacing * sector_count` around the circle.
    pub fn content_scale(&self) -> f64 {
        let circumference = 2.0 * PI * self.radius;
        let radius_delta =
            self.radius - (circumference - self.spacing * self.sector_count as f64) / (2.0 * PI);
        (self.radius - radius_delta) / self.radius
    }

    /// Centroid of wedge `wedge`, around which its content is scaled.
    pub fn sector_center(&self, wedge: usize) -> Point {
        let (start, end) = self.span(wedge);
        let mid_radius = (self.inner_radius() + self.radius) / 2.0;
        polar_to_cartesian((start + end) / 2.0, mid_radius)
    }

    /// Hit test: wedge under a point given relative to the ring origin, if
    /// the point falls within the annulus.
    pub fn wedge_at(&self, p: Point) -> Option<usize> {
        let dist = p.x.hypot(p.y);
        if dist <= self.inner_radius() || dist > self.radius {
            return None;
        }
        let angle = p.x.atan2(p.y).to_degrees();
        let wedge = ((angle - self.angle_shift).rem_euclid(360.0) / self.angle_step) as usize;
        Some(wedge.min(self.sector_count - 1))
    }

    /// Hit test for the center disk (close/return target).
    pub fn in_center(&self, p: Point) -> bool {
        p.x.hypot(p.y) <= self.center_radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_index_wraps_exactly_once() {
        for n in 1..=9i64 {
            for x in -n..2 * n {
                let idx = resolve_loop_index(x, n);
                assert!((0..n).contains(&idx), "x={x} n={n} gave {idx}");
            }
        }
    }

    #[test]
    fn loop_index_is_identity_in_range() {
        for n in 1..=9i64 {
            for x in 0..n {
                assert_eq!(resolve_loop_index(x, n), x);
            }
        }
    }

    #[test]
    fn sector_count_has_a_floor_of_six() {
        assert_eq!(SectorLayout::new(1, 50.0).sector_count(), 6);
        assert_eq!(SectorLayout::new(6, 50.0).sector_count(), 6);
        assert_eq!(SectorLayout::new(9, 50.0).sector_count(), 9);
    }

    #[test]
    fn every_wedge_maps_to_a_valid_item_or_dummy() {
        for item_count in 1..=12 {
            let layout = SectorLayout::new(item_count, 50.0);
            let mut seen = vec![false; item_count];
            for wedge in 0..layout.sector_count() {
                if let Some(idx) = layout.item_index(wedge) {
                    assert!(idx < item_count);
                    assert!(!seen[idx], "item {idx} mapped twice");
                    seen[idx] = true;
                }
            }
            assert!(seen.iter().all(|&s| s), "every item gets a wedge");
        }
    }

    #[test]
    fn full_ring_has_no_dummies() {
        let layout = SectorLayout::new(8, 50.0);
        assert_eq!(layout.sector_count(), 8);
        for wedge in 0..8 {
            assert!(layout.item_index(wedge).is_some());
        }
    }

    #[test]
    fn single_item_lands_in_the_centered_wedge() {
        let layout = SectorLayout::new(1, 50.0);
        assert_eq!(layout.sector_count(), 6);
        // offset -2 for sparse rings: the lone item occupies wedge 4
        assert_eq!(layout.item_index(4), Some(0));
        let dummies = (0..6).filter(|&w| layout.item_index(w).is_none()).count();
        assert_eq!(dummies, 5);
    }

    #[test]
    fn sparse_offset_applies_only_up_to_three_items() {
        for n in 1..=3 {
            let layout = SectorLayout::new(n, 50.0);
            assert_eq!(layout.item_index(4), Some(0), "n={n}");
        }
        let layout = SectorLayout::new(4, 50.0);
        assert_eq!(layout.item_index(5), Some(0));
    }

    #[test]
    fn wedge_for_item_inverts_item_index() {
        for item_count in 1..=12 {
            let layout = SectorLayout::new(item_count, 50.0);
            for item in 0..item_count {
                let wedge = layout.wedge_for_item(item).unwrap();
                assert_eq!(layout.item_index(wedge), Some(item));
            }
            assert_eq!(layout.wedge_for_item(item_count), None);
        }
    }

    #[test]
    fn content_scale_shrinks_with_more_sectors() {
        let few = SectorLayout::new(6, 50.0).content_scale();
        let many = SectorLayout::new(12, 50.0).content_scale();
        assert!(few < 1.0);
        assert!(many < few);
        assert!(many > 0.0);
    }

    #[test]
    fn polar_convention_points_up_at_zero() {
        let p = polar_to_cartesian(0.0, 10.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
        let q = polar_to_cartesian(90.0, 10.0);
        assert!((q.x - 10.0).abs() < 1e-9);
        assert!(q.y.abs() < 1e-9);
    }

    #[test]
    fn wedge_hit_test_matches_sector_centers() {
        let layout = SectorLayout::new(7, 50.0);
        for wedge in 0..layout.sector_count() {
            let c = layout.sector_center(wedge);
            assert_eq!(layout.wedge_at(c), Some(wedge));
        }
    }

    #[test]
    fn hit_test_rejects_center_and_outside() {
        let layout = SectorLayout::new(6, 50.0);
        assert_eq!(layout.wedge_at(Point::new(0.0, 0.0)), None);
        assert_eq!(layout.wedge_at(Point::new(0.0, 500.0)), None);
        assert!(layout.in_center(Point::new(0.0, 0.0)));
        assert!(!layout.in_center(Point::new(0.0, layout.inner_radius())));
    }

    #[test]
    fn center_disk_leaves_a_gap_to_the_ring() {
        let layout = SectorLayout::new(6, 50.0);
        assert!(layout.center_radius() < layout.inner_radius());
        assert!(layout.center_radius() > 0.0);
    }
}
