//! Random non-overlapping placement on the stage
//!
//! The stage is measured in stage pixels (one terminal cell is 1x2 stage
//! pixels). Placement samples uniform positions and rejects boxes that
//! intersect an existing character or an exclusion zone; after a fixed
//! number of failed attempts the stage is declared full.

use rand::Rng;

/// Attempts made before giving up and reporting [`Placement::Full`].
pub const PLACEMENT_ATTEMPTS: u32 = 1000;

/// An axis-aligned box in stage pixels. Edges are exclusive, so boxes that
/// merely touch do not intersect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl StageRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn intersects(&self, other: &StageRect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Outcome of a placement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top-left corner for the new box
    At { x: u32, y: u32 },
    /// No free spot was found within the attempt limit
    Full,
}

/// Find a spot for a `size` box inside `viewport`, keeping `top_margin`
/// stage pixels below the viewport top clear and avoiding every box in
/// `existing` and `exclusions`.
pub fn find_placement(
    viewport: StageRect,
    top_margin: u32,
    size: (u32, u32),
    existing: &[StageRect],
    exclusions: &[StageRect],
    rng: &mut impl Rng,
) -> Placement {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return Placement::Full;
    }

    // The box must fit entirely inside the viewport, below the margin.
    if viewport.width < width || viewport.height < top_margin.saturating_add(height) {
        return Placement::Full;
    }

    let min_x = viewport.x;
    let max_x = viewport.right() - width;
    let min_y = viewport.y + top_margin;
    let max_y = viewport.bottom() - height;

    for _ in 0..PLACEMENT_ATTEMPTS {
        let candidate = StageRect::new(
            rng.gen_range(min_x..=max_x),
            rng.gen_range(min_y..=max_y),
            width,
            height,
        );

        let blocked = existing.iter().any(|r| candidate.intersects(r))
            || exclusions.iter().any(|r| candidate.intersects(r));
        if !blocked {
            return Placement::At {
                x: candidate.x,
                y: candidate.y,
            };
        }
    }

    Placement::Full
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = StageRect::new(0, 0, 5, 5);
        assert!(!a.intersects(&StageRect::new(5, 0, 5, 5)));
        assert!(!a.intersects(&StageRect::new(0, 5, 5, 5)));
        assert!(a.intersects(&StageRect::new(4, 4, 5, 5)));
        assert!(a.intersects(&StageRect::new(2, 2, 1, 1)));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = StageRect::new(0, 0, 10, 10);
        assert!(!a.intersects(&StageRect::new(3, 3, 0, 5)));
    }

    #[test]
    fn test_contains_uses_exclusive_edges() {
        let r = StageRect::new(2, 2, 4, 4);
        assert!(r.contains(2, 2));
        assert!(r.contains(5, 5));
        assert!(!r.contains(6, 2));
        assert!(!r.contains(2, 6));
    }

    #[test]
    fn test_placement_stays_in_bounds_and_below_margin() {
        let mut rng = StdRng::seed_from_u64(7);
        let viewport = StageRect::new(0, 0, 80, 48);

        for _ in 0..200 {
            match find_placement(viewport, 4, (10, 6), &[], &[], &mut rng) {
                Placement::At { x, y } => {
                    assert!(x + 10 <= 80);
                    assert!(y >= 4);
                    assert!(y + 6 <= 48);
                }
                Placement::Full => panic!("empty stage reported full"),
            }
        }
    }

    #[test]
    fn test_placements_never_overlap() {
        let mut rng = StdRng::seed_from_u64(42);
        let viewport = StageRect::new(0, 0, 100, 60);
        let mut placed: Vec<StageRect> = Vec::new();

        loop {
            match find_placement(viewport, 2, (12, 8), &placed, &[], &mut rng) {
                Placement::At { x, y } => placed.push(StageRect::new(x, y, 12, 8)),
                Placement::Full => break,
            }
            assert!(placed.len() < 100, "placement never saturated");
        }

        assert!(placed.len() >= 2);
        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_exclusion_zones_are_avoided() {
        let mut rng = StdRng::seed_from_u64(3);
        let viewport = StageRect::new(0, 0, 40, 40);
        let exclusion = StageRect::new(0, 0, 40, 20);

        for _ in 0..100 {
            if let Placement::At { x, y } =
                find_placement(viewport, 0, (5, 5), &[], &[exclusion], &mut rng)
            {
                let candidate = StageRect::new(x, y, 5, 5);
                assert!(!candidate.intersects(&exclusion));
            }
        }
    }

    #[test]
    fn test_undersized_viewport_is_full() {
        let mut rng = StdRng::seed_from_u64(1);
        let viewport = StageRect::new(0, 0, 8, 8);
        assert_eq!(
            find_placement(viewport, 0, (10, 4), &[], &[], &mut rng),
            Placement::Full
        );
        assert_eq!(
            find_placement(viewport, 6, (4, 4), &[], &[], &mut rng),
            Placement::Full
        );
    }

    #[test]
    fn test_saturated_stage_reports_full() {
        let mut rng = StdRng::seed_from_u64(5);
        let viewport = StageRect::new(0, 0, 20, 20);
        let existing = [StageRect::new(0, 0, 20, 20)];
        assert_eq!(
            find_placement(viewport, 0, (4, 4), &existing, &[], &mut rng),
            Placement::Full
        );
    }
}
