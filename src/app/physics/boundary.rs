use eframe::egui::Vec2;

/// Circular containment area centered on the world origin.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct BoundaryParams {
    pub(in crate::app) max_radius: f32,
    pub(in crate::app) feather: f32,
}

const VIEWPORT_RADIUS_MULTIPLE: f32 = 2.5;
const FEATHER_FRACTION: f32 = 0.1;
const SOFT_PUSH_FRACTION: f32 = 0.18;

impl BoundaryParams {
    /// Sizes the boundary from the viewport: a large multiple of the smaller
    /// dimension, so the feather zone sits well outside the visible canvas at
    /// default zoom.
    pub(in crate::app) fn for_viewport(width: f32, height: f32) -> Self {
        let max_radius = (width.min(height).max(1.0)) * VIEWPORT_RADIUS_MULTIPLE;
        Self {
            max_radius,
            feather: max_radius * FEATHER_FRACTION,
        }
    }
}

/// Two-stage containment: a soft restoring displacement that ramps from zero
/// at the feather zone's inner edge, then a hard radial clamp onto the
/// boundary circle. Guarantees the returned position never exceeds
/// `max_radius` from the origin.
pub(in crate::app) fn contain(params: BoundaryParams, position: Vec2) -> Vec2 {
    let distance = position.length();
    let inner_edge = params.max_radius - params.feather;
    if distance <= inner_edge || distance <= f32::EPSILON {
        return position;
    }

    let direction = position / distance;
    let penetration = ((distance - inner_edge) / params.feather).min(1.0);
    let pushed = distance - (penetration * params.feather * SOFT_PUSH_FRACTION);

    direction * pushed.min(params.max_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn params() -> BoundaryParams {
        BoundaryParams {
            max_radius: 1000.0,
            feather: 100.0,
        }
    }

    #[test]
    fn interior_positions_are_untouched() {
        let position = vec2(300.0, -400.0); // distance 500, well inside
        assert_eq!(contain(params(), position), position);
        assert_eq!(contain(params(), Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn feather_zone_pushes_gently_inward() {
        let position = vec2(950.0, 0.0); // half-way into the feather zone
        let contained = contain(params(), position);
        let distance = contained.length();
        assert!(distance < 950.0, "expected inward push, got {distance}");
        // Gentle, not a snap to the inner edge.
        assert!(distance > 900.0);
        // Direction is preserved.
        assert!(contained.y.abs() < f32::EPSILON);
        assert!(contained.x > 0.0);
    }

    #[test]
    fn push_ramps_with_penetration_depth() {
        let shallow = 910.0 - contain(params(), vec2(910.0, 0.0)).x;
        let deep = 990.0 - contain(params(), vec2(990.0, 0.0)).x;
        assert!(deep > shallow);
    }

    #[test]
    fn beyond_max_radius_is_hard_clamped() {
        let contained = contain(params(), vec2(0.0, 5000.0));
        assert!((contained.length() - 1000.0).abs() < 0.001);
        assert!(contained.y > 0.0);
    }

    #[test]
    fn invariant_holds_for_a_sweep_of_positions() {
        let p = params();
        for step in 0..200 {
            let distance = step as f32 * 11.7;
            let angle = step as f32 * 0.37;
            let position = vec2(angle.cos(), angle.sin()) * distance;
            let contained = contain(p, position);
            assert!(
                contained.length() <= p.max_radius + 0.001,
                "position at distance {distance} escaped containment"
            );
        }
    }

    #[test]
    fn viewport_sizing_uses_smaller_dimension() {
        let p = BoundaryParams::for_viewport(1200.0, 800.0);
        assert_eq!(p.max_radius, 800.0 * 2.5);
        assert_eq!(p.feather, p.max_radius * 0.1);
    }
}
