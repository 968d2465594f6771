//! World bounds: an axis-aligned rectangle that follows its owner entity.
//!
//! The rectangle is centred on the [`BoundsOwner`]'s current translation and
//! recomputed on every query, so a moving owner drags the play area with it.
//! When no owner exists every bounds check is skipped and movement and
//! projectiles are unconstrained.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

/// Pure rectangle geometry: centre plus half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsRect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl BoundsRect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size.abs() * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// `true` iff `pos` lies in `[min, max]` on both axes (edges included).
    pub fn contains(&self, pos: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
    }

    /// Per-axis clamp into the rectangle.
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        pos.clamp(self.min(), self.max())
    }

    /// Point on the boundary closest to `pos`.
    ///
    /// Inside, this snaps to the nearest edge, keeping the other coordinate.
    /// Ties resolve in the order left, right, bottom, top.  Outside, it is the
    /// same as [`BoundsRect::clamp`].
    pub fn closest_point_on_bounds(&self, pos: Vec2) -> Vec2 {
        if !self.contains(pos) {
            return self.clamp(pos);
        }

        let (min, max) = (self.min(), self.max());
        let edges = [
            (pos.x - min.x, Vec2::new(min.x, pos.y)),
            (max.x - pos.x, Vec2::new(max.x, pos.y)),
            (pos.y - min.y, Vec2::new(pos.x, min.y)),
            (max.y - pos.y, Vec2::new(pos.x, max.y)),
        ];

        let mut best = edges[0];
        for edge in &edges[1..] {
            // Strict comparison keeps the earliest edge on ties.
            if edge.0 < best.0 {
                best = *edge;
            }
        }
        best.1
    }
}

/// Marks the entity that defines the active world rectangle.
///
/// Only one owner is expected; with several, none is used and bounds are
/// treated as absent.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoundsOwner {
    /// Full width/height of the rectangle.
    pub size: Vec2,
}

impl BoundsOwner {
    pub fn rect_at(&self, center: Vec2) -> BoundsRect {
        BoundsRect::new(center, self.size)
    }
}

/// Entities carrying this marker are despawned once they leave the bounds.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DespawnOutOfBounds;

/// System parameter giving read access to the current bounds, if any.
#[derive(SystemParam)]
pub struct WorldBounds<'w, 's> {
    owners: Query<'w, 's, (&'static BoundsOwner, &'static Transform)>,
}

impl WorldBounds<'_, '_> {
    /// Rectangle around the owner's current position, or `None` when there
    /// is no single owner.
    pub fn rect(&self) -> Option<BoundsRect> {
        self.owners
            .single()
            .ok()
            .map(|(owner, transform)| owner.rect_at(transform.translation.truncate()))
    }
}

/// Despawn [`DespawnOutOfBounds`] entities whose position left the bounds.
pub fn despawn_out_of_bounds_system(
    mut commands: Commands,
    bounds: WorldBounds,
    q: Query<(Entity, &Transform), With<DespawnOutOfBounds>>,
) {
    let Some(rect) = bounds.rect() else {
        return;
    };

    for (entity, transform) in q.iter() {
        if !rect.contains(transform.translation.truncate()) {
            debug!("[bounds] {:?} left the world bounds; despawning", entity);
            commands.entity(entity).despawn();
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_rect() -> BoundsRect {
        // x in [-5, 5], y in [-5, 5]
        BoundsRect::new(Vec2::ZERO, Vec2::new(10.0, 10.0))
    }

    #[test]
    fn contains_includes_edges() {
        let rect = unit_rect();
        assert!(rect.contains(Vec2::ZERO));
        assert!(rect.contains(Vec2::new(5.0, -5.0)));
        assert!(!rect.contains(Vec2::new(5.01, 0.0)));
        assert!(!rect.contains(Vec2::new(0.0, -5.01)));
    }

    #[test]
    fn rect_follows_center() {
        let rect = BoundsRect::new(Vec2::new(100.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(rect.contains(Vec2::new(104.0, 0.0)));
        assert!(!rect.contains(Vec2::ZERO));
    }

    #[test]
    fn clamp_is_idempotent() {
        let rect = unit_rect();
        let samples = [
            Vec2::new(12.0, -30.0),
            Vec2::new(-5.5, 2.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-100.0, 100.0),
        ];
        for p in samples {
            let once = rect.clamp(p);
            assert_eq!(rect.clamp(once), once, "clamp not idempotent for {p:?}");
            assert!(rect.contains(once));
        }
    }

    #[test]
    fn closest_point_inside_snaps_to_nearest_edge() {
        let rect = unit_rect();

        // 1 unit from the right edge, far from the others.
        assert_eq!(
            rect.closest_point_on_bounds(Vec2::new(4.0, 0.5)),
            Vec2::new(5.0, 0.5)
        );
        // Nearest edge is the bottom.
        assert_eq!(
            rect.closest_point_on_bounds(Vec2::new(0.5, -4.5)),
            Vec2::new(0.5, -5.0)
        );
        // Nearest edge is the top.
        assert_eq!(
            rect.closest_point_on_bounds(Vec2::new(-1.0, 3.0)),
            Vec2::new(-1.0, 5.0)
        );
    }

    #[test]
    fn closest_point_tie_prefers_left_then_right_then_bottom() {
        let rect = unit_rect();

        // Centre: all four edges tie → left wins.
        assert_eq!(
            rect.closest_point_on_bounds(Vec2::ZERO),
            Vec2::new(-5.0, 0.0)
        );
        // Right and top tie at 1.0 → right wins.
        assert_eq!(
            rect.closest_point_on_bounds(Vec2::new(4.0, 4.0)),
            Vec2::new(5.0, 4.0)
        );
        // Wide, short rect: bottom and top tie at the centre, sides are far.
        let wide = BoundsRect::new(Vec2::ZERO, Vec2::new(100.0, 4.0));
        assert_eq!(
            wide.closest_point_on_bounds(Vec2::ZERO),
            Vec2::new(0.0, -2.0)
        );
    }

    #[test]
    fn closest_point_inside_lies_on_exactly_one_edge() {
        let rect = unit_rect();
        let p = Vec2::new(2.0, 3.5);
        let q = rect.closest_point_on_bounds(p);
        let on_x_edge = q.x == rect.min().x || q.x == rect.max().x;
        let on_y_edge = q.y == rect.min().y || q.y == rect.max().y;
        assert!(on_x_edge ^ on_y_edge, "{q:?} should sit on one edge");
        if on_x_edge {
            assert_eq!(q.y, p.y);
        } else {
            assert_eq!(q.x, p.x);
        }
    }

    #[test]
    fn closest_point_outside_equals_clamp() {
        let rect = unit_rect();
        for p in [Vec2::new(9.0, 1.0), Vec2::new(-7.0, -7.0), Vec2::new(0.0, 5.5)] {
            assert_eq!(rect.closest_point_on_bounds(p), rect.clamp(p));
        }
    }

    // ── system tests ──────────────────────────────────────────────────────────

    fn bounds_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, despawn_out_of_bounds_system);
        app
    }

    #[test]
    fn out_of_bounds_marker_despawns_only_outside_entities() {
        let mut app = bounds_test_app();
        app.world_mut().spawn((
            BoundsOwner {
                size: Vec2::new(10.0, 10.0),
            },
            Transform::default(),
        ));
        let inside = app
            .world_mut()
            .spawn((DespawnOutOfBounds, Transform::from_xyz(1.0, 1.0, 0.0)))
            .id();
        let outside = app
            .world_mut()
            .spawn((DespawnOutOfBounds, Transform::from_xyz(8.0, 0.0, 0.0)))
            .id();
        let unmarked = app
            .world_mut()
            .spawn(Transform::from_xyz(8.0, 0.0, 0.0))
            .id();

        app.update();

        assert!(app.world().get_entity(inside).is_ok());
        assert!(app.world().get_entity(outside).is_err());
        assert!(app.world().get_entity(unmarked).is_ok());
    }

    #[test]
    fn missing_owner_disables_bounds_despawn() {
        let mut app = bounds_test_app();
        let far = app
            .world_mut()
            .spawn((DespawnOutOfBounds, Transform::from_xyz(1e6, 0.0, 0.0)))
            .id();

        app.update();

        assert!(app.world().get_entity(far).is_ok());
    }
}
