use bevy::prelude::*;

/// Ray/OBB hit with everything face resolution needs: distance along the ray
/// plus the hit point and surface normal in the box's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObbHit {
    pub t: f32,
    pub local_point: Vec3,
    pub local_normal: Vec3,
}

pub fn ray_hits_obb(origin: Vec3, dir: Vec3, xf: &GlobalTransform, size: Vec3) -> Option<ObbHit> {
    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let he = size * 0.5;
    ray_aabb_hit(o_local, d_local, -he, he)
}

// Slab-method ray–AABB intersection tracking which axis decided the hit so
// the face normal falls out of the result. Ray starting inside the box hits
// the exit face instead.
pub fn ray_aabb_hit(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<ObbHit> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    let mut entry_axis = 0;
    let mut exit_axis = 0;

    for axis in 0..3 {
        let o = ray_origin[axis];
        let d = ray_direction[axis];
        let inv = if d != 0.0 { 1.0 / d } else { f32::INFINITY };

        let (mut t0, mut t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > tmin {
            tmin = t0;
            entry_axis = axis;
        }
        if t1 < tmax {
            tmax = t1;
            exit_axis = axis;
        }
        if tmin > tmax {
            return None;
        }
    }

    if tmax < 0.0 {
        return None;
    }
    let (t, axis) = if tmin >= 0.0 {
        (tmin, entry_axis)
    } else {
        (tmax, exit_axis)
    };

    let local_point = ray_origin + ray_direction * t;
    // The hit point sits on the face, so its sign on the deciding axis is the
    // face's sign.
    let mut local_normal = Vec3::ZERO;
    local_normal[axis] = local_point[axis].signum();

    Some(ObbHit {
        t,
        local_point,
        local_normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn unit_cube() -> (Vec3, Vec3) {
        (Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn head_on_hit_reports_facing_normal_and_distance() {
        let (min, max) = unit_cube();
        let hit = ray_aabb_hit(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, min, max)
            .expect("ray aimed at the cube");
        assert!((hit.t - 4.5).abs() < 1e-6);
        assert_eq!(hit.local_normal, Vec3::Z);
        assert!((hit.local_point.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn each_face_yields_its_own_normal() {
        let (min, max) = unit_cube();
        let probes = [
            (Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X, Vec3::X),
            (Vec3::new(-5.0, 0.0, 0.0), Vec3::X, Vec3::NEG_X),
            (Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, Vec3::Y),
            (Vec3::new(0.0, -5.0, 0.0), Vec3::Y, Vec3::NEG_Y),
            (Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::Z),
            (Vec3::new(0.0, 0.0, -5.0), Vec3::Z, Vec3::NEG_Z),
        ];
        for (origin, dir, normal) in probes {
            let hit = ray_aabb_hit(origin, dir, min, max).expect("probe must hit");
            assert_eq!(hit.local_normal, normal, "probe from {origin:?}");
        }
    }

    #[test]
    fn oblique_hit_lands_on_the_entry_face() {
        let (min, max) = unit_cube();
        let origin = Vec3::new(0.2, 0.1, 5.0);
        let dir = Vec3::new(0.05, -0.02, -1.0).normalize();
        let hit = ray_aabb_hit(origin, dir, min, max).expect("oblique probe");
        assert_eq!(hit.local_normal, Vec3::Z);
        assert!(hit.local_point.x.abs() <= 0.5 + 1e-6);
        assert!(hit.local_point.y.abs() <= 0.5 + 1e-6);
    }

    #[test]
    fn miss_and_behind_return_nothing() {
        let (min, max) = unit_cube();
        assert!(ray_aabb_hit(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z, min, max).is_none());
        // Box entirely behind the ray.
        assert!(ray_aabb_hit(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, min, max).is_none());
    }

    #[test]
    fn origin_inside_box_hits_the_exit_face() {
        let (min, max) = unit_cube();
        let hit = ray_aabb_hit(Vec3::ZERO, Vec3::X, min, max).expect("exit hit");
        assert!((hit.t - 0.5).abs() < 1e-6);
        assert_eq!(hit.local_normal, Vec3::X);
    }

    #[test]
    fn obb_rotation_is_resolved_in_local_space() {
        // Box turned a quarter about Y: its local +X face now looks down
        // world -Z, where the ray comes from.
        let xf = GlobalTransform::from(
            Transform::from_translation(Vec3::new(3.0, 1.0, 0.0))
                .with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        );
        let size = Vec3::new(2.0, 1.0, 0.5);

        let hit = ray_hits_obb(Vec3::new(3.0, 1.0, -5.0), Vec3::Z, &xf, size)
            .expect("ray aimed at the box");
        assert!((hit.local_normal - Vec3::X).length() < 1e-4);
        assert!((hit.local_point.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn closer_box_wins_by_distance() {
        let near = GlobalTransform::from(Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)));
        let far = GlobalTransform::from(Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)));
        let size = Vec3::ONE;
        let origin = Vec3::new(0.0, 0.0, 10.0);

        let t_near = ray_hits_obb(origin, Vec3::NEG_Z, &near, size).map(|h| h.t);
        let t_far = ray_hits_obb(origin, Vec3::NEG_Z, &far, size).map(|h| h.t);
        assert!(t_near < t_far);
    }
}
