//! Rotation conversions and random rotation sampling.
//!
//! Euler triples are `(x, y, z)` angles in degrees applied in Z, then Y,
//! then X order (USD `xformOp:rotateZYX`). Quaternions travel as
//! `[w, x, y, z]` arrays in product data.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};
use rand::Rng;

/// Lower bound (inclusive) of a sampled Euler angle in degrees.
pub const EULER_MIN_DEGREES: f64 = -180.0;

/// Upper bound (exclusive) of a sampled Euler angle in degrees.
pub const EULER_MAX_DEGREES: f64 = 180.0;

/// Convert ZYX Euler angles in degrees to a quaternion.
///
/// The vector is rotated about Z first, then Y, then X, so the combined
/// rotation is `Rx * Ry * Rz`.
pub fn euler_zyx_to_quat(degrees: DVec3) -> DQuat {
    DQuat::from_rotation_x(degrees.x.to_radians())
        * DQuat::from_rotation_y(degrees.y.to_radians())
        * DQuat::from_rotation_z(degrees.z.to_radians())
}

/// Build a quaternion from a `[w, x, y, z]` array.
pub fn quat_from_wxyz(wxyz: [f64; 4]) -> DQuat {
    let [w, x, y, z] = wxyz;
    DQuat::from_xyzw(x, y, z, w)
}

/// Flatten a quaternion into a `[w, x, y, z]` array.
pub fn quat_to_wxyz(q: DQuat) -> [f64; 4] {
    [q.w, q.x, q.y, q.z]
}

/// Sample an Euler triple with every axis uniform in `[-180, 180)` degrees.
pub fn random_euler_degrees<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    DVec3::new(
        rng.gen_range(EULER_MIN_DEGREES..EULER_MAX_DEGREES),
        rng.gen_range(EULER_MIN_DEGREES..EULER_MAX_DEGREES),
        rng.gen_range(EULER_MIN_DEGREES..EULER_MAX_DEGREES),
    )
}

/// Sample a uniformly distributed unit quaternion.
///
/// Marsaglia's construction: the product of two points on unit circles,
/// weighted by `sqrt(1 - u1)` and `sqrt(u1)`, so the norm is 1 up to
/// rounding.
pub fn random_unit_quaternion<R: Rng + ?Sized>(rng: &mut R) -> DQuat {
    let u1: f64 = rng.gen();
    let u2: f64 = rng.gen();
    let u3: f64 = rng.gen();

    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();

    let x = a * (TAU * u2).sin();
    let y = a * (TAU * u2).cos();
    let z = b * (TAU * u3).sin();
    let w = b * (TAU * u3).cos();

    DQuat::from_xyzw(x, y, z, w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_euler_zyx_single_axis() {
        // 90 degrees about Z takes +X to +Y
        let q = euler_zyx_to_quat(DVec3::new(0.0, 0.0, 90.0));
        let v = q * DVec3::X;
        assert!((v - DVec3::Y).length() < 1e-9);

        // 90 degrees about X takes +Y to +Z
        let q = euler_zyx_to_quat(DVec3::new(90.0, 0.0, 0.0));
        let v = q * DVec3::Y;
        assert!((v - DVec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_euler_zyx_applies_z_first() {
        // Z by 90 maps X -> Y, then X by 90 maps Y -> Z
        let q = euler_zyx_to_quat(DVec3::new(90.0, 0.0, 90.0));
        let v = q * DVec3::X;
        assert!((v - DVec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_wxyz_roundtrip() {
        let wxyz = [0.5, -0.5, 0.5, -0.5];
        let q = quat_from_wxyz(wxyz);

        assert_eq!(q.w, 0.5);
        assert_eq!(q.x, -0.5);
        assert_eq!(quat_to_wxyz(q), wxyz);
    }

    #[test]
    fn test_random_euler_in_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let e = random_euler_degrees(&mut rng);
            for angle in e.to_array() {
                assert!((EULER_MIN_DEGREES..EULER_MAX_DEGREES).contains(&angle));
            }
        }
    }

    #[test]
    fn test_random_quaternion_is_unit() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let q = random_unit_quaternion(&mut rng);
            assert!((q.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_random_quaternion_is_seeded() {
        let a = random_unit_quaternion(&mut StdRng::seed_from_u64(7));
        let b = random_unit_quaternion(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_quaternion_covers_both_hemispheres() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples: Vec<DQuat> = (0..200).map(|_| random_unit_quaternion(&mut rng)).collect();

        assert!(samples.iter().any(|q| q.w > 0.0));
        assert!(samples.iter().any(|q| q.w < 0.0));
    }
}
