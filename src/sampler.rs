//! # Uniform pointing sampler over a spherical cap
//!
//! Generates the randomized pointing sets fed to the external annealing solver.
//!
//! ## Algorithm
//! -----------------
//! 1. Draw `count` 3-D standard-normal vectors (isotropic directions).
//! 2. Fold each vector into the upper hemisphere (`z ← |z|`) and normalize it.
//! 3. Mark the vectors with `z < sin(f · π/2)` as rejected and **re-draw only those**,
//!    in index order, until no vector is rejected.
//! 4. Convert the unit vectors to angles: `θ = atan2(x, y)` shifted into `[0, 2π)`,
//!    `φ = asin(z)` (always in `[0, π/2]` after the fold).
//!
//! The result is uniform over the cap above the excluded band near the horizon.
//! Ids `0..count-1` follow generation order.
//!
//! ## Determinism
//! -----------------
//! The whole stream comes from a [`StdRng`] seeded with `seed_from_u64(seed)`: the same
//! `(count, seed)` always yields bit-identical pointings.
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::{
    codec::input_set::InputSet,
    constants::{RunId, DPI, HORIZON_EXCLUSION_FRACTION},
    pointing::Pointing,
    schedule::Schedule,
    telanneal_errors::TelAnnealError,
};

/// Rejection sampler for pointings above a horizon exclusion band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalSampler {
    min_z: f64,
}

impl Default for SphericalSampler {
    fn default() -> Self {
        SphericalSampler {
            min_z: (HORIZON_EXCLUSION_FRACTION * std::f64::consts::FRAC_PI_2).sin(),
        }
    }
}

impl SphericalSampler {
    /// Sampler with the default exclusion fraction [`HORIZON_EXCLUSION_FRACTION`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sampler excluding directions with elevation below `fraction · π/2`.
    ///
    /// Return
    /// ----------
    /// * `Err(TelAnnealError::ConfigurationError)` unless `0 ≤ fraction < 1`.
    pub fn with_exclusion_fraction(fraction: f64) -> Result<Self, TelAnnealError> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(TelAnnealError::ConfigurationError(format!(
                "horizon exclusion fraction must lie in [0, 1), got {fraction}"
            )));
        }
        Ok(SphericalSampler {
            min_z: (fraction * std::f64::consts::FRAC_PI_2).sin(),
        })
    }

    /// Smallest admissible `z` coordinate of a sampled unit vector.
    pub fn min_z(&self) -> f64 {
        self.min_z
    }

    /// Smallest admissible elevation `φ`, in radians.
    pub fn min_phi(&self) -> f64 {
        self.min_z.asin()
    }

    /// Draw `count` pointings uniformly over the allowed cap.
    pub fn sample(&self, count: usize, seed: u64) -> Schedule {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut points: Vec<Vector3<f64>> = (0..count).map(|_| Vector3::zeros()).collect();
        let mut to_redraw: Vec<usize> = (0..count).collect();

        while !to_redraw.is_empty() {
            for &idx in &to_redraw {
                points[idx] = self.draw_folded(&mut rng);
            }
            to_redraw.retain(|&idx| !self.is_admissible(&points[idx]));
        }

        points
            .iter()
            .zip(0..)
            .map(|(v, id)| {
                let mut theta = v.x.atan2(v.y);
                if theta < 0.0 {
                    theta += DPI;
                }
                Pointing::new(id, theta, v.z.min(1.0).asin())
            })
            .collect()
    }

    /// Fold a standard-normal draw into the upper hemisphere and normalize it.
    ///
    /// A degenerate zero vector is returned as is and rejected by [`Self::is_admissible`].
    fn draw_folded(&self, rng: &mut StdRng) -> Vector3<f64> {
        let x: f64 = rng.sample(StandardNormal);
        let y: f64 = rng.sample(StandardNormal);
        let z: f64 = rng.sample(StandardNormal);

        let v = Vector3::new(x, y, z.abs());
        let norm = v.norm();
        if norm > 0.0 {
            v / norm
        } else {
            v
        }
    }

    fn is_admissible(&self, v: &Vector3<f64>) -> bool {
        v.norm() > 0.0 && v.z >= self.min_z
    }
}

/// Sample the input pointing set of a run.
///
/// Arguments
/// -----------------
/// * `run_id` – Run the set belongs to.
/// * `count` – Number of pointings (`0` yields an empty set).
/// * `seed` – Seed of the pseudorandom stream.
pub fn sample(run_id: RunId, count: usize, seed: u64) -> InputSet {
    InputSet {
        run_id,
        schedule: SphericalSampler::default().sample(count, seed),
    }
}

#[cfg(test)]
mod sampler_test {
    use super::*;

    #[test]
    fn test_sample_is_deterministic() {
        let sampler = SphericalSampler::new();
        let first = sampler.sample(1000, 1);
        let second = sampler.sample(1000, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_depends_on_seed() {
        let sampler = SphericalSampler::new();
        assert_ne!(sampler.sample(1000, 1), sampler.sample(1000, 2));
    }

    #[test]
    fn test_sample_respects_cap() {
        let sampler = SphericalSampler::new();
        let min_phi = (0.02 * std::f64::consts::FRAC_PI_2).sin().asin();
        for p in sampler.sample(1000, 1).iter() {
            assert!(p.phi() >= min_phi - 1e-12, "phi {} below cap", p.phi());
            assert!(p.phi() <= std::f64::consts::FRAC_PI_2);
            assert!((0.0..DPI).contains(&p.theta()));
        }
    }

    #[test]
    fn test_sample_ids_sequential() {
        let schedule = SphericalSampler::new().sample(25, 9);
        let ids: Vec<u32> = schedule.iter().map(|p| p.id).collect();
        assert_eq!(ids, (0..25).collect::<Vec<u32>>());
    }

    #[test]
    fn test_sample_empty() {
        assert!(SphericalSampler::new().sample(0, 3).is_empty());
        let set = sample(4, 0, 4);
        assert_eq!(set.run_id, 4);
        assert!(set.schedule.is_empty());
    }

    #[test]
    fn test_exclusion_fraction_validation() {
        assert!(SphericalSampler::with_exclusion_fraction(0.0).is_ok());
        assert!(matches!(
            SphericalSampler::with_exclusion_fraction(1.0),
            Err(TelAnnealError::ConfigurationError(_))
        ));
        assert!(matches!(
            SphericalSampler::with_exclusion_fraction(-0.1),
            Err(TelAnnealError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_wide_exclusion_still_terminates() {
        let sampler = SphericalSampler::with_exclusion_fraction(0.5).unwrap();
        let schedule = sampler.sample(200, 11);
        assert_eq!(schedule.len(), 200);
        assert!(schedule.iter().all(|p| p.phi() >= sampler.min_phi() - 1e-12));
    }
}
