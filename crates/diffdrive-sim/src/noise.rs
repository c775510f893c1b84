//! Gaussian process noise on the commanded chassis speeds.
//!
//! A fixed seed gives reproducible runs; without one the generator is seeded
//! from OS entropy.

use diffdrive_kinematics::ChassisSpeeds;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::SimError;

/// Standard deviations and seed for [`ProcessNoise`].
///
/// A zero standard deviation disables that channel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoiseConfig {
    /// Standard deviation added to the linear speed (m/s).
    pub std_v: f64,
    /// Standard deviation added to the angular speed (rad/s).
    pub std_omega: f64,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl NoiseConfig {
    /// Noise on both channels with a fixed seed.
    pub const fn seeded(std_v: f64, std_omega: f64, seed: u64) -> Self {
        NoiseConfig {
            std_v,
            std_omega,
            seed: Some(seed),
        }
    }

    /// Checks that both standard deviations are finite and non-negative.
    pub fn validate(&self) -> Result<(), SimError> {
        for (field, value) in [("std_v", self.std_v), ("std_omega", self.std_omega)] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(SimError::InvalidConfiguration { field, value });
            }
        }
        Ok(())
    }

    /// True when at least one channel has a positive standard deviation.
    pub fn is_active(&self) -> bool {
        self.std_v > 0.0 || self.std_omega > 0.0
    }
}

/// Zero-mean Gaussian noise source for the `(v, ω)` channels.
#[derive(Debug, Clone)]
pub struct ProcessNoise {
    std_v: f64,
    std_omega: f64,
    rng: StdRng,
}

impl ProcessNoise {
    /// Create a noise source.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` if a standard deviation is
    /// negative, infinite or NaN.
    pub fn new(config: NoiseConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(ProcessNoise {
            std_v: config.std_v,
            std_omega: config.std_omega,
            rng,
        })
    }

    fn gaussian(&mut self, stddev: f64) -> f64 {
        if stddev == 0.0 {
            return 0.0;
        }
        let n: f64 = self.rng.sample(StandardNormal);
        n * stddev
    }

    /// Perturb `v` and `ω` independently.
    pub fn perturb(&mut self, command: ChassisSpeeds) -> ChassisSpeeds {
        let v = command.v + self.gaussian(self.std_v);
        let omega = command.omega + self.gaussian(self.std_omega);
        ChassisSpeeds::new(v, omega)
    }
}
