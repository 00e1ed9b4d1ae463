//! # Telescope pointings and the movement-cost metric
//!
//! A [`Pointing`] is one telescope direction. The mount can reach every physical direction
//! in two mechanically different ways (a mirror flip of the elevation axis), so each pointing
//! carries **two equivalent angular encodings**:
//!
//! ```text
//! current   = (θ, φ)
//! alternate = (θ − π, −φ)   if θ ≥ π
//!             (θ + π, −φ)   otherwise
//! ```
//!
//! Both encodings denote the same direction on the sky. The pair is computed once at
//! construction and the value is immutable: switching representation returns a new value
//! with the two encodings swapped, so switching twice restores the exact original numbers.
//!
//! ## Conventions
//! -----------------
//! * `θ` is azimuth-like, conventionally in `[0, 2π)`.
//! * `φ` is elevation-like, conventionally in `[-π/2, π/2]`.
//! * The **primary** encoding is the one with `φ ≥ 0`; a pointing whose current `φ` is
//!   strictly negative is in its **other** representation. `φ = 0` is primary.
//!
//! ## Movement cost
//! -----------------
//! [`movement_cost`] is the Chebyshev (L∞) distance over the two drive axes, with a
//! wrap-aware azimuth component:
//!
//! ```text
//! dθ       = a.θ − b.θ
//! azimuth  = min(|dθ|, |dθ − 2π|, |dθ + 2π|)
//! altitude = |a.φ − b.φ|
//! cost     = max(azimuth, altitude)
//! ```
//!
//! The metric reads the **current** encoding of both pointings; it never switches
//! representation on its own.
use std::fmt;

use crate::constants::{PointingId, Radian, ANGLE_DECIMALS, DPI, PI};

/// One angular encoding `(θ, φ)` of a direction, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angles {
    pub theta: Radian,
    pub phi: Radian,
}

impl Angles {
    pub fn new(theta: Radian, phi: Radian) -> Self {
        Angles { theta, phi }
    }

    /// The equivalent encoding reached through the mirror flip.
    ///
    /// `θ = π` exactly maps to `0` (the `θ ≥ π` branch).
    pub fn alternate(&self) -> Angles {
        let theta = if self.theta >= PI {
            self.theta - PI
        } else {
            self.theta + PI
        };
        Angles {
            theta,
            phi: -self.phi,
        }
    }

    /// Chebyshev distance between two encodings with a `2π`-periodic azimuth.
    pub fn chebyshev_distance(&self, other: &Angles) -> f64 {
        let tdiff = self.theta - other.theta;
        let azimuth = tdiff.abs().min((tdiff - DPI).abs()).min((tdiff + DPI).abs());
        let altitude = (self.phi - other.phi).abs();
        azimuth.max(altitude)
    }
}

/// Which of the two encodings of a [`Pointing`] is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// The encoding with `φ ≥ 0`.
    Primary,
    /// The mirror-flipped encoding, `φ < 0`.
    Other,
}

/// A telescope pointing with both of its equivalent encodings.
///
/// Fields
/// -----------------
/// * `id` – Identifier, stable within a run (`0..N-1` in generation order).
/// * `current` – Encoding in use, read by [`movement_cost`] and by serialization.
/// * `alternate` – The other encoding of the same physical direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointing {
    pub id: PointingId,
    current: Angles,
    alternate: Angles,
}

impl Pointing {
    /// Build a pointing from its current encoding; the alternate encoding is derived once.
    pub fn new(id: PointingId, theta: Radian, phi: Radian) -> Self {
        let current = Angles::new(theta, phi);
        Pointing {
            id,
            current,
            alternate: current.alternate(),
        }
    }

    pub fn theta(&self) -> Radian {
        self.current.theta
    }

    pub fn phi(&self) -> Radian {
        self.current.phi
    }

    pub fn current(&self) -> Angles {
        self.current
    }

    pub fn alternate(&self) -> Angles {
        self.alternate
    }

    /// True exactly when the current `φ` is strictly negative.
    pub fn is_other_representation(&self) -> bool {
        self.current.phi < 0.0
    }

    pub fn representation(&self) -> Representation {
        if self.is_other_representation() {
            Representation::Other
        } else {
            Representation::Primary
        }
    }

    /// Encoding associated with a representation, whatever the current one is.
    pub fn encoding(&self, representation: Representation) -> Angles {
        if self.representation() == representation {
            self.current
        } else {
            self.alternate
        }
    }

    /// The encoding with non-negative `φ`.
    pub fn primary(&self) -> Angles {
        if self.current.phi >= 0.0 {
            self.current
        } else {
            self.alternate
        }
    }

    /// Swap the current and alternate encodings. Self-inverse.
    pub fn switch_representation(self) -> Self {
        Pointing {
            id: self.id,
            current: self.alternate,
            alternate: self.current,
        }
    }

    /// Return this pointing in the requested representation.
    pub fn in_representation(self, representation: Representation) -> Self {
        if self.representation() == representation {
            self
        } else {
            self.switch_representation()
        }
    }

    /// Movement cost from this pointing to `other`, see [`movement_cost`].
    pub fn dist_to(&self, other: &Pointing) -> f64 {
        movement_cost(self, other)
    }

    /// Polar display coordinates `(θ, sin φ)` taken from the primary encoding.
    pub fn plot_coordinates(&self) -> (Radian, f64) {
        let primary = self.primary();
        (primary.theta, primary.phi.sin())
    }
}

impl fmt::Display for Pointing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Direction(id={}, theta={:.prec$}, phi={:.prec$})",
            self.id,
            self.current.theta,
            self.current.phi,
            prec = ANGLE_DECIMALS
        )
    }
}

/// Return `p` with its two encodings swapped.
pub fn switch_representation(p: Pointing) -> Pointing {
    p.switch_representation()
}

/// Cost of slewing the telescope from `a` to `b` using their current encodings.
///
/// Arguments
/// -----------------
/// * `a` – Starting pointing.
/// * `b` – Target pointing.
///
/// Return
/// ----------
/// * `max(azimuth distance, elevation distance)` in radians, where the azimuth distance
///   is the shortest of `|dθ|`, `|dθ − 2π|`, `|dθ + 2π|`.
pub fn movement_cost(a: &Pointing, b: &Pointing) -> f64 {
    a.current.chebyshev_distance(&b.current)
}

/// Polar display coordinates of a pointing, see [`Pointing::plot_coordinates`].
pub fn plot_coordinates(p: &Pointing) -> (Radian, f64) {
    p.plot_coordinates()
}
