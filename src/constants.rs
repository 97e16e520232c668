//! # Constants and type definitions for neo_orbit
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate, together with the sampling defaults of the orbit
//! propagator.
//!
//! ## Overview
//!
//! - Solar gravitational parameter used for two-body mean motion
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km)
//! - Default trajectory sampling and Kepler solver iteration count
//! - Type aliases documenting the unit carried by an `f64`

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Heliocentric gravitational parameter μ☉ in km³/s²
pub const MU_SUN: f64 = 1.327_124_400_18e11;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

// -------------------------------------------------------------------------------------------------
// Propagation defaults
// -------------------------------------------------------------------------------------------------

/// Number of samples taken over one orbital period
pub const DEFAULT_NUM_POINTS: usize = 500;

/// Fixed number of Newton-Raphson iterations applied to Kepler's equation
pub const DEFAULT_KEPLER_ITERATIONS: usize = 10;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Duration in seconds
pub type Second = f64;
