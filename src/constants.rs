//! Physical constants and default detector parameters

/// Speed of light in vacuum, units of m/s
pub const SPEED_OF_LIGHT: f64 = 2.997925e8;
/// Refractive index of the water buffer
pub const WATER_REFRACTIVE_INDEX: f64 = 1.33;
/// Refractive index of the liquid scintillator
pub const LS_REFRACTIVE_INDEX: f64 = 1.48;
/// Refractive index of the PMT glass
pub const GLASS_REFRACTIVE_INDEX: f64 = 1.5;
/// Radius of the liquid-scintillator sphere, units of m
pub const LS_RADIUS: f64 = 17.71;
/// Radius of the sphere on which the PMT centres lie, units of m
pub const PMT_SHELL_RADIUS: f64 = 19.5;
/// Radius of a PMT photocathode, units of m
pub const PMT_RADIUS: f64 = 0.508;
