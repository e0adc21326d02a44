//! Geometric optics of ray bundles in the detector: transport through
//! the LS, refraction and reflection at its boundary, and detection
//! by the PMTs.

mod ray;
pub use ray::*;

pub mod fresnel;

mod transport;
pub use transport::*;

mod pmt;
pub use pmt::*;
