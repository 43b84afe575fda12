//! Calibrate a planar image (floor plan, site map) against WGS84 coordinates.
//!
//! Four control points, each pairing a pixel location with its GPS
//! coordinate, determine a 2-D affine transform. Once fitted, the transform
//! maps any pixel coordinate to latitude/longitude and — where invertible —
//! back again. Collecting the points and parsing coordinate input is the
//! host's job; this crate only does the geometry.
//!
//! ## Quickstart
//!
//! ```
//! use georef::{CalibrationSession, Correspondence, GeoPoint, PixelPoint};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = CalibrationSession::new();
//! for ((x, y), (lat, lon)) in [
//!     ((0.0, 0.0), (52.0, 13.0)),
//!     ((100.0, 0.0), (52.0, 13.1)),
//!     ((0.0, 100.0), (52.1, 13.0)),
//!     ((100.0, 100.0), (52.1, 13.1)),
//! ] {
//!     session.add_correspondence(Correspondence::new(
//!         PixelPoint::new(x, y),
//!         GeoPoint::new(lat, lon),
//!     ))?;
//! }
//!
//! let mapper = session.fit()?;
//! let geo = mapper.to_geo(50.0, 50.0);
//! assert!((geo.lat - 52.05).abs() < 1e-9);
//! assert!((geo.lon - 13.05).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`session`]: [`CalibrationSession`] — explicit accumulation of control
//!   points replacing ad-hoc mutable UI state.
//! - `georef::core` (re-export of `georef-core`): [`fit_affine`],
//!   [`CoordinateMapper`] and the shared data types, for hosts that manage
//!   their own correspondence collection.

pub use georef_core as core;

pub use georef_core::{
    fit_affine, AffineParams, CoordinateMapper, Correspondence, FitError, GeoPoint, MapError,
    PixelPoint, CONTROL_POINTS,
};

pub mod session;
pub use session::{CalibrationSession, SessionError};
