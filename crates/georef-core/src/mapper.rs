//! Forward and inverse application of a fitted affine transform.

use nalgebra::Vector3;

use crate::{AffineParams, GeoPoint, PixelPoint};

/// Relative determinant cutoff below which the transform counts as singular.
/// The determinant is compared against the squared norm of the 2x2 linear
/// part so the test is independent of the degrees-per-pixel scale.
const DET_REL_EPS: f64 = 1e-12;

/// Errors produced by [`CoordinateMapper::to_pixel`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    #[error("affine transform is not invertible")]
    NonInvertible,
}

/// Maps pixel coordinates to WGS84 coordinates and back with one fitted
/// [`AffineParams`].
///
/// A mapper value only exists in the ready state: it is constructed from the
/// parameters of a successful fit (or externally supplied ones) and never
/// resets. A new calibration produces a new mapper rather than mutating one
/// that other readers may already hold.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateMapper {
    params: AffineParams,
}

impl CoordinateMapper {
    pub fn new(params: AffineParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AffineParams {
        &self.params
    }

    /// Forward transform: pixel position to latitude/longitude.
    #[inline]
    pub fn to_geo(&self, x: f64, y: f64) -> GeoPoint {
        let p = &self.params;
        GeoPoint {
            lat: p.a * x + p.b * y + p.c,
            lon: p.d * x + p.e * y + p.f,
        }
    }

    /// Inverse transform: latitude/longitude back to the pixel position.
    ///
    /// Inverts the homogeneous 3x3 form and applies it to `[lat, lon, 1]`.
    /// Fails with [`MapError::NonInvertible`] when the transform is singular.
    /// A fit never produces a singular transform from valid control points,
    /// but the check is repeated here since a mapper can be constructed from
    /// externally supplied parameters.
    pub fn to_pixel(&self, lat: f64, lon: f64) -> Result<PixelPoint, MapError> {
        let p = &self.params;

        // The bottom row of the homogeneous form is [0, 0, 1], so the full
        // determinant reduces to the 2x2 linear part.
        let det = p.a * p.e - p.b * p.d;
        let scale = p.a * p.a + p.b * p.b + p.d * p.d + p.e * p.e;
        if det.abs() <= DET_REL_EPS * scale {
            return Err(MapError::NonInvertible);
        }

        let inv = p
            .homogeneous()
            .try_inverse()
            .ok_or(MapError::NonInvertible)?;
        let q = inv * Vector3::new(lat, lon, 1.0);
        Ok(PixelPoint { x: q[0], y: q[1] })
    }
}
