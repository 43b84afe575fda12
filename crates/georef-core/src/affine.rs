//! Affine transform estimation from pixel/GPS control points.
//!
//! The transform maps the image plane to WGS84 coordinates:
//!
//! ```text
//! lat = a*x + b*y + c
//! lon = d*x + e*y + f
//! ```
//!
//! Four control points give an 8x6 linear system solved by SVD least squares.
//! The two coordinate axes share no coefficients, so the system is two
//! independent 3-parameter regressions solved jointly.

use nalgebra::{DMatrix, DVector, Matrix3};
use serde::{Deserialize, Serialize};

use crate::Correspondence;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Number of control points a calibration is fitted from.
pub const CONTROL_POINTS: usize = 4;

/// Relative cutoff (against the largest singular value) below which singular
/// values are treated as zero.
const SV_REL_TOL: f64 = 1e-9;

/// Errors produced by [`fit_affine`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    #[error("control points are degenerate (collinear or coincident)")]
    SingularSystem,
}

/// Coefficients of a fitted pixel-to-geo affine transform.
///
/// Immutable once produced: re-calibration yields a new value rather than
/// mutating one already handed to a mapper, so concurrent readers never
/// observe a half-updated transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineParams {
    /// Build from coefficients ordered `[a, b, c, d, e, f]`.
    pub fn from_coeffs(c: [f64; 6]) -> Self {
        Self {
            a: c[0],
            b: c[1],
            c: c[2],
            d: c[3],
            e: c[4],
            f: c[5],
        }
    }

    /// Coefficients ordered `[a, b, c, d, e, f]`.
    pub fn coeffs(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Homogeneous 3x3 form, suitable for inversion:
    ///
    /// ```text
    /// [ a  b  c ]
    /// [ d  e  f ]
    /// [ 0  0  1 ]
    /// ```
    pub fn homogeneous(&self) -> Matrix3<f64> {
        Matrix3::new(self.a, self.b, self.c, self.d, self.e, self.f, 0.0, 0.0, 1.0)
    }

    pub fn is_finite(&self) -> bool {
        self.coeffs().iter().all(|v| v.is_finite())
    }
}

/// Fit the affine transform through exactly four control points.
///
/// Builds the stacked design matrix (two rows per correspondence, one for
/// latitude and one for longitude) and solves the least-squares problem via
/// SVD, i.e. by applying the pseudo-inverse. All four points contribute; with
/// consistent input the solution reproduces every control point exactly.
///
/// Returns [`FitError::SingularSystem`] when the pixel positions are
/// collinear or coincident (rank-deficient design matrix), or when the solve
/// yields non-finite coefficients. NaNs are never passed through silently.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(corrs)))]
pub fn fit_affine(corrs: &[Correspondence; CONTROL_POINTS]) -> Result<AffineParams, FitError> {
    let mut a = DMatrix::<f64>::zeros(2 * CONTROL_POINTS, 6);
    let mut b = DVector::<f64>::zeros(2 * CONTROL_POINTS);

    for (i, corr) in corrs.iter().enumerate() {
        let r = 2 * i;

        // [x, y, 1, 0, 0, 0] -> lat
        a[(r, 0)] = corr.pixel.x;
        a[(r, 1)] = corr.pixel.y;
        a[(r, 2)] = 1.0;
        b[r] = corr.geo.lat;

        // [0, 0, 0, x, y, 1] -> lon
        a[(r + 1, 3)] = corr.pixel.x;
        a[(r + 1, 4)] = corr.pixel.y;
        a[(r + 1, 5)] = 1.0;
        b[r + 1] = corr.geo.lon;
    }

    let svd = a.svd(true, true);
    let tol = SV_REL_TOL * svd.singular_values.max();
    if svd.rank(tol) < 6 {
        return Err(FitError::SingularSystem);
    }
    let sol = svd.solve(&b, tol).map_err(|_| FitError::SingularSystem)?;

    let params = AffineParams::from_coeffs([sol[0], sol[1], sol[2], sol[3], sol[4], sol[5]]);
    if !params.is_finite() {
        return Err(FitError::SingularSystem);
    }

    log::debug!(
        "fitted affine transform: lat = {:.6e}*x + {:.6e}*y + {:.6e}, lon = {:.6e}*x + {:.6e}*y + {:.6e}",
        params.a,
        params.b,
        params.c,
        params.d,
        params.e,
        params.f
    );

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeoPoint, PixelPoint};
    use approx::assert_relative_eq;

    fn corr(x: f64, y: f64, lat: f64, lon: f64) -> Correspondence {
        Correspondence::new(PixelPoint::new(x, y), GeoPoint::new(lat, lon))
    }

    /// Correspondences generated by applying `params` to the given pixels.
    fn consistent_corrs(params: &AffineParams, pixels: [(f64, f64); 4]) -> [Correspondence; 4] {
        pixels.map(|(x, y)| {
            corr(
                x,
                y,
                params.a * x + params.b * y + params.c,
                params.d * x + params.e * y + params.f,
            )
        })
    }

    #[test]
    fn fits_axis_aligned_square() {
        let corrs = [
            corr(0.0, 0.0, 52.0, 13.0),
            corr(100.0, 0.0, 52.0, 13.1),
            corr(0.0, 100.0, 52.1, 13.0),
            corr(100.0, 100.0, 52.1, 13.1),
        ];

        let params = fit_affine(&corrs).expect("non-degenerate fit");

        assert_relative_eq!(params.a, 0.0, epsilon = 1e-9);
        assert_relative_eq!(params.b, 0.001, epsilon = 1e-9);
        assert_relative_eq!(params.c, 52.0, epsilon = 1e-9);
        assert_relative_eq!(params.d, 0.001, epsilon = 1e-9);
        assert_relative_eq!(params.e, 0.0, epsilon = 1e-9);
        assert_relative_eq!(params.f, 13.0, epsilon = 1e-9);
    }

    #[test]
    fn recovers_rotated_sheared_transform() {
        // A plan that is rotated and sheared relative to north.
        let truth = AffineParams::from_coeffs([2.3e-4, -1.1e-4, 48.7, 9.5e-5, 3.4e-4, 11.2]);
        let corrs = consistent_corrs(&truth, [(12.0, 7.0), (640.0, 33.0), (58.0, 410.0), (605.0, 388.0)]);

        let params = fit_affine(&corrs).expect("non-degenerate fit");

        for (got, want) in params.coeffs().iter().zip(truth.coeffs()) {
            assert_relative_eq!(*got, want, max_relative = 1e-8, epsilon = 1e-12);
        }
    }

    #[test]
    fn reproduces_control_points() {
        let truth = AffineParams::from_coeffs([1.0e-3, 2.0e-4, 52.0, -3.0e-4, 1.2e-3, 13.0]);
        let corrs = consistent_corrs(&truth, [(0.0, 0.0), (311.0, 24.0), (40.0, 295.0), (333.0, 287.0)]);

        let params = fit_affine(&corrs).expect("non-degenerate fit");

        for c in &corrs {
            let lat = params.a * c.pixel.x + params.b * c.pixel.y + params.c;
            let lon = params.d * c.pixel.x + params.e * c.pixel.y + params.f;
            assert_relative_eq!(lat, c.geo.lat, max_relative = 1e-9);
            assert_relative_eq!(lon, c.geo.lon, max_relative = 1e-9);
        }
    }

    #[test]
    fn rejects_collinear_points() {
        let corrs = [
            corr(0.0, 0.0, 52.0, 13.0),
            corr(1.0, 0.0, 52.0, 13.1),
            corr(2.0, 0.0, 52.1, 13.0),
            corr(3.0, 0.0, 52.1, 13.1),
        ];
        assert_eq!(fit_affine(&corrs), Err(FitError::SingularSystem));
    }

    #[test]
    fn rejects_diagonal_collinear_points() {
        let corrs = [
            corr(0.0, 0.0, 52.0, 13.0),
            corr(10.0, 10.0, 52.0, 13.1),
            corr(20.0, 20.0, 52.1, 13.0),
            corr(30.0, 30.0, 52.1, 13.1),
        ];
        assert_eq!(fit_affine(&corrs), Err(FitError::SingularSystem));
    }

    #[test]
    fn rejects_coincident_points() {
        let c = corr(42.0, 17.0, 52.0, 13.0);
        assert_eq!(fit_affine(&[c, c, c, c]), Err(FitError::SingularSystem));
    }

    #[test]
    fn params_serialize_with_named_coefficients() {
        let params = AffineParams::from_coeffs([0.0, 0.001, 52.0, 0.001, 0.0, 13.0]);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(
            json,
            r#"{"a":0.0,"b":0.001,"c":52.0,"d":0.001,"e":0.0,"f":13.0}"#
        );
    }
}
