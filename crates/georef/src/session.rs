//! Calibration session: explicit accumulation of control points.
//!
//! A session collects up to four pixel/GPS correspondences and fits them into
//! a ready-to-use [`CoordinateMapper`]. It replaces the scattered mutable
//! state a UI would otherwise keep (clicked points here, entered coordinates
//! there) with one plain value the host can own, snapshot, or throw away.

use serde::{Deserialize, Serialize};

use georef_core::{fit_affine, CoordinateMapper, Correspondence, FitError, CONTROL_POINTS};

/// Errors produced by [`CalibrationSession`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("calibration session already holds four correspondences")]
    SessionFull,

    #[error("correspondence contains non-finite coordinates")]
    NonFiniteInput,

    #[error("calibration requires four correspondences, got {got}")]
    Incomplete { got: usize },

    #[error(transparent)]
    Fit(#[from] FitError),
}

/// Accumulates up to four pixel/GPS correspondences for one calibration.
///
/// The session never hands out a partially calibrated mapper: [`fit`] either
/// returns a fully constructed [`CoordinateMapper`] or an error, and a mapper
/// once returned is immutable. Starting over ([`reset`]) does not invalidate
/// mappers produced earlier.
///
/// [`fit`]: CalibrationSession::fit
/// [`reset`]: CalibrationSession::reset
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalibrationSession {
    correspondences: Vec<Correspondence>,
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one control point. Returns how many are collected so far.
    ///
    /// Rejects a fifth correspondence ([`SessionError::SessionFull`]) and any
    /// sample with NaN or infinite coordinates
    /// ([`SessionError::NonFiniteInput`]) — the engine contract requires
    /// already-parsed finite values, and this is the boundary where that is
    /// checked.
    pub fn add_correspondence(&mut self, corr: Correspondence) -> Result<usize, SessionError> {
        if self.correspondences.len() >= CONTROL_POINTS {
            return Err(SessionError::SessionFull);
        }
        if !corr.is_finite() {
            return Err(SessionError::NonFiniteInput);
        }
        self.correspondences.push(corr);
        log::debug!(
            "control point {}/{}: pixel ({}, {}) -> geo ({}, {})",
            self.correspondences.len(),
            CONTROL_POINTS,
            corr.pixel.x,
            corr.pixel.y,
            corr.geo.lat,
            corr.geo.lon
        );
        Ok(self.correspondences.len())
    }

    pub fn len(&self) -> usize {
        self.correspondences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.correspondences.is_empty()
    }

    /// True once four correspondences are collected.
    pub fn is_complete(&self) -> bool {
        self.correspondences.len() == CONTROL_POINTS
    }

    pub fn correspondences(&self) -> &[Correspondence] {
        &self.correspondences
    }

    /// Fit the collected correspondences into a ready mapper.
    ///
    /// The session itself is left untouched, so a host may keep it around for
    /// display while using the returned mapper. Each successful call
    /// publishes a fresh, independent mapper value.
    pub fn fit(&self) -> Result<CoordinateMapper, SessionError> {
        let corrs: &[Correspondence; CONTROL_POINTS] =
            self.correspondences.as_slice().try_into().map_err(|_| {
                SessionError::Incomplete {
                    got: self.correspondences.len(),
                }
            })?;
        let params = fit_affine(corrs)?;
        Ok(CoordinateMapper::new(params))
    }

    /// Discard the collected correspondences and start a new calibration.
    ///
    /// Mappers fitted from the previous set stay valid; a later [`fit`]
    /// produces a new one.
    ///
    /// [`fit`]: CalibrationSession::fit
    pub fn reset(&mut self) {
        self.correspondences.clear();
    }
}
