//! Decimal-place agreement checks between numeric outputs.
//!
//! Agreement is absolute, not relative: two values agree to `p` places
//! when their difference is under half of the last counted digit,
//! `|a - b| < 0.5 * 10^-p`. Comparisons widen to `f64` so the check
//! itself never loses precision.

use crate::error::{CongelarError, Result};

/// Whether two values agree to `places` decimal places.
///
/// # Examples
///
/// ```
/// use congelar::compare::agrees_to_places;
///
/// assert!(agrees_to_places(0.1234, 0.1200, 2));
/// assert!(!agrees_to_places(0.13, 0.12, 2));
/// ```
#[must_use]
pub fn agrees_to_places(a: f32, b: f32, places: i32) -> bool {
    (f64::from(a) - f64::from(b)).abs() < 0.5 * 10f64.powi(-places)
}

/// One element pair that failed the agreement check.
#[derive(Debug, Clone)]
pub struct ElementMismatch {
    /// Position in the compared slices.
    pub index: usize,
    /// Value from the expected side.
    pub expected: f32,
    /// Value from the actual side.
    pub actual: f32,
    /// Absolute difference, widened to `f64`.
    pub abs_diff: f64,
}

/// Outcome of an element-by-element agreement check.
#[derive(Debug, Clone)]
pub struct AgreementReport {
    places: i32,
    compared: usize,
    mismatches: Vec<ElementMismatch>,
    max_abs_diff: f64,
}

impl AgreementReport {
    /// Whether every compared element agreed.
    #[must_use]
    pub fn all_agree(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Number of elements compared.
    #[must_use]
    pub fn compared(&self) -> usize {
        self.compared
    }

    /// The elements that failed, in index order.
    #[must_use]
    pub fn mismatches(&self) -> &[ElementMismatch] {
        &self.mismatches
    }

    /// Largest absolute difference seen across all elements.
    #[must_use]
    pub fn max_abs_diff(&self) -> f64 {
        self.max_abs_diff
    }

    /// Human-readable one-line outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_agree() {
            format!(
                "{} elements agree to {} places (max diff {:.2e})",
                self.compared, self.places, self.max_abs_diff
            )
        } else {
            format!(
                "{}/{} elements disagree at {} places (max diff {:.2e})",
                self.mismatches.len(),
                self.compared,
                self.places,
                self.max_abs_diff
            )
        }
    }
}

/// Compare two slices element by element to `places` decimal places.
///
/// # Errors
///
/// Fails if the slices have different lengths.
pub fn compare_to_places(expected: &[f32], actual: &[f32], places: i32) -> Result<AgreementReport> {
    if expected.len() != actual.len() {
        return Err(CongelarError::DimensionMismatch {
            expected: format!("{} elements", expected.len()),
            actual: format!("{} elements", actual.len()),
        });
    }

    let mut mismatches = Vec::new();
    let mut max_abs_diff = 0.0f64;
    for (index, (&e, &a)) in expected.iter().zip(actual).enumerate() {
        let abs_diff = (f64::from(e) - f64::from(a)).abs();
        if abs_diff > max_abs_diff {
            max_abs_diff = abs_diff;
        }
        if !agrees_to_places(e, a, places) {
            mismatches.push(ElementMismatch {
                index,
                expected: e,
                actual: a,
                abs_diff,
            });
        }
    }

    Ok(AgreementReport {
        places,
        compared: expected.len(),
        mismatches,
        max_abs_diff,
    })
}
