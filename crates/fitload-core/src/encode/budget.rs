//! Size budget and the quality ladder it implies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for out-of-range budget parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BudgetError {
    #[error("max_bytes must be greater than zero")]
    ZeroMaxBytes,

    #[error("start_quality must be in (0, 1], got {0}")]
    StartQuality(f32),

    #[error("min_quality must be in [0, 1), got {0}")]
    MinQuality(f32),

    #[error("quality_step must be in [0.001, 1), got {0}")]
    QualityStep(f32),

    #[error("start_quality ({start}) must be above min_quality ({min})")]
    EmptyRange { start: f32, min: f32 },
}

/// Byte ceiling plus the quality range the search may walk.
///
/// `min_quality` is exclusive: no attempt is made at or below it.
/// Values are validated on construction and deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BudgetFields")]
pub struct EncodeBudget {
    max_bytes: usize,
    start_quality: f32,
    min_quality: f32,
    quality_step: f32,
}

/// Unvalidated mirror of [`EncodeBudget`] used for deserialization.
#[derive(Deserialize)]
#[serde(default)]
struct BudgetFields {
    max_bytes: usize,
    start_quality: f32,
    min_quality: f32,
    quality_step: f32,
}

impl Default for BudgetFields {
    fn default() -> Self {
        let budget = EncodeBudget::default();
        Self {
            max_bytes: budget.max_bytes,
            start_quality: budget.start_quality,
            min_quality: budget.min_quality,
            quality_step: budget.quality_step,
        }
    }
}

impl TryFrom<BudgetFields> for EncodeBudget {
    type Error = BudgetError;

    fn try_from(fields: BudgetFields) -> Result<Self, Self::Error> {
        EncodeBudget::new(
            fields.max_bytes,
            fields.start_quality,
            fields.min_quality,
            fields.quality_step,
        )
    }
}

impl Default for EncodeBudget {
    fn default() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
            start_quality: 0.9,
            min_quality: 0.1,
            quality_step: 0.1,
        }
    }
}

impl EncodeBudget {
    /// 250 KB.
    pub const DEFAULT_MAX_BYTES: usize = 250 * 1024;

    /// Finer steps would collapse into duplicate rungs after snapping.
    pub const MIN_QUALITY_STEP: f32 = 0.001;

    pub fn new(
        max_bytes: usize,
        start_quality: f32,
        min_quality: f32,
        quality_step: f32,
    ) -> Result<Self, BudgetError> {
        if max_bytes == 0 {
            return Err(BudgetError::ZeroMaxBytes);
        }
        if !(start_quality > 0.0 && start_quality <= 1.0) {
            return Err(BudgetError::StartQuality(start_quality));
        }
        if !(min_quality >= 0.0 && min_quality < 1.0) {
            return Err(BudgetError::MinQuality(min_quality));
        }
        if !(quality_step >= Self::MIN_QUALITY_STEP && quality_step < 1.0) {
            return Err(BudgetError::QualityStep(quality_step));
        }
        if snap(start_quality) <= snap(min_quality) {
            return Err(BudgetError::EmptyRange {
                start: start_quality,
                min: min_quality,
            });
        }

        Ok(Self {
            max_bytes,
            start_quality,
            min_quality,
            quality_step,
        })
    }

    /// Default quality range with a different byte ceiling.
    pub fn with_max_bytes(max_bytes: usize) -> Result<Self, BudgetError> {
        let d = Self::default();
        Self::new(max_bytes, d.start_quality, d.min_quality, d.quality_step)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn start_quality(&self) -> f32 {
        self.start_quality
    }

    pub fn min_quality(&self) -> f32 {
        self.min_quality
    }

    pub fn quality_step(&self) -> f32 {
        self.quality_step
    }

    pub fn fits(&self, byte_count: usize) -> bool {
        byte_count <= self.max_bytes
    }

    /// Qualities to try, highest first.
    pub fn ladder(&self) -> QualityLadder {
        QualityLadder {
            start: self.start_quality,
            step: self.quality_step,
            floor: snap(self.min_quality),
            rung: 0,
        }
    }

    /// Number of encode attempts a full sweep makes.
    pub fn max_attempts(&self) -> usize {
        self.ladder().count()
    }
}

/// Descending sequence `start, start - step, ...` stopping above the floor.
///
/// Each rung is computed from `start` directly and snapped to six decimals so
/// float drift never adds or drops a rung.
#[derive(Debug, Clone)]
pub struct QualityLadder {
    start: f32,
    step: f32,
    floor: f32,
    rung: u32,
}

impl Iterator for QualityLadder {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let quality = snap(self.start - self.step * self.rung as f32);
        if quality <= self.floor {
            return None;
        }
        self.rung += 1;
        Some(quality)
    }
}

fn snap(quality: f32) -> f32 {
    (quality * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let budget = EncodeBudget::default();
        assert_eq!(budget.max_bytes(), 256_000);
        assert_eq!(budget.start_quality(), 0.9);
        assert_eq!(budget.min_quality(), 0.1);
        assert_eq!(budget.quality_step(), 0.1);
    }

    /// Stops above `min_quality`, so 0.1 is not a rung: 8 attempts, not 9.
    #[test]
    fn test_default_ladder() {
        let qualities: Vec<f32> = EncodeBudget::default().ladder().collect();
        assert_eq!(qualities, vec![0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2]);
        assert_eq!(EncodeBudget::default().max_attempts(), 8);
    }

    #[test]
    fn test_ladder_with_zero_floor() {
        let budget = EncodeBudget::new(1000, 1.0, 0.0, 0.25).unwrap();
        let qualities: Vec<f32> = budget.ladder().collect();
        assert_eq!(qualities, vec![1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn test_ladder_uneven_step() {
        let budget = EncodeBudget::new(1000, 0.9, 0.1, 0.3).unwrap();
        let qualities: Vec<f32> = budget.ladder().collect();
        assert_eq!(qualities, vec![0.9, 0.6, 0.3]);
    }

    #[test]
    fn test_ladder_single_rung() {
        let budget = EncodeBudget::new(1000, 0.5, 0.45, 0.1).unwrap();
        assert_eq!(budget.ladder().collect::<Vec<_>>(), vec![0.5]);
    }

    #[test]
    fn test_fits_is_inclusive() {
        let budget = EncodeBudget::with_max_bytes(100).unwrap();
        assert!(budget.fits(99));
        assert!(budget.fits(100));
        assert!(!budget.fits(101));
    }

    #[test]
    fn test_rejects_zero_max_bytes() {
        assert_eq!(
            EncodeBudget::with_max_bytes(0),
            Err(BudgetError::ZeroMaxBytes)
        );
    }

    #[test]
    fn test_rejects_out_of_range_qualities() {
        assert!(matches!(
            EncodeBudget::new(10, 0.0, 0.0, 0.1),
            Err(BudgetError::StartQuality(_))
        ));
        assert!(matches!(
            EncodeBudget::new(10, 1.5, 0.1, 0.1),
            Err(BudgetError::StartQuality(_))
        ));
        assert!(matches!(
            EncodeBudget::new(10, 0.9, 1.0, 0.1),
            Err(BudgetError::MinQuality(_))
        ));
        assert!(matches!(
            EncodeBudget::new(10, 0.9, -0.1, 0.1),
            Err(BudgetError::MinQuality(_))
        ));
        assert!(matches!(
            EncodeBudget::new(10, 0.9, 0.1, 0.0),
            Err(BudgetError::QualityStep(_))
        ));
        assert!(matches!(
            EncodeBudget::new(10, 0.9, 0.1, f32::NAN),
            Err(BudgetError::QualityStep(_))
        ));
    }

    #[test]
    fn test_rejects_start_not_above_min() {
        assert!(matches!(
            EncodeBudget::new(10, 0.3, 0.3, 0.1),
            Err(BudgetError::EmptyRange { .. })
        ));
        assert!(matches!(
            EncodeBudget::new(10, 0.2, 0.5, 0.1),
            Err(BudgetError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_budget_error_display() {
        assert_eq!(
            BudgetError::QualityStep(0.0).to_string(),
            "quality_step must be in [0.001, 1), got 0"
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
