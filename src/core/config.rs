//! Engine configuration
//!
//! Controls the minor currency unit used for rounding and tolerance, and
//! whether malformed split details are hard errors or warnings.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// How CUSTOM/PERCENTAGE split details are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Mismatched sums, unknown participants and out-of-range details are errors
    Strict,

    /// The same findings are logged and computation continues
    Lenient,
}

/// Numeric and validation settings shared by every engine component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fractional digits of the minor currency unit (2 = cents)
    pub scale: u32,

    /// Split detail validation mode
    pub validation: ValidationMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            validation: ValidationMode::Strict,
        }
    }
}

impl EngineConfig {
    /// Largest supported minor unit scale
    pub const MAX_SCALE: u32 = 8;

    /// Create a new EngineConfig with custom values
    ///
    /// A scale above [`Self::MAX_SCALE`] falls back to the default with a warning.
    pub fn new(scale: u32, validation: ValidationMode) -> Self {
        let default = Self::default();

        let scale = if scale > Self::MAX_SCALE {
            warn!(
                "Invalid scale ({}), using default ({})",
                scale, default.scale
            );
            default.scale
        } else {
            scale
        };

        Self { scale, validation }
    }

    /// One minor currency unit; differences below this are treated as zero
    pub fn tolerance(&self) -> Decimal {
        Decimal::new(1, self.scale)
    }

    /// Round half-up to the minor unit and pad to exactly `scale` digits
    pub fn round(&self, value: Decimal) -> Decimal {
        let mut rounded =
            value.round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.scale);
        rounded
    }

    /// Whether split detail findings are hard errors
    pub fn is_strict(&self) -> bool {
        self.validation == ValidationMode::Strict
    }
}
