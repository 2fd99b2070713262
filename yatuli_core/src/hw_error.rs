//! Maps `Box<dyn Error>` from trait boundaries to typed `TunerError`.
//!
//! The traits in `yatuli_traits` use `Box<dyn Error + Send + Sync>` so any
//! converter driver can plug in; this module converts those to our typed error
//! enum, with an optional feature-gated path for `yatuli_hardware::HwError`
//! downcasting.

use crate::error::TunerError;

/// Map a trait-boundary error to a typed `TunerError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> TunerError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<yatuli_hardware::error::HwError>() {
            return TunerError::HardwareFault(hw.to_string());
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        TunerError::Timeout
    } else {
        TunerError::Hardware(s)
    }
}
