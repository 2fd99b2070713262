#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Potentiometer tuning engine (hardware-agnostic).
//!
//! Turns a cheap rotary potentiometer into a precise bounded input. All
//! hardware access goes through `yatuli_traits::AnalogInput`; time comes from
//! `yatuli_traits::Clock`.
//!
//! ## Architecture
//!
//! - **Sampling**: oversampled, centered readings (`sampler` module)
//! - **Mapping**: hysteresis, edge jumps and range rejection (`mapper` module)
//! - **Navigation**: coarse -1/0/+1 ticks (`direction` module)
//! - **Engine**: polling, set, lock/unlock (`TunerCore`)
//! - **Construction**: type-state `TunerBuilder` and generic `build_tuner`
//!
//! ## Integer Arithmetic
//!
//! Readings are `i32` sample counts; values are `i64` in application units.
//! Intermediates widen to `i64`/`i128` so no input can overflow.

pub mod builder;
pub mod config;
pub mod conversions;
pub mod direction;
pub mod error;
pub mod fixed_point;
pub mod hw_error;
pub mod mapper;
pub mod mocks;
pub mod pacing;
pub mod sampler;
pub mod tuner;

pub use builder::{Missing, Set, Tuner, TunerBuilder, build_tuner};
pub use config::{
    DirectionCfg, EdgeCfg, HysteresisCfg, LockCfg, MIN_STEP, RangeCfg, SamplerCfg, TunerCfg,
};
pub use direction::Direction;
pub use error::{BuildError, Report, Result, TunerError};
pub use tuner::TunerCore;

/// Statically dispatched tuner alias.
pub type TunerG<A> = TunerCore<A>;
