#![cfg_attr(not(feature = "std"), no_std)]
//! Noisegen Core: seedable, bit-reproducible noise generators for detector simulations.
//!
//! Features
//! - `std`    : (default) use the Rust standard library
//! - `no-std` : build with `#![no_std]` (+ `alloc`) and use `libm` as the math backend
//! - `serde`  : derive `Serialize`/`Deserialize` on [`config`] records
//! - `rand`   : implement `rand::RngCore` / `rand::SeedableRng` for [`FlatRng`](uniform::FlatRng)
//!
//! Modules
//! - [`uniform`]  : 128-bit xorshift generator, `u32` and `[0,1)` draws
//! - [`gaussian`] : polar Box-Muller transform with a one-value cache
//! - [`filters`]  : first-order pole/zero section and the ordered cascade
//! - [`planner`]  : stage count and corner placement for a 1/f^alpha slope
//! - [`colored`]  : Gaussian innovations driven through a cascade
//! - [`source`]   : `NoiseSource` trait, scaling wrapper, typed buffer rendering
//! - [`config`]   : validated configuration records
//! - [`error`]    : configuration errors
//!
//! Design
//! - No global state; every generator is a plain value advanced through `&mut self`
//! - Sample paths are infallible; validation happens once, at planning time
//! - Output is bit-exact for a given seed and configuration

#[cfg(all(not(feature = "std"), not(feature = "no-std")))]
compile_error!("enable either the `std` or the `no-std` feature of noisegen-core");

extern crate alloc;

pub mod colored;
pub mod config;
pub mod dsp;
pub mod error;
pub mod filters;
pub mod gaussian;
pub mod planner;
pub mod source;
pub mod uniform;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::colored::{fill_colored, next_colored, Oof2Rng, OofRng};
    pub use crate::config::{NoiseConfig, NoiseKind};
    pub use crate::error::ConfigError;
    pub use crate::filters::{Cascade, SinglePole};
    pub use crate::gaussian::{fill_normal, next_normal, GaussCache, NormalRng};
    pub use crate::planner::{num_poles, plan, stage_corners};
    pub use crate::source::{render_into, NoiseSource, Scaled};
    pub use crate::uniform::FlatRng;
}
