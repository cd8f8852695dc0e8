//! Pointer input pipeline: source unification, gesture classification and
//! per-document routing.

pub mod core;
pub mod normalize;
pub mod session;
pub mod types;

pub use self::core::{GestureEngine, GesturePhase};
pub use self::normalize::PointerNormalizer;
