//! Domain models for the meteorological observation platform

mod measurement;
mod observation;
mod vegetation;
mod zone;

pub use measurement::*;
pub use observation::*;
pub use vegetation::*;
pub use zone::*;
