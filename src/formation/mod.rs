//! Formation fields: geometry that morphs between the dispersed cloud and
//! the assembled tree

pub mod foliage;
pub mod ornaments;

pub use foliage::{ripple_strength, FoliageField, FoliageParticle, FoliageSample, FOLIAGE_COUNT};
pub use ornaments::{Ornament, OrnamentBatch, OrnamentField, OrnamentKind, ORNAMENT_COUNT};
