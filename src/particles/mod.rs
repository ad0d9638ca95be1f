pub mod dust;
pub mod candles;

pub use dust::{attraction, DustField, DustParticle, DUST_COUNT};
pub use candles::{Candle, CandleRing, CANDLE_COUNT};
