pub mod normalize;
pub mod sequence;
