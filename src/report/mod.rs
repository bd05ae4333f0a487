pub mod classify;
pub mod normalize;
