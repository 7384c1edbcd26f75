pub mod currency;
pub mod inflight;
