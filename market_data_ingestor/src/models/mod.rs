pub mod asset;
pub mod bar;
pub mod timeframe;
