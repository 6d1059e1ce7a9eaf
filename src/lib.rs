// src/lib.rs
pub mod aggregate;
pub mod clean;
pub mod extract;
pub mod ncrb;
pub mod normalize;
pub mod select;
pub mod storage;
pub mod utils;

pub use utils::AppError;
