pub mod check;
pub mod compile;
pub mod describe;
