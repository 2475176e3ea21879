pub mod calculator;
pub mod celebration;
pub mod help;
pub mod problem;
pub mod recent;
