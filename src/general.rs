pub mod board;
pub mod common;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod rules;
pub mod squares;
