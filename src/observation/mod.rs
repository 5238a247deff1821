//! Benchmark observations: the known column schema and the loaded
//! table.

pub mod column;
pub mod table;
