// Domain layer - ridership records and the pure computations over them
pub mod chart;
pub mod map;
pub mod ridership;
pub mod summary;
