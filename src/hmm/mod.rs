pub mod constrained;
pub mod counts;
pub mod emission;
pub mod grammar;
pub mod logspace;
pub mod opt;
pub mod standard;
