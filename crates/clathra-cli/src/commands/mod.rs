pub mod batch;
pub mod collect;
pub mod generate;
pub mod plot;
