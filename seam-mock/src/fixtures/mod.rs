pub mod bars;
pub mod history;
