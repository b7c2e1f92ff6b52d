/// UI layer: panels plus one module per central view.

pub mod heatmap;
pub mod panels;
pub mod regression;
pub mod scatter;
pub mod table;
