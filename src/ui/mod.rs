pub mod explorer;
pub mod matrix;
pub mod panels;
pub mod plot;
pub mod regression;
