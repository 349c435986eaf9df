/// egui rendering of the dashboard bundle.
pub mod charts;
pub mod panels;
