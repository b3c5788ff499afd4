mod scatter;

pub use scatter::Scatter;
