pub mod plot;
pub mod times;

pub use plot::{plot, PlotArgs};
pub use times::times;
