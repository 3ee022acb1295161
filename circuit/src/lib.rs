pub mod errors;
pub mod gate;
pub mod load;

pub use errors::{CircuitEvalError, CircuitLoadError};
pub use gate::{Circuit, Gate};
