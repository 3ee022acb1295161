pub mod garble;
pub mod mux;
pub mod ot;
pub mod semihonest;

pub use garble::*;
pub use mux::*;
pub use ot::*;
pub use semihonest::*;
