mod algorithm;
mod errors;
mod expansion;
mod hyperparams;
mod neighbors;

pub use algorithm::*;
pub use errors::*;
pub use expansion::*;
pub use hyperparams::*;
pub use neighbors::*;
