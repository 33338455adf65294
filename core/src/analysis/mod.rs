pub use constraints::*;
pub use observation::*;
pub use probability::*;

mod constraints;
mod observation;
mod probability;
