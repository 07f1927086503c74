pub mod linear;
pub mod n_body;

pub use linear::LinearProblem;
pub use n_body::{Body, NBodyProblem};
