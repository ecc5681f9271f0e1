#[cfg(test)]
mod random;
mod result;

#[cfg(test)]
pub use random::Random;
pub use result::{Error, Result};
