//! Request-level operations. Each validates its input before touching any backend.

pub mod cause;
pub mod foundation;
pub mod nft;
pub mod post;
pub mod step;

#[cfg(test)]
pub(crate) mod testing;
