pub mod cause;
pub mod config;
pub mod error;
pub mod extract;
pub mod foundation;
pub mod nft;
pub mod post;
pub mod response;
pub mod router;
pub mod server;
pub mod step;

pub use config::Config;
pub use server::{build_router, build_server};
