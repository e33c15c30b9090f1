//! `DataSource` implementation over a state-RPC and an optional
//! consensus-RPC endpoint (spec §6.1).

mod client;
mod wire;

pub use client::{RpcConfig, RpcDataSource};
pub use wire::WireError;
