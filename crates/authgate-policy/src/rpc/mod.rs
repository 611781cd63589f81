//! The policy RPC surface: wire types, server router, and resilient client.

pub mod client;
pub mod server;
pub mod types;

/// Path of the permission check operation.
pub const CHECK_PATH: &str = "/rpc/permission/check";
/// Path of the add-policy operation.
pub const ADD_PATH: &str = "/rpc/permission/add";
/// Path of the remove-policy operation.
pub const REMOVE_PATH: &str = "/rpc/permission/remove";
/// Path of the idempotent ensure-policy operation.
pub const ADD_IF_NOT_EXISTS_PATH: &str = "/rpc/permission/add_if_not_exists";
