//! Host (desktop shell) backend adapters

mod backend;
mod fs_api;

pub use backend::HostBackend;
pub use fs_api::FsHostApi;
