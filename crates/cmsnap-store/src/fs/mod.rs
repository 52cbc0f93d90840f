//! Filesystem primitives shared by the snapshot store

pub mod atomic;

pub use atomic::atomic_write;
