//! Reusable graph fragments built out of the primitive operations.

mod update;

pub use update::Update;
