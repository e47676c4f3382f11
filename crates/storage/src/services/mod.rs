pub mod lifecycle;
pub mod scoring;
pub mod standings;
pub mod sync;
