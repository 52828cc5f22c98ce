pub mod allocator;
pub mod label;
pub mod overlay;
pub mod placement;
