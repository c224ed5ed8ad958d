pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod pool;
pub mod quadtree;
