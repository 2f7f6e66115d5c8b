pub mod cursor;
pub mod feed;
pub mod handle;
pub mod model;
pub mod reciprocity;
pub mod repository;
pub mod repository_pg;
pub mod route;
pub mod schema;
pub mod service;

#[cfg(test)]
pub mod repository_memory;
