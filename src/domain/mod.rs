// Domain module: generic optimization model and solver contract

pub mod lp_format;
pub mod models;
pub mod solver_service;
pub mod value_objects;

pub use models::*;
pub use solver_service::*;
pub use value_objects::*;
