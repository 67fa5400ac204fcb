//! Users domain - CRUD over a MongoDB-backed user collection.
//!
//! ## Architecture
//!
//! ```text
//! handlers (axum routes, OpenAPI)
//!    |
//! service (normalize -> validate -> uniqueness pre-check -> store)
//!    |
//! repository (UserRepository trait)
//!    |
//! mongodb (MongoUserRepository, ObjectId <-> hex mapping)
//! ```
//!
//! The repository seam keeps the service testable with a mock store;
//! the MongoDB implementation owns all BSON and ObjectId concerns.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod normalize;
pub mod repository;
pub mod service;
pub mod validate;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    ListUsersParams, MessageResponse, NewUser, User, UserEnvelope, UserFields, UserPage,
    UserPayload,
};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
pub use validate::FieldError;
