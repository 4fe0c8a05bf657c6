//! # forum-service
//!
//! Application layer: the session manager, access guard, reaction engine,
//! and the auth and post use cases, plus their DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccessGuard, AuthDecision, AuthService, Identity, PostService, ReactionEngine, Rejection,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, SessionManager,
};
