//! # Dashboard Models
//!
//! Resource records and request/response DTOs:
//!
//! - [`auth`]: login request and response
//! - [`services`]: services and their versions
//! - [`users`]: users and their profiles
//!
//! Records implement [`dashboard_core::Listable`] so the query engine can
//! plan listings over them.

pub mod auth;
pub mod services;
pub mod users;

pub use auth::{LoginRequest, LoginResponse};
pub use services::{
    CreateServiceDto, CreateServiceVersionDto, Service, ServiceSortField, ServiceVersion,
    UpdateServiceDto, UpdateServiceVersionDto,
};
pub use users::{
    CreateUserDto, NewUser, UpdateUserDto, User, UserChanges, UserProfile, UserProfileDto,
    UserSortField,
};
