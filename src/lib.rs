/*
 * Lark OpenAPI Client - Rust client for the Lark/Feishu open platform
 */

// Internal modules
mod client;
pub mod models;  // Make models public
mod apis;
mod error;
mod auth;
pub mod pagination;


// Re-export public types and interfaces
pub use client::{LarkClient, RequestOptions, DEFAULT_BASE_URL};
pub use models::*;
pub use apis::*;
pub use error::{LarkError, LarkResult};
pub use auth::{Authentication, NoAuth, TenantTokenAuth, UserTokenAuth};
pub use pagination::{
    MissingTokenPolicy, PageIterator, PageOutcome, PageRequest, PageResult, PaginationConfig,
    SessionState,
};

// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        LarkClient, RequestOptions,
        NoAuth, TenantTokenAuth, UserTokenAuth,
        LarkError, LarkResult,
        PageIterator, PageOutcome, PaginationConfig, MissingTokenPolicy,
        // Common model types
        Instance, InstanceCreateRequest, Node, Entity, EntityRequest,
        Record, RecordRequest, RecordSearchRequest,
    };
}
