//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain services and stay testable without I/O.

use std::sync::Arc;

use crate::domain::UserService;
use crate::domain::ports::UserRepository;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: UserService,
}

impl HttpState {
    /// Build state around a storage port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use user_service::domain::ports::InMemoryUserRepository;
    /// use user_service::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(InMemoryUserRepository::new()));
    /// let _users = state.users.clone();
    /// ```
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            users: UserService::new(repository),
        }
    }
}
