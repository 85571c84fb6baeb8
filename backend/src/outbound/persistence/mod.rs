//! Document-store persistence adapters.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between stored
//!   documents and domain types. No business logic resides here.
//! - **Internal documents**: the on-disk document shape is private to this
//!   module and never reaches the domain.
//! - **Strongly typed errors**: driver failures are mapped onto
//!   [`UserPersistenceError`](crate::domain::ports::UserPersistenceError)
//!   variants.
//!
//! # Example
//!
//! ```no_run
//! use user_service::outbound::persistence::{MongoSettings, MongoUserRepository, connect};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = MongoSettings::new("localhost", 27017);
//! let database = connect(&settings).await?;
//! let repo = MongoUserRepository::new(&database, &settings.collection);
//! # Ok(())
//! # }
//! ```

mod client;
mod mongo_user_repository;

pub use client::{ConnectError, MongoSettings, connect};
pub use mongo_user_repository::MongoUserRepository;
