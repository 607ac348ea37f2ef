//! API server state

use std::sync::Arc;

use crate::config::ServiceProfile;
use crate::store::{ConnectionState, DocumentStore};
use crate::Result;

/// API server state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Route set this process serves
    pub profile: ServiceProfile,

    /// Store connection established at startup
    pub connection: ConnectionState,
}

impl AppState {
    pub fn new(profile: ServiceProfile, connection: ConnectionState) -> Self {
        Self {
            profile,
            connection,
        }
    }

    /// State for profiles that never touch the store
    pub fn standalone(profile: ServiceProfile) -> Self {
        Self::new(
            profile,
            ConnectionState::Failed {
                reason: format!("store disabled for the {:?} profile", profile),
            },
        )
    }

    /// Store handle for handlers that need it
    pub fn store(&self) -> Result<&Arc<DocumentStore>> {
        self.connection.store()
    }
}
