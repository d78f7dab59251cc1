//! Application state for the web layer.

use std::sync::Arc;

use crate::auth::Authenticator;
use crate::booking::BookingArbiter;
use crate::search::SearchEngine;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Decides booking attempts and cancellations
    pub arbiter: Arc<BookingArbiter>,

    /// Catalog search with availability
    pub search: Arc<SearchEngine>,

    /// Bearer-token verifier
    pub auth: Arc<Authenticator>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(arbiter: BookingArbiter, search: SearchEngine, auth: Authenticator) -> Self {
        Self {
            arbiter: Arc::new(arbiter),
            search: Arc::new(search),
            auth: Arc::new(auth),
        }
    }
}
