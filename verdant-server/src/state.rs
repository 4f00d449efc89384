//! Shared application state

use std::sync::Arc;

use verdant_core::VerdantContext;

use crate::auth::TokenAuthority;
use crate::config::Config;

/// Everything a handler needs, cloned cheaply per request.
#[derive(Clone)]
pub struct AppState {
    pub core: Arc<VerdantContext>,
    pub auth: Arc<TokenAuthority>,
    pub config: Arc<Config>,
}
