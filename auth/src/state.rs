use std::sync::Arc;

use crate::services::auth::{Authenticator, TokenIssuer};

#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(issuer: Arc<TokenIssuer>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            issuer,
            authenticator,
        }
    }
}
