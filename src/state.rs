use std::sync::Arc;

use crate::database::{StoreHealth, SurveyRepository, UserRepository};
use crate::services::{CredentialService, SurveyService, TokenService};

/// Services shared by every worker, registered as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialService,
    pub surveys: SurveyService,
    pub store: Arc<dyn StoreHealth>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn StoreHealth>,
        users: Arc<dyn UserRepository>,
        surveys: Arc<dyn SurveyRepository>,
        tokens: TokenService,
        hash_cost: u32,
    ) -> Self {
        Self {
            credentials: CredentialService::new(users.clone(), tokens, hash_cost),
            surveys: SurveyService::new(surveys, users),
            store,
        }
    }
}
