pub mod credential_service;
pub mod survey_service;
pub mod token_service;

pub use credential_service::CredentialService;
pub use survey_service::SurveyService;
pub use token_service::TokenService;
