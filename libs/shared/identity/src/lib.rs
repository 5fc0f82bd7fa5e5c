pub mod error;
pub mod firebase;
pub mod token;

pub use error::IdentityError;
pub use firebase::{
    delete_user_outcome, AccountDeletionResponse, DeletionOutcome, IdentityClient, IdentityUser,
};
pub use token::{AccessTokenProvider, ServiceAccountKey, ServiceAccountTokenProvider, StaticTokenProvider};
