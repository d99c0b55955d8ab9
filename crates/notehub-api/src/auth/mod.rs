pub mod admin;
pub mod identity;
pub mod jwt;
pub mod supabase;

pub use admin::AdminContext;
pub use identity::{bearer_token, IdentityError, IdentityProvider};
pub use jwt::JwtIdentityProvider;
pub use supabase::SupabaseIdentityProvider;
