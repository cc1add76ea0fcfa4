pub mod gate;
pub mod password;
pub mod token;

pub use gate::CurrentUser;
pub use token::{TokenError, TokenService};
