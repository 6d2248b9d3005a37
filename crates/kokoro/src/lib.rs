mod client;
pub mod error;

pub use client::base::ApiUrl;
pub use client::base::Config;
pub use client::session::Session;
pub use client::session::SessionClient;
pub use client::simple::SimpleClient;

pub use client::base::BaseClient;
pub use client::base::PublicClient;
pub use client::base::SecureClient;
