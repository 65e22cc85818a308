pub mod account_client;
pub mod auth_client;
pub mod calculator_client;
pub mod envelope;
pub mod product_client;
pub mod profile_client;
pub mod refresh;
pub mod session_client;

pub use account_client::AccountClient;
pub use auth_client::AuthClient;
pub use calculator_client::CalculatorClient;
pub use product_client::ProductClient;
pub use profile_client::ProfileClient;
pub use refresh::{RefreshCycle, TickOutcome};
pub use session_client::SessionClient;
