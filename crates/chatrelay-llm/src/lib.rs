pub mod client;
pub mod credential;
pub mod settings;
pub mod traits;
pub mod types;

pub use client::{AzureChatClient, AzureChatClientBuilder, DEFAULT_API_VERSION};
pub use credential::{Credential, EntraTokenProvider, TokenProvider, COGNITIVE_SERVICES_SCOPE};
pub use settings::Settings;
pub use traits::ChatClient;
pub use types::{Message, Role};
