use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatrelay_llm::{settings::API_KEY_VAR, AzureChatClient, ChatClient, Credential, Settings};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that makes lots of Star Wars references and uses emojis.";
const USER_PROMPT: &str =
    "Write a haiku about Star wars Rebels Series member Captain Syndulla";

const TEMPERATURE: f32 = 0.7;
const CANDIDATES: u32 = 1;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    init_logging();

    // The console variant has no identity chain; the static key is required
    // alongside service and deployment. Missing configuration terminates the
    // process before any network activity.
    let settings = match Settings::from_env() {
        Ok(settings) if settings.api_key.is_some() => settings,
        Ok(_) => {
            tracing::warn!("{} environment variable is empty. See README.", API_KEY_VAR);
            std::process::exit(1);
        }
        Err(err) => {
            tracing::warn!("{}", err);
            std::process::exit(1);
        }
    };

    let credential = Credential::resolve(&settings)?;
    let client = AzureChatClient::builder()
        .resource_name(settings.service.as_str())
        .deployment(settings.deployment.as_str())
        .credential(credential)
        .build()?;

    let text = client
        .complete(SYSTEM_PROMPT, USER_PROMPT, TEMPERATURE, CANDIDATES)
        .await?;

    print_response(std::io::stdout(), &text)?;

    Ok(())
}

/// Write the reply in the demo's two-line format: a `Response: ` header
/// line followed by the completion text.
fn print_response(mut out: impl std::io::Write, text: &str) -> std::io::Result<()> {
    writeln!(out, "Response: ")?;
    writeln!(out, "{}", text)
}

fn init_logging() {
    // Quiet by default; RUST_LOG raises verbosity for the Azure and HTTP layers.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
