use std::sync::Arc;

use coach_bot::bot::Bot;
use coach_bot::config::Config;
use coach_bot::dispatch::{DefaultAction, Dispatcher};
use coach_bot::llm::create_provider;
use coach_bot::webhook::{routes, AppState};
use coach_bot::whatsapp::WhatsAppClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Fail fast on missing credentials; never serve half-configured.
    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  Required: PHONE_ID, ACCESS_TOKEN, VERIFY_TOKEN");
        std::process::exit(1);
    });

    let provider = create_provider(config.openai_api_key.clone(), &config.openai_model);

    // A generative default without a provider key cannot work; degrade
    // to static replies once, loudly, at startup.
    let default_reply = if config.default_reply == DefaultAction::Generative && provider.is_none()
    {
        tracing::warn!("COACH_DEFAULT_REPLY=generative but OPENAI_API_KEY is not set; falling back to static replies");
        DefaultAction::Static
    } else {
        config.default_reply
    };

    eprintln!("🤖 Coach Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook", config.port);
    eprintln!("   Verify token: {}", config.verify_token);
    eprintln!(
        "   Signature check: {}",
        if config.app_secret.is_some() { "on" } else { "off (APP_SECRET not set)" }
    );
    eprintln!(
        "   Default reply: {}",
        match default_reply {
            DefaultAction::Static => "static",
            DefaultAction::Generative => "generative",
        }
    );
    eprintln!(
        "   Generative provider: {}\n",
        if provider.is_some() {
            config.openai_model.as_str()
        } else {
            "disabled"
        }
    );

    let whatsapp = Arc::new(WhatsAppClient::new(
        config.phone_id.clone(),
        config.access_token.clone(),
    ));

    let bot = Arc::new(Bot::new(
        Dispatcher::with_default_rules(default_reply),
        Arc::clone(&whatsapp),
        provider.clone(),
        config.provider_timeout,
    ));

    let state = Arc::new(AppState {
        bot,
        whatsapp,
        verify_token: config.verify_token.clone(),
        app_secret: config.app_secret.clone(),
        provider_configured: provider.is_some(),
    });

    let app = routes(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
