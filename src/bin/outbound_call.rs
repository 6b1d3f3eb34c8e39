//! Originate an outbound coaching call.
//!
//! Usage: outbound-call <phone_number> [last_topic]

use coach_bot::config::VoiceConfig;
use coach_bot::dispatch::ConversationContext;
use coach_bot::voice::{validate_phone_number, CallDispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(phone_number) = args.first() else {
        eprintln!("Usage: outbound-call <phone_number> [last_topic]");
        eprintln!("Example: outbound-call +919650098052 \"building voice agents\"");
        std::process::exit(1);
    };

    if let Err(e) = validate_phone_number(phone_number) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let config = VoiceConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  Required: LIVEKIT_URL, LIVEKIT_API_KEY, LIVEKIT_API_SECRET");
        std::process::exit(1);
    });

    let context = args.get(1).map(|topic| ConversationContext {
        sender_id: phone_number.clone(),
        last_topic: topic.clone(),
    });

    println!("📞 Making outbound coaching call to {phone_number}");

    let dispatcher = CallDispatcher::new(config);
    match dispatcher.create_dispatch(phone_number, context.as_ref()).await {
        Ok(dispatch_id) => {
            println!("✅ Coaching call dispatched: {dispatch_id}");
            println!("📱 Your phone should ring shortly for your weekly check-in.");
            Ok(())
        }
        Err(e) => {
            eprintln!("💥 Failed to initiate coaching call: {e}");
            std::process::exit(1);
        }
    }
}
