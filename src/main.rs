use std::io::Write;
use std::sync::Arc;

use advisor_chat::adapters::ai::{
    AnthropicConfig, AnthropicProvider, FailoverAIProvider, MockAIProvider, OpenAIConfig,
    OpenAIProvider,
};
use advisor_chat::adapters::terminal::TerminalRenderer;
use advisor_chat::application::{ChatSettings, ConversationController, SubmitOutcome, ADVISOR_PREAMBLE};
use advisor_chat::config::{AiConfig, AiProvider, AppConfig, ConfigError, LoggingConfig};
use advisor_chat::domain::conversation::FeedbackLabel;
use advisor_chat::domain::rendering::TurnView;
use advisor_chat::ports::{AIError, AIProvider};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const GREETING: &str = "Hi! Ask me about saving, budgeting, or Canadian accounts like the TFSA and RRSP. \
Type a number to pick an option, /feedback <1-3> when asked, or /quit to leave.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate().map_err(ConfigError::from)?;

    let provider = build_provider(&config.ai)?;
    tracing::info!(
        provider = %provider.provider_info().name,
        model = %provider.provider_info().model,
        "Starting session"
    );

    let settings = ChatSettings {
        preamble: config
            .chat
            .preamble
            .clone()
            .unwrap_or_else(|| ADVISOR_PREAMBLE.to_string()),
        max_tokens: config.chat.max_tokens,
        temperature: config.chat.temperature,
    };
    let controller = ConversationController::with_settings(provider, settings);
    let renderer = TerminalRenderer::default();

    println!("{}", renderer.render_notice(GREETING));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut options: Vec<String> = Vec::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let outcome = match Command::parse(&line, options.len()) {
            Command::Quit => break,
            Command::Feedback(answer) => {
                let reply = answer
                    .parse::<FeedbackLabel>()
                    .and_then(|label| controller.record_feedback(label));
                let notice = match reply {
                    Ok(()) => "Thanks for the feedback!".to_string(),
                    Err(err) => err.to_string(),
                };
                println!("{}", renderer.render_notice(&notice));
                continue;
            }
            Command::Pick(index) => controller.choose_option(&options[index]).await,
            Command::Text(text) => controller.submit(text).await,
        };

        if outcome == SubmitOutcome::Ignored {
            continue;
        }

        if let Some(turn) = controller.turns().last() {
            let view = TurnView::project(turn);
            for rendered in renderer.render_turn(&view) {
                println!("{}", rendered);
            }
            options = view.quick_replies;
        }

        if outcome.feedback_prompted() {
            for rendered in renderer.render_feedback_prompt() {
                println!("{}", rendered);
            }
        }
    }

    let summary = controller.end();
    let feedback = summary
        .feedback
        .selection()
        .map_or("none", |label| label.label());
    println!(
        "{}",
        renderer.render_notice(&format!(
            "Goodbye! {} turns, feedback: {}.",
            summary.conversation.len(),
            feedback
        ))
    );

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());

    // Stderr keeps log lines out of the rendered conversation.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            logging
                .json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!logging.json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    let primary = provider_for(ai, ai.primary_provider, ai.model.clone())?;

    match ai.fallback_provider {
        Some(fallback) if fallback != ai.primary_provider => {
            let fallback = provider_for(ai, fallback, None)?;
            Ok(Arc::new(
                FailoverAIProvider::new(primary).with_fallback(fallback),
            ))
        }
        _ => Ok(primary),
    }
}

fn provider_for(
    ai: &AiConfig,
    kind: AiProvider,
    model: Option<String>,
) -> Result<Arc<dyn AIProvider>, AIError> {
    match kind {
        AiProvider::Anthropic => {
            let mut config = AnthropicConfig::new(ai.anthropic_api_key.clone().unwrap_or_default())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(model) = model {
                config = config.with_model(model);
            }
            Ok(Arc::new(AnthropicProvider::new(config)?))
        }
        AiProvider::OpenAI => {
            let mut config = OpenAIConfig::new(ai.openai_api_key.clone().unwrap_or_default())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(model) = model {
                config = config.with_model(model);
            }
            Ok(Arc::new(OpenAIProvider::new(config)?))
        }
        AiProvider::Mock => Ok(Arc::new(demo_provider())),
    }
}

/// Offline script that walks through every kind of rendered reply.
fn demo_provider() -> MockAIProvider {
    MockAIProvider::new()
        .with_response(
            "Happy to help you get started.\n\
             What would you like to focus on first?\n\
             1. Building an emergency fund\n\
             2. Choosing between a TFSA and RRSP\n\
             3. Paying down debt",
        )
        .with_response(
            "Both accounts shelter growth from tax:\n\
             - TFSA withdrawals are tax-free\n\
             - RRSP contributions reduce taxable income now\n\
             ⚠️ Over-contributing to a TFSA costs 1% per month on the excess.\n\
             See [TFSA limits](https://www.canada.ca/en/revenue-agency/services/tax/individuals/topics/tax-free-savings-account.html).\n\
             Is your income likely to be higher in retirement?\n\
             A) Yes  B) No",
        )
        .with_response("Roughly how much could you set aside each month?")
        .with_response(
            "A TFSA is probably the better first step for you.\n\
             ⚠️ Check your contribution room on CRA My Account before depositing.\n\
             Good luck! Do you have any other questions?",
        )
}

/// One line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Feedback(&'a str),
    /// Zero-based index of a displayed quick reply.
    Pick(usize),
    Text(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str, option_count: usize) -> Self {
        let input = line.trim();

        if input == "/quit" {
            return Command::Quit;
        }

        if let Some(answer) = input.strip_prefix("/feedback") {
            return Command::Feedback(answer.trim());
        }

        match input.parse::<usize>() {
            Ok(n) if (1..=option_count).contains(&n) => Command::Pick(n - 1),
            _ => Command::Text(input),
        }
    }
}
