//! Nostalgia Friend - Terminal demo.
//!
//! Reads player lines from stdin and prints the conversation to stdout.
//! Configure with `NOSTALGIA_FRIEND__*` environment variables or a `.env` file.

use std::error::Error;
use std::io::BufRead;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nostalgia_friend::adapters::{
    ConsoleDisplay, FileEmotionLog, HuggingFaceConfig, HuggingFaceEmotionClassifier,
    HuggingFaceReplyGenerator, LoggingClassifier,
};
use nostalgia_friend::application::{ControllerConfig, ConversationController};
use nostalgia_friend::config::{AppConfig, InferenceConfig};
use nostalgia_friend::domain::conversation::PromptRenderConfig;
use nostalgia_friend::ports::EmotionClassifier;

/// Lines buffered between the stdin reader and the controller.
const INPUT_BUFFER: usize = 16;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nostalgia_friend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    tracing::info!(
        reply_model = %config.inference.reply_model,
        classifier_model = %config.inference.classifier_model,
        emotion_log = ?config.emotion_log.enabled.then_some(&config.emotion_log.path),
        "Starting Nostalgia Friend"
    );

    let classifier = HuggingFaceEmotionClassifier::new(hugging_face_config(
        &config.inference,
        &config.inference.classifier_model,
    ))?;
    let classifier: Arc<dyn EmotionClassifier> = if config.emotion_log.enabled {
        Arc::new(LoggingClassifier::new(
            classifier,
            Arc::new(FileEmotionLog::new(&config.emotion_log.path)),
        ))
    } else {
        Arc::new(classifier)
    };

    let prompt = PromptRenderConfig {
        max_new_tokens: config.inference.max_new_tokens,
        ..PromptRenderConfig::default()
    };
    let generator = HuggingFaceReplyGenerator::new(hugging_face_config(
        &config.inference,
        &config.inference.reply_model,
    ))?
    .with_render_config(&prompt);

    let controller_config = ControllerConfig {
        call_timeout: config.inference.timeout(),
        reply_lines: config.conversation.reply_lines,
        typing_placeholder: config.conversation.typing_placeholder.clone(),
        opening_line: config.conversation.opening_line(),
        prompt,
    };

    let controller = ConversationController::with_config(
        classifier,
        Arc::new(generator),
        Arc::new(ConsoleDisplay::new()),
        controller_config,
    );

    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    let listener = controller.start(rx)?;

    // Blocking stdin reads stay off the runtime. The thread is detached so
    // an interrupted read never holds up exit.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
        _ = listener => {
            // Input closed; let the last reply land before exiting.
            controller.wait_until_idle().await;
        }
    }

    controller.stop();
    Ok(())
}

fn hugging_face_config(inference: &InferenceConfig, model: &str) -> HuggingFaceConfig {
    HuggingFaceConfig::new(inference.api_token.expose_secret().clone(), model)
        .with_base_url(inference.base_url.clone())
        .with_timeout(inference.timeout())
}
