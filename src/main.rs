use std::time::Duration;

use anyhow::{Context, Result};
use voice_ide::buffer::TextBuffer;
use voice_ide::config::Config;
use voice_ide::local::{self, LocalAuth, LocalWorkspace};
use voice_ide::session::{Dispatcher, LineRecognizer, Session, SpeechSubscription};
use voice_ide::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;
    println!("✓ Config loaded from ~/.voice-ide.toml");

    telemetry::init(&config.telemetry)?;
    tracing::info!("voice-ide starting");

    let workspace = LocalWorkspace::new();
    let auth = LocalAuth::new();
    let dispatcher = Dispatcher::with_threshold(
        TextBuffer::new(),
        local::collaborators(&workspace, &auth),
        config.resolver.threshold,
    );
    let session = Session::new(dispatcher);
    let mut mode_rx = session.engine().watch_mode();

    let subscription =
        SpeechSubscription::start(LineRecognizer::stdin(), session, auth.status(), &config.speech);

    println!("\nVoice IDE is listening. Enter one transcript per line.");
    println!("Press Ctrl+D to end the session or Ctrl+C to exit.\n");
    println!("[mode] {}", *mode_rx.borrow_and_update());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                subscription.stop();
                break;
            }
            changed = mode_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("[mode] {}", *mode_rx.borrow_and_update());
            }
            () = tokio::time::sleep(Duration::from_millis(50)) => {
                // Poll interval for the end of the speech stream
                if subscription.is_finished() {
                    break;
                }
            }
        }
    }

    let session = subscription
        .join()
        .await
        .context("speech subscription failed")?;
    session.dispatcher().wait_idle();

    println!("\n--- buffer ---\n{}", session.dispatcher().surface().text());
    println!("--- mode: {} ---", session.engine().mode());
    if let Some(project) = workspace.project() {
        println!("--- project {project}: {:?} ---", workspace.files());
    }

    tracing::info!("voice-ide stopped");
    Ok(())
}
