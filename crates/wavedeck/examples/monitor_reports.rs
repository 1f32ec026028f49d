//! Subscribe to deck events and print every track start and stop.
//!
//! Usage: cargo run --example monitor_reports -- /dev/ttyUSB0

use std::time::Duration;

use anyhow::Context;
use wavedeck::{DeckBuilder, DeckEvent, VoiceMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let port = std::env::args()
        .nth(1)
        .context("usage: monitor_reports <serial-port>")?;

    let mut deck = DeckBuilder::new()
        .voice_mode(VoiceMode::Stereo)
        .serial_port(&port)
        .build()
        .await?;

    let mut events = deck.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                DeckEvent::TrackStarted { track, voice } => {
                    println!("+ track {track:4} -> voice {voice}");
                }
                DeckEvent::TrackStopped { track, voice } => {
                    println!("- track {track:4} <- voice {voice}");
                }
                DeckEvent::VersionReceived { version } => {
                    println!("firmware: {version}");
                }
                DeckEvent::SystemInfoReceived { voices, tracks } => {
                    println!("{voices} voices, {tracks} tracks");
                }
            }
        }
    });

    deck.start().await?;
    deck.set_reporting(true).await?;

    println!("monitoring; trigger tracks on the device (ctrl-c to quit)");
    loop {
        deck.poll().await?;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
