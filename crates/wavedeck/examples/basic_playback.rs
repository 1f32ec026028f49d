//! Minimal playback session: connect, identify the device, play a track.
//!
//! Usage: cargo run --example basic_playback -- /dev/ttyUSB0

use std::time::Duration;

use anyhow::Context;
use wavedeck::{DeckBuilder, VoiceMode};

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
        .context("usage: basic_playback <serial-port>")?;

    let mut deck = DeckBuilder::new()
        .voice_mode(VoiceMode::Stereo)
        .serial_port(&port)
        .build()
        .await?;

    deck.start().await?;

    // The version and system info arrive asynchronously; give the device a
    // moment and poll until they show up.
    for _ in 0..50 {
        if let Some(version) = deck.version().await? {
            println!("firmware: {version}");
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    if let Some(tracks) = deck.track_count().await? {
        println!("tracks on storage: {tracks}");
    }

    deck.set_reporting(true).await?;
    deck.master_gain(0, 0).await?;

    println!("playing track 1");
    deck.track_play_poly(1, 0, false).await?;

    tokio::time::sleep(Duration::from_secs(1)).await;
    match deck.is_track_playing(1).await? {
        Some(voice) => println!("track 1 is sounding on voice {voice}"),
        None => println!("track 1 is not playing (missing file, or reports disabled?)"),
    }

    tokio::time::sleep(Duration::from_secs(4)).await;
    println!("fading out");
    deck.track_fade(1, -70, 2000, true).await?;
    tokio::time::sleep(Duration::from_millis(2500)).await;

    deck.close().await?;
    Ok(())
}
