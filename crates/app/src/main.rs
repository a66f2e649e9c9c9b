//! Murmur - chat bubble preview
//!
//! Renders a conversation as message bubbles in the terminal. Reads a JSON
//! lines file given as the first argument, or shows a sample conversation
//! and plays its pending deliveries forward.

use std::path::PathBuf;

use murmur_core::BubbleConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod conversation;
mod viewmodel;

/// Width of the preview in columns
const PREVIEW_WIDTH: usize = 60;

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Murmur");

    let config = match BubbleConfig::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load bubble config: {}", e);
            std::process::exit(1);
        }
    };

    let source = std::env::args().nth(1).map(PathBuf::from);
    let mut messages = match &source {
        Some(path) => match conversation::load_json_lines(path) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!(
                    "Failed to load {}: {}",
                    path.display(),
                    conversation::describe_error(&e)
                );
                std::process::exit(1);
            }
        },
        None => conversation::sample(),
    };

    let mut chat = viewmodel::ChatViewModel::new(config, PREVIEW_WIDTH);
    if let Err(e) = chat.set_messages(&messages) {
        tracing::error!("Failed to lay out conversation: {}", e);
        std::process::exit(1);
    }
    print_rows(&chat);

    if source.is_none() {
        while let Some(index) = conversation::deliver_next(&mut messages) {
            tracing::info!(index, state = %messages[index].state, "Delivery update");
            chat.update_message(index, &messages[index]);
            println!();
            print_rows(&chat);
        }
    }
}

fn print_rows(chat: &viewmodel::ChatViewModel) {
    for row in chat.render_rows() {
        println!("{}", row);
    }
}
