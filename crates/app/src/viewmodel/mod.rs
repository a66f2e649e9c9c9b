//! View models driving the bubble renderer

mod chat;

pub use chat::ChatViewModel;
