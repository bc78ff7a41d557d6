pub mod chunker;
pub mod handler;
pub mod messages;

pub use chunker::chunk_text;
pub use handler::MessageHandler;
