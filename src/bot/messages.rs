//! Canned reply texts. Everything user-visible on a failure path is static
//! and generic; no error detail crosses the chat boundary.

/// Reply to /start.
pub const WELCOME: &str = "Hello! Send me a PDF document, and I'll extract the text for you.";

/// Reply to /help.
pub const HELP: &str = "Send a PDF and I'll do my best to extract the text via OCR.\n\n\
Commands:\n\
/start - Welcome message\n\
/help - This help message";

/// Reply when a document is not a PDF.
pub const NOT_A_PDF: &str = "Please send a valid PDF file.";

/// Reply when the OCR fallback fails.
pub const PROCESSING_FAILED: &str = "Sorry, I couldn't process the PDF. Please try again.";

/// Reply when both stages produce nothing.
pub const NO_TEXT_FOUND: &str = "No text found. The PDF might be empty or unreadable.";
