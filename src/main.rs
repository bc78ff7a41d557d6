#[tokio::main]
async fn main() {
    if let Err(err) = pdftext_bot::run().await {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}
