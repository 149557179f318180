use std::process::ExitCode;

mod app;
mod args;
mod logger;
mod progress;
mod prompt;
mod regions;
mod utils;

use app::App;

#[tokio::main]
async fn main() -> ExitCode {
    App::new().run().await
}
