use std::process::ExitCode;

use clap::Parser;
use mimalloc::MiMalloc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Options};

mod app;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = Options::parse();

    let mut app = match App::new(&options) {
        Ok(app) => app,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    app.run(options.frames);

    if let Err(err) = app.export(&options.out, options.png) {
        error!("export failed: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
