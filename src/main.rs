use std::io;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pipemeter::app::App;
use pipemeter::config::Config;
use pipemeter::signal;
use pipemeter::status::StatusSink;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = Config::parse();
    let settings = config.settings();

    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(io::stderr)
        .init();

    let sink = StatusSink::open(settings.status_target.as_ref(), settings.policy)?;
    let line_end = sink.line_end();

    let cancel = match signal::install() {
        Ok(flag) => flag,
        Err(err) if settings.policy.is_strict() => {
            return Err(err).wrap_err("failed to install SIGINT handler");
        }
        Err(err) => {
            warn!(error = %err, "failed to install SIGINT handler");
            &signal::INTERRUPTED
        }
    };

    let mut app = App::new(settings, sink, line_end)?;
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    app.run(&mut input, &mut output, cancel)?;
    app.finish()?;

    Ok(())
}
