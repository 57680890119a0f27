use std::io::{self, Read, Write};

use anyhow::Context;
use citydev::config::InvokeConfig;
use citydev::domain::device::service::Service;
use citydev::inbound::invoke::BlockingInvoker;
use citydev::inbound::payload::ResponseBody;
use citydev::outbound::blocking::Blocking;
use citydev::outbound::memory::InMemory;
use tracing_subscriber::EnvFilter;

/// Reads one payload from stdin, runs it and prints the response to stdout.
fn main() -> anyhow::Result<()> {
    let config = InvokeConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let store = InMemory::from_seed_file(&config.seed_path)?;
    let invoker = BlockingInvoker::new(Service::new(Blocking::new(store), config.mode))?;

    let mut payload = Vec::new();
    io::stdin()
        .read_to_end(&mut payload)
        .context("failed to read payload from stdin")?;

    let response = invoker.invoke(&payload);
    let body = serde_json::to_string(&ResponseBody::from(&response))
        .context("failed to encode response")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", body).context("failed to write response")?;

    Ok(())
}
