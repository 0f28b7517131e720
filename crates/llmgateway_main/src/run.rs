use std::io::{self, Write};

use anyhow::Context as _;
use llmgateway_client::{AsyncClient, BlockingClient, Client, Completion};
use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::cli::{ChatArgs, Cli, Command};
use crate::output::{write_chunk, write_health, write_models, write_response};

/// Runs the parsed command against the gateway and prints the result to
/// stdout. The client is closed before returning, on success and on error.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut client = Client::new(cli.config()?)?;
    info!(base_url = %client.base_url(), "Using LLM Gateway");

    let result = if cli.concurrent {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start the async runtime")?;
        runtime.block_on(run_concurrent(client.concurrent(), &cli.command))
    } else {
        run_blocking(client.blocking(), &cli.command)
    };

    client.close();
    result
}

fn run_blocking(client: &BlockingClient, command: &Command) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match command {
        Command::Health => write_health(&mut out, client.health_check()?)?,
        Command::Models => write_models(&mut out, &client.list_models()?)?,
        Command::Chat(args) => match client.chat_completions(args.to_request())? {
            Completion::Response(response) => write_response(&mut out, &response)?,
            Completion::Stream(stream) => {
                for chunk in stream {
                    write_chunk(&mut out, &chunk?)?;
                }
                writeln!(out)?;
            }
        },
    }
    Ok(())
}

async fn run_concurrent(client: &AsyncClient, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Health => {
            let health = client.health_check().await?;
            write_health(&mut io::stdout().lock(), health)?;
        }
        Command::Models => {
            let models = client.list_models().await?;
            write_models(&mut io::stdout().lock(), &models)?;
        }
        Command::Chat(args) => chat_concurrent(client, args).await?,
    }
    Ok(())
}

async fn chat_concurrent(client: &AsyncClient, args: &ChatArgs) -> anyhow::Result<()> {
    match client.chat_completions(args.to_request()).await? {
        Completion::Response(response) => write_response(&mut io::stdout().lock(), &response)?,
        Completion::Stream(mut stream) => {
            let mut count = 0usize;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                write_chunk(&mut io::stdout().lock(), &chunk)?;
                count += 1;
            }
            writeln!(io::stdout())?;
            debug!(chunks = count, "Stream finished");
        }
    }
    Ok(())
}
