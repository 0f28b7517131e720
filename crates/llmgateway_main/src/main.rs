use clap::Parser;
use llmgateway_main::{init_tracing, run, Cli};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose)?;

    run(cli)
}
