use anyhow::Result;
use clap::Parser;
use nodecfg::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        addr: cli.addr,
    };

    match cli.command {
        Commands::Show => nodecfg::core::show_run(&ctx),
        Commands::Edit(args) => nodecfg::core::edit_run(args, &ctx),
        Commands::Bootstrap(args) => nodecfg::core::bootstrap_run(args, &ctx),
        Commands::Shrink(args) => nodecfg::core::shrink_run(args, &ctx),
        Commands::Init(args) => nodecfg::infra::config::init(args, &ctx),
        Commands::Completions(args) => nodecfg::completion::run(args),
    }
}
