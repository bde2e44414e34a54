use clap::Parser;

use errlog::cli::Cli;
use errlog::runtime::{boot, run};

fn main() {
    let cli = Cli::parse();
    boot::init_logging();

    if let Err(e) = execute(&cli) {
        tracing::error!("{}", e);
        eprintln!("errlog: {e}");
        std::process::exit(1);
    }
}

fn execute(cli: &Cli) -> errlog::Result<()> {
    let mut config = boot::load_config(cli.config.as_deref())?;
    cli.apply(&mut config)?;
    config.validate()?;

    let filter = cli.entry_filter()?;
    let report = run::run(&config, &filter)?;
    println!("{}", report.render(config.output)?);
    Ok(())
}
