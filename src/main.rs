use clap::Parser;
use test_report::cli::commands::{cmd_generate, cmd_summary, init_logging};
use test_report::cli::config::{Cli, Commands, load_config};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let config = load_config(cli.config.as_deref());

    let result = match cli.command {
        Commands::Generate {
            artifacts,
            template,
            output,
            date,
            json_summary,
        } => cmd_generate(&artifacts, template, output, date, json_summary, &config),
        Commands::Summary { artifacts } => {
            cmd_summary(&artifacts, &config);
            Ok(())
        }
    };

    // Failing tests still produce a report; only a run that could not
    // render one exits non-zero.
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
