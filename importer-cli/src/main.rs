mod backend;
mod catalog;
mod cli;
mod services;
mod wizard;

use anyhow::Result;
use clap::Parser;

use cli::commands::run::RunArgs;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Tables => cli::commands::tables::handle_tables_command(),
        Commands::Template { table, output } => {
            cli::commands::template::handle_template_command(table, output).await
        }
        Commands::Run {
            file,
            table,
            import_type,
            toggles,
            delimiter,
            encoding,
            seed,
            json,
            errors_report,
            no_color,
        } => {
            cli::commands::run::handle_run_command(RunArgs {
                file,
                table,
                import_type,
                toggles,
                delimiter,
                encoding,
                seed,
                json,
                errors_report,
                no_color,
            })
            .await
        }
    }
}
