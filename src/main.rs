use clap::Parser;
use std::process::ExitCode;

use xlate_cli::cli::commands::{
    configure, file, history, interactive, languages, providers, translate,
};
use xlate_cli::cli::{Args, Command, HistoryCommand};
use xlate_cli::config::ResolveOptions;
use xlate_cli::error::TranslateError;
use xlate_cli::output::{self, OutputConfig};
use xlate_cli::logging;
use xlate_cli::ui::Style;

/// Exit code for invalid arguments, matching clap's usage errors.
const EXIT_INVALID_ARGS: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    output::init(OutputConfig::from_flags(args.quiet));
    logging::init(args.verbose);

    tokio::select! {
        result = run(args) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(&e),
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!();
            eprintln!("Translation cancelled by user.");
            ExitCode::SUCCESS
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let resolve = ResolveOptions {
        provider: args.provider,
        source: args.source,
        target: args.target,
        no_history: args.no_history,
    };

    match args.command {
        Some(Command::Languages { provider, live }) => {
            languages::run_languages(provider.or(args.provider), live).await
        }
        Some(Command::History {
            command: Some(HistoryCommand::Clear { yes }),
            ..
        }) => history::run_clear(yes),
        Some(Command::History { limit, lang, .. }) => history::run_history(limit, lang.as_deref()),
        Some(Command::Providers) => providers::print_providers(),
        Some(Command::Configure { show }) => configure::run_configure(show),
        None if args.interactive => interactive::run_interactive(resolve, args.details).await,
        None => match args.file {
            Some(input) => {
                file::run_file(file::FileOptions {
                    input,
                    output: args.output,
                    resolve,
                })
                .await
            }
            None => {
                translate::run_translate(translate::TranslateOptions {
                    text: args.text,
                    resolve,
                    details: args.details,
                })
                .await
            }
        },
    }
}

/// Prints the error with a hint and picks the exit code.
fn report(err: &anyhow::Error) -> ExitCode {
    eprintln!("{} {err:#}", Style::error("Error:"));

    let translate_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<TranslateError>());
    if let Some(hint) = translate_error.and_then(TranslateError::hint) {
        eprintln!("{}", Style::hint(hint));
    }

    if translate_error.is_some_and(TranslateError::is_validation) {
        ExitCode::from(EXIT_INVALID_ARGS)
    } else {
        ExitCode::FAILURE
    }
}
