use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod check;
mod compile;
mod debug;
mod run;
mod utils;


/// Environment variable holding the log filter
const LOG_ENV: &str = "CHIP_LOG";

fn version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (git:", env!("GIT_HASH"), ")")
}

#[derive(Parser)]
#[command(
    name = "chip",
    version = version(),
    about = "Run, check and compile chip programs",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Script to run when no subcommand is given
    script: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Evaluate a script and print what it prints
    Run {
        /// Path of the script, or "-" for stdin
        file: String,
        /// Go through the Lua backend instead of the interpreter
        #[arg(long)]
        compiled: bool,
    },
    /// Report syntax errors without running anything
    Check { file: String },
    /// Translate a script into a Lua chunk
    Compile {
        file: String,
        /// Where to write the chunk (the script path with a .lua extension otherwise)
        #[arg(short, long)]
        output: Option<String>,
        /// Write declarations and module usage to a .ron file beside the chunk
        #[arg(long)]
        metadata: bool,
    },
    /// Dump the syntax tree
    #[command(hide = true)]
    Ast {
        file: String,
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// The subcommand to dispatch, with a bare script meaning `run`.
    fn into_command(self) -> Option<Command> {
        self.command.or_else(|| {
            self.script.map(|file| Command::Run {
                file,
                compiled: false,
            })
        })
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let Some(command) = Cli::parse().into_command() else {
        let mut help = Cli::command();
        if let Err(e) = help.print_long_help() {
            eprintln!("could not print help: {e}");
            std::process::exit(1);
        }
        return;
    };
    tracing::debug!(?command, "dispatching");

    match command {
        Command::Run { file, compiled } => run::handle_run(&file, compiled),
        Command::Check { file } => check::handle_check(&file),
        Command::Compile {
            file,
            output,
            metadata,
        } => compile::handle_compile(&file, output.as_deref(), metadata),
        Command::Ast { file, json } => debug::handle_ast(&file, json),
    }
}
