use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod branches;
mod process;


#[derive(Debug, Parser)]
#[command(name = "aladi-cli")]
#[command(about = "Batch extractor for library catalog page captures")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract JSON records from every page capture in a directory
    Process {
        /// Directory holding `<name>.<language>.txt` captures
        #[arg(long, env = "ALADI_INPUT_DIR", default_value = "./pages")]
        input_dir: PathBuf,

        /// Directory for the extracted documents; defaults to the input
        /// directory
        #[arg(long, env = "ALADI_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Restrict processing to these language codes (default: all
        /// configured languages)
        #[arg(long, env = "ALADI_LANGUAGES", value_delimiter = ',')]
        languages: Vec<String>,

        /// Locale table YAML; the built-in table is used when omitted
        #[arg(long, env = "ALADI_LOCALES_PATH")]
        locales: Option<PathBuf>,

        /// Branch-id artifact used to remap location names; raw names are
        /// kept when omitted
        #[arg(long, env = "ALADI_BRANCHES_PATH")]
        branches: Option<PathBuf>,
    },
    /// Maintain the branch-id artifacts
    Branches {
        #[command(subcommand)]
        command: BranchesCommands,
    },
}

#[derive(Debug, Subcommand)]
enum BranchesCommands {
    /// Scan extracted `*.book-status.json` documents and write the two
    /// branch-id artifacts
    Build {
        /// Directory holding the status documents
        #[arg(long, env = "ALADI_INPUT_DIR", default_value = "./pages")]
        input_dir: PathBuf,

        /// Directory for the artifacts; defaults to the input directory
        #[arg(long, env = "ALADI_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Process {
            input_dir,
            output_dir,
            languages,
            locales,
            branches,
        }) => process::run(
            &input_dir,
            output_dir.as_deref(),
            &languages,
            locales.as_deref(),
            branches.as_deref(),
        ),
        Some(Commands::Branches {
            command: BranchesCommands::Build {
                input_dir,
                output_dir,
            },
        }) => branches::run_build(&input_dir, output_dir.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
