use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fsutil::config::FsConfig;
use fsutil::fs_op::{self, ExtensionSet, Outcome, TransferReport};
use fsutil::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "fsutil", version, about = "File and directory helpers")]
struct Cli {
    /// Config file (defaults to the per-user fsutil.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging; repeat for trace output.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Exit with status 2 when an operation raised warnings.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy a file or directory into DEST_DIR.
    Copy {
        src: PathBuf,
        dest_dir: PathBuf,
        /// No rollback on failure; existing files are kept unless --overwrite.
        #[arg(long)]
        force: bool,
        #[arg(long, requires = "force")]
        overwrite: bool,
    },
    /// Move a file or directory into DEST_DIR.
    Move {
        src: PathBuf,
        dest_dir: PathBuf,
        #[arg(long)]
        force: bool,
        #[arg(long, requires = "force")]
        overwrite: bool,
    },
    /// Delete a file or directory tree.
    Delete { path: PathBuf },
    /// Delete everything inside a directory.
    Clean { dir: PathBuf },
    /// Rename in place, keeping the old extension if NEW_NAME has none.
    Rename { path: PathBuf, new_name: String },
    /// Create a directory (and its parents).
    Mkdir {
        parent: PathBuf,
        child: Option<String>,
        #[arg(long)]
        skip_existing: bool,
    },
    /// List files recursively, optionally filtered by extension.
    List {
        dir: PathBuf,
        /// Extension without the dot; repeatable.
        #[arg(short, long = "ext")]
        extensions: Vec<String>,
    },
    /// Count lines in a file.
    Lines { file: PathBuf },
    /// Print a text file with canonical line endings.
    Cat {
        file: PathBuf,
        #[arg(long)]
        charset: Option<String>,
    },
    /// Write TEXT to FILE with canonical line endings.
    Write {
        file: PathBuf,
        text: String,
        #[arg(long)]
        charset: Option<String>,
    },
    /// Print base name and extension of a path.
    Name { path: PathBuf },
    /// Rewrite path separators for this platform.
    Normalize { path: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = FsConfig::load_or_default(cli.config.as_deref()).context("loading config")?;
    let filter = match cli.verbose {
        0 => config.log_filter.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    init_logging(&filter);

    let warnings = execute(cli.command, &config)?;
    if cli.strict && warnings > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn report_transfer(verb: &str, outcome: &Outcome<TransferReport>) {
    let r = &outcome.value;
    println!(
        "{} {} paths ({} bytes), {} overwritten, {} skipped",
        verb,
        r.created.len(),
        r.bytes_copied,
        r.overwritten.len(),
        r.skipped.len()
    );
}

/// Run one command, returning how many warnings it raised.
fn execute(command: Command, config: &FsConfig) -> Result<usize> {
    let options = config.transfer_options();
    let warnings = match command {
        Command::Copy { src, dest_dir, force, overwrite } => {
            let result = if force {
                fs_op::force_copy_with(&src, &dest_dir, overwrite, &options)
            } else {
                fs_op::copy_with(&src, &dest_dir, &options)
            };
            let outcome = result.with_context(|| format!("copying {}", src.display()))?;
            report_transfer("copied", &outcome);
            outcome.warnings.len()
        }
        Command::Move { src, dest_dir, force, overwrite } => {
            let result = if force {
                fs_op::force_move_with(&src, &dest_dir, overwrite, &options)
            } else {
                fs_op::move_to_with(&src, &dest_dir, &options)
            };
            let outcome = result.with_context(|| format!("moving {}", src.display()))?;
            report_transfer("moved", &outcome);
            outcome.warnings.len()
        }
        Command::Delete { path } => fs_op::delete(&path).warnings.len(),
        Command::Clean { dir } => fs_op::clean(&dir).warnings.len(),
        Command::Rename { path, new_name } => {
            let outcome = fs_op::rename(&path, &new_name)
                .with_context(|| format!("renaming {}", path.display()))?;
            println!("{}", outcome.value.display());
            outcome.warnings.len()
        }
        Command::Mkdir { parent, child, skip_existing } => {
            let outcome = fs_op::make_directory(&parent, child.as_deref().unwrap_or(""), skip_existing)
                .context("creating directory")?;
            println!("{}", outcome.value.display());
            outcome.warnings.len()
        }
        Command::List { dir, extensions } => {
            let filter: ExtensionSet = extensions.into_iter().collect();
            let files = fs_op::list_files_to_depth(&dir, &filter, config.max_depth)
                .with_context(|| format!("listing {}", dir.display()))?;
            for f in files {
                println!("{}", f.display());
            }
            0
        }
        Command::Lines { file } => {
            let n = fs_op::count_lines(&file)
                .with_context(|| format!("counting lines of {}", file.display()))?;
            println!("{}", n);
            0
        }
        Command::Cat { file, charset } => {
            let charset = charset.unwrap_or_else(|| config.charset.clone());
            let text = fs_op::read_as_text_with(&file, &charset)
                .with_context(|| format!("reading {}", file.display()))?;
            println!("{}", text);
            0
        }
        Command::Write { file, text, charset } => {
            let charset = charset.unwrap_or_else(|| config.charset.clone());
            fs_op::write_text_encoded(&text, &file, &charset)
                .with_context(|| format!("writing {}", file.display()))?;
            0
        }
        Command::Name { path } => {
            let base = fs_op::base_name(&path);
            let ext = fs_op::extension(&path);
            println!("{}", base.as_deref().unwrap_or(""));
            println!("{}", ext.as_deref().unwrap_or(""));
            usize::from(base.is_none())
        }
        Command::Normalize { path } => {
            println!("{}", fs_op::normalize_separators(&path));
            0
        }
    };
    Ok(warnings)
}
