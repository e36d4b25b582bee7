//! breakstore CLI - コマンドラインインターフェース
//!
//! lldb 用のブレークポイント設定を永続化し、設定済みの状態でデバッガを起動する

use anyhow::Result;
use breakstore_core::launcher::DEFAULT_DEBUGGER;
use breakstore_core::store::DEFAULT_DIRECTORY;
use breakstore_core::{BreakpointStore, Command, CommandOptions, DebuggerLauncher, StoreError};
use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// breakstore - Persistent breakpoints for lldb
#[derive(Parser, Debug)]
#[command(name = "breakstore")]
#[command(version = "0.1.0")]
#[command(about = "Persistent debugging options for lldb", long_about = None)]
struct Cli {
    /// Directory holding config.json and generated scripts
    #[arg(short, long, global = true, env = "BREAKSTORE_DIR", default_value = DEFAULT_DIRECTORY)]
    dir: PathBuf,

    /// Debugger program to launch
    #[arg(long, global = true, env = "BREAKSTORE_DEBUGGER", default_value = DEFAULT_DEBUGGER)]
    debugger: String,

    /// Verbose output (full executable paths, debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Executable to be debugged (last used if omitted)
    #[arg(short = 'x', long, value_name = "EXECUTABLE")]
    executable: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<StoreCommand>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum StoreCommand {
    /// Launch the debugger with saved breakpoints
    Start {
        /// Executable to be debugged (last used if omitted)
        #[arg(short = 'x', long, value_name = "EXECUTABLE")]
        executable: Option<PathBuf>,
    },

    /// Toggle breakpoint
    #[command(visible_alias = "b")]
    Break {
        /// Executable to be debugged (last used if omitted)
        #[arg(short = 'x', long, value_name = "EXECUTABLE")]
        executable: Option<PathBuf>,

        /// Source file for breakpoint
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Line number for breakpoint
        #[arg(value_name = "LINE")]
        line: u32,
    },

    /// Remove existing breakpoints for current executable
    Clean {
        /// Completely delete config file (ERASES CURRENT CONFIG)
        #[arg(short, long)]
        all: bool,

        /// Executable to be debugged (last used if omitted)
        #[arg(short = 'x', long, value_name = "EXECUTABLE")]
        executable: Option<PathBuf>,
    },

    /// Set last used executable
    #[command(visible_alias = "t")]
    Touch {
        /// Executable to be debugged
        #[arg(value_name = "EXECUTABLE")]
        executable: PathBuf,
    },

    /// Print breakpoints
    #[command(visible_alias = "p")]
    Print {
        /// Executable to be debugged (last used if omitted)
        #[arg(short = 'x', long, value_name = "EXECUTABLE")]
        executable: Option<PathBuf>,
    },

    /// Rebuild lldb files from config
    Build,
}

impl Cli {
    /// サブコマンドをストアのコマンドに変換する（省略時は start）
    ///
    /// サブコマンドより前に置かれた `-x` は、サブコマンド側で指定がなければそちらに引き継ぐ
    fn into_command(self) -> Command {
        let outer = self.executable;
        match self.command {
            None => Command::Start { executable: outer },
            Some(StoreCommand::Start { executable }) => Command::Start {
                executable: executable.or(outer),
            },
            Some(StoreCommand::Break {
                executable,
                source,
                line,
            }) => Command::Break {
                executable: executable.or(outer),
                source,
                line,
            },
            Some(StoreCommand::Clean { all, executable }) => Command::Clean {
                all,
                executable: executable.or(outer),
            },
            Some(StoreCommand::Touch { executable }) => Command::Touch { executable },
            Some(StoreCommand::Print { executable }) => Command::Print {
                executable: executable.or(outer),
            },
            Some(StoreCommand::Build) => Command::Build,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => report_error(&e, &mut std::io::stderr()),
    };
    std::process::exit(code);
}

/// エラーを報告して終了コードを返す
///
/// 実行ファイルが決まらない場合は使い方を表示する。出力先は標準エラー。
fn report_error<W: Write>(error: &anyhow::Error, err: &mut W) -> i32 {
    let written = match error.downcast_ref::<StoreError>() {
        Some(StoreError::NoExecutable) => Cli::command().write_help(err),
        _ => writeln!(err, "Error: {:#}", error),
    };
    if let Err(e) = written {
        tracing::warn!("Failed to write error report: {}", e);
    }
    1
}

/// ログ出力を初期化する
///
/// 標準出力は print コマンドの出力に使うため、ログは標準エラーに出す
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 設定を読み込んでコマンドを1つ実行する
fn run(cli: Cli) -> Result<i32> {
    let options = CommandOptions {
        verbose: cli.verbose,
        launcher: DebuggerLauncher::new(cli.debugger.clone()),
    };
    let mut store = BreakpointStore::open(&cli.dir)?;
    debug!(
        "Using configuration {:?}, debugger '{}'",
        store.config_path(),
        options.launcher.program()
    );

    let command = cli.into_command();
    let mut stdout = std::io::stdout().lock();
    command.execute(&mut store, &options, &mut stdout)
}
