//! ストアに対するコマンド

use crate::launcher::DebuggerLauncher;
use crate::store::BreakpointStore;
use crate::{Result, StoreError};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// ストアに対するコマンド
///
/// 1回の起動につき1つのコマンドだけを実行します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// デバッガを起動
    Start { executable: Option<PathBuf> },
    /// ブレークポイントをトグル
    Break {
        executable: Option<PathBuf>,
        source: PathBuf,
        line: u32,
    },
    /// ブレークポイントを解除（`all` の場合は設定を完全に削除）
    Clean {
        all: bool,
        executable: Option<PathBuf>,
    },
    /// 最後に使用した実行ファイルを設定
    Touch { executable: PathBuf },
    /// ブレークポイント一覧を表示
    Print { executable: Option<PathBuf> },
    /// 設定からスクリプトを再生成
    Build,
}

/// コマンド実行時の設定
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// 詳細表示
    pub verbose: bool,
    /// デバッガの起動器
    pub launcher: DebuggerLauncher,
}

impl Command {
    /// コマンド名
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start { .. } => "start",
            Command::Break { .. } => "break",
            Command::Clean { .. } => "clean",
            Command::Touch { .. } => "touch",
            Command::Print { .. } => "print",
            Command::Build => "build",
        }
    }

    /// 対象の実行ファイルを必要とするか
    pub fn requires_executable(&self) -> bool {
        match self {
            Command::Start { .. } | Command::Break { .. } | Command::Print { .. } => true,
            Command::Clean { all, .. } => !all,
            Command::Touch { .. } | Command::Build => false,
        }
    }

    fn executable(&self) -> Option<&PathBuf> {
        match self {
            Command::Start { executable }
            | Command::Break { executable, .. }
            | Command::Clean { executable, .. }
            | Command::Print { executable } => executable.as_ref(),
            Command::Touch { executable } => Some(executable),
            Command::Build => None,
        }
    }

    /// コマンドを実行する
    ///
    /// 設定を変更するコマンドは最後に保存します。戻り値はプロセスの終了コードです。
    pub fn execute<W: Write>(
        &self,
        store: &mut BreakpointStore,
        options: &CommandOptions,
        out: &mut W,
    ) -> Result<i32> {
        if self.requires_executable() && self.executable().is_none() && store.last_used().is_none()
        {
            return Err(StoreError::NoExecutable.into());
        }
        info!("Running {} command", self.name());

        match self {
            Command::Start { executable } => {
                let plan = store.debug(executable.as_deref())?;
                // スクリプトを最新にしてから起動する
                store.save()?;
                options.launcher.launch(&plan)
            }
            Command::Break {
                executable,
                source,
                line,
            } => {
                store.toggle_breakpoint(executable.as_deref(), source, *line)?;
                store.save()?;
                Ok(0)
            }
            Command::Clean { all: true, .. } => {
                store.clean()?;
                Ok(0)
            }
            Command::Clean {
                all: false,
                executable,
            } => {
                let cleared = store.clean_breakpoints(executable.as_deref())?;
                info!("Cleared {} breakpoint(s)", cleared);
                store.save()?;
                Ok(0)
            }
            Command::Touch { executable } => {
                store.set_last_used(executable);
                store.save()?;
                Ok(0)
            }
            Command::Print { executable } => {
                store.print_breakpoints(executable.as_deref(), options.verbose, out)?;
                Ok(0)
            }
            Command::Build => {
                let written = store.export_commands()?;
                info!("Rebuilt {} script(s)", written.len());
                Ok(0)
            }
        }
    }
}
