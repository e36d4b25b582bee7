//! デバッガプロセスの起動

use crate::errors::StoreError;
use crate::Result;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// 既定で起動するデバッガ
pub const DEFAULT_DEBUGGER: &str = "lldb";

/// デバッガに渡す起動内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    /// 生成済みスクリプトを `-S` で読み込んで起動する
    Script(PathBuf),
    /// 設定のない実行ファイルをそのまま渡して起動する
    Executable(PathBuf),
}

impl LaunchPlan {
    /// デバッガに渡すコマンドライン引数
    pub fn args(&self) -> Vec<String> {
        match self {
            LaunchPlan::Script(script) => {
                vec!["-S".to_string(), script.to_string_lossy().into_owned()]
            }
            LaunchPlan::Executable(executable) => {
                vec![executable.to_string_lossy().into_owned()]
            }
        }
    }
}

/// 外部デバッガの起動器
#[derive(Debug, Clone)]
pub struct DebuggerLauncher {
    program: String,
}

impl DebuggerLauncher {
    /// 起動するデバッガのプログラム名を指定して作成する
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// デバッガのプログラム名を取得する
    pub fn program(&self) -> &str {
        &self.program
    }

    /// デバッガを子プロセスとして起動し、終了まで待機する
    ///
    /// 標準入出力は親プロセスから継承するため、対話セッションはそのまま端末で動作します。
    /// 戻り値はデバッガの終了コードです（シグナルで終了した場合は 1）。
    pub fn launch(&self, plan: &LaunchPlan) -> Result<i32> {
        let args = plan.args();
        info!("Launching {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| StoreError::LaunchFailed {
                program: self.program.clone(),
                source,
            })?;

        debug!("{} exited with {}", self.program, status);
        Ok(status.code().unwrap_or(1))
    }
}

impl Default for DebuggerLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_DEBUGGER)
    }
}

/// スクリプトの有無から起動内容を決める
pub fn plan_for(script: Option<&Path>, executable: &Path) -> LaunchPlan {
    match script {
        Some(script) => LaunchPlan::Script(script.to_path_buf()),
        None => LaunchPlan::Executable(executable.to_path_buf()),
    }
}
