//! エラー定義

use std::path::PathBuf;
use thiserror::Error;

/// CLI 側で区別して扱う必要のあるエラー
#[derive(Error, Debug)]
pub enum StoreError {
    /// `-x` が指定されず、最後に使用した実行ファイルも記録されていない
    #[error("No executable given and no previously used executable recorded")]
    NoExecutable,

    /// config.json が JSON として壊れている
    #[error("Malformed configuration file {path:?}: {source}")]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// デバッガプロセスを起動できなかった
    #[error("Failed to launch debugger '{program}': {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
