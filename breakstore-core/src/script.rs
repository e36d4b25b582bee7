//! lldb スクリプトの生成

use crate::breakpoint::ExecutableConfig;
use crate::path::raw_name;
use std::path::{Path, PathBuf};

/// 生成するスクリプトファイルの拡張子
pub const SCRIPT_EXTENSION: &str = "lldb";

/// 実行ファイルに対応するスクリプトファイルのパスを返す
///
/// `<dir>/<拡張子を除いた実行ファイル名>.lldb`
pub fn script_path<P: AsRef<Path>>(dir: &Path, executable: P) -> PathBuf {
    dir.join(format!("{}.{}", raw_name(executable), SCRIPT_EXTENSION))
}

/// `lldb -S` で読み込めるコマンド列を生成する
pub fn render_script(executable: &str, config: &ExecutableConfig) -> String {
    let mut commands = vec![format!("file {}", executable)];
    commands.extend(
        config
            .locations()
            .map(|(file, line)| format!("breakpoint set --file {} --line {}", file, line)),
    );
    commands.join("\n")
}

/// パスが生成済みスクリプトファイルかどうか
pub fn is_script_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == SCRIPT_EXTENSION)
}
