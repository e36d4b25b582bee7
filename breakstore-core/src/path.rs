//! パス関連のユーティリティ関数

use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// パスを正規化された絶対パスに変換する
///
/// 相対パスはカレントディレクトリを基準に解決し、`.` と `..` を字句的に取り除きます。
/// シンボリックリンクは解決せず、ファイルが存在する必要もありません。
///
/// # Examples
/// ```
/// use breakstore_core::path::canonical_path;
/// use std::path::Path;
///
/// assert_eq!(canonical_path("/usr/bin/../lib/./foo"), Path::new("/usr/lib/foo"));
/// ```
pub fn canonical_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        normalize(path)
    } else {
        resolve_relative(path, std::env::current_dir())
    }
}

/// 相対パスを基準ディレクトリに連結して正規化する
///
/// 基準ディレクトリが得られない場合は警告を出し、相対パスのまま正規化する
fn resolve_relative(path: &Path, cwd: io::Result<PathBuf>) -> PathBuf {
    match cwd {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(e) => {
            warn!("Cannot resolve {:?} against the current directory: {}", path, e);
            normalize(path)
        }
    }
}

/// `.` と `..` を字句的に取り除く
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // ルートより上には遡らない
                if !matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// 設定ファイルのキーとして使う正規化済みパス文字列を返す
pub fn canonical_key<P: AsRef<Path>>(path: P) -> String {
    canonical_path(path).to_string_lossy().into_owned()
}

/// 拡張子を除いたファイル名を返す
pub fn raw_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// ソースファイルのパスからベース名だけを取り出す
pub fn source_basename<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
