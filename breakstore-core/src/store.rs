//! ブレークポイントストア
//!
//! 実行ファイル（正規化済み絶対パス）ごとのブレークポイント設定と、最後に使用した実行ファイルを
//! `config.json` に永続化します。保存のたびに lldb スクリプトも再生成されます。

use crate::breakpoint::{ExecutableConfig, Toggle};
use crate::errors::StoreError;
use crate::launcher::{plan_for, LaunchPlan};
use crate::path::{canonical_key, source_basename};
use crate::script::{is_script_file, render_script, script_path};
use crate::Result;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 既定の設定ディレクトリ
pub const DEFAULT_DIRECTORY: &str = ".dbg";

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// config.json の内容
///
/// 実行ファイルのエントリと `LASTUSED` キーは同じ階層に並びます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(flatten)]
    entries: IndexMap<String, ExecutableConfig>,
    #[serde(rename = "LASTUSED", default, skip_serializing_if = "Option::is_none")]
    last_used: Option<String>,
}

/// ブレークポイントストア
#[derive(Debug)]
pub struct BreakpointStore {
    /// 設定ディレクトリ
    dir: PathBuf,
    /// config.json のパス
    config_path: PathBuf,
    /// 読み込んだ設定
    document: ConfigDocument,
}

impl BreakpointStore {
    /// 設定ディレクトリを開く
    ///
    /// ディレクトリが存在しなければ作成し、config.json を読み込みます。
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create configuration directory {:?}", dir))?;

        let mut store = Self {
            config_path: dir.join(CONFIG_FILE_NAME),
            dir,
            document: ConfigDocument::default(),
        };
        store.load()?;
        Ok(store)
    }

    /// 設定ディレクトリを取得する
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// config.json のパスを取得する
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// config.json から設定を読み込む
    ///
    /// ファイルが存在しない場合は空のストアとして扱います。
    pub fn load(&mut self) -> Result<()> {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No configuration at {:?}, starting empty", self.config_path);
                self.document = ConfigDocument::default();
                return Ok(());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {:?}", self.config_path));
            }
        };

        self.document =
            serde_json::from_str(&contents).map_err(|source| StoreError::MalformedConfig {
                path: self.config_path.clone(),
                source,
            })?;
        debug!(
            "Loaded {} executable(s) from {:?}",
            self.document.entries.len(),
            self.config_path
        );
        Ok(())
    }

    /// スクリプトを再生成してから config.json に書き出す
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create configuration directory {:?}", self.dir))?;
        self.export_commands()?;

        let json = serde_json::to_string_pretty(&self.document)?;
        fs::write(&self.config_path, json)
            .with_context(|| format!("Failed to write {:?}", self.config_path))?;
        debug!("Saved configuration to {:?}", self.config_path);
        Ok(())
    }

    /// 全ての実行ファイルのエントリを取得する
    pub fn entries(&self) -> &IndexMap<String, ExecutableConfig> {
        &self.document.entries
    }

    /// 実行ファイルの設定を取得する
    pub fn executable<P: AsRef<Path>>(&self, executable: P) -> Option<&ExecutableConfig> {
        self.document.entries.get(&canonical_key(executable))
    }

    /// 実行ファイルを設定に追加する
    ///
    /// 既に登録済みなら何もしません。最後に使用した実行ファイルは変更しません。
    pub fn add_executable<P: AsRef<Path>>(&mut self, executable: P) -> String {
        let key = canonical_key(executable);
        if !self.document.entries.contains_key(&key) {
            info!("Adding executable {}", key);
            self.document
                .entries
                .insert(key.clone(), ExecutableConfig::new());
        }
        key
    }

    /// 最後に使用した実行ファイルを取得する
    pub fn last_used(&self) -> Option<&str> {
        self.document.last_used.as_deref()
    }

    /// 最後に使用した実行ファイルを設定する
    pub fn set_last_used<P: AsRef<Path>>(&mut self, executable: P) -> String {
        let key = canonical_key(executable);
        debug!("Last used executable: {}", key);
        self.document.last_used = Some(key.clone());
        key
    }

    /// 対象の実行ファイルを決定する
    ///
    /// 指定がなければ最後に使用した実行ファイルを使います。どちらもなければエラーです。
    pub fn resolve_executable(&self, executable: Option<&Path>) -> Result<String> {
        match executable {
            Some(path) => Ok(canonical_key(path)),
            None => self
                .last_used()
                .map(canonical_key)
                .ok_or_else(|| anyhow::Error::from(StoreError::NoExecutable)),
        }
    }

    /// ブレークポイントをトグルする
    ///
    /// 対象の実行ファイルを最後に使用したものとして記録し、未登録なら追加します。
    /// ソースファイルはベース名だけがキーになります。
    pub fn toggle_breakpoint<P: AsRef<Path>>(
        &mut self,
        executable: Option<&Path>,
        source_file: P,
        line: u32,
    ) -> Result<Toggle> {
        let key = self.resolve_executable(executable)?;
        self.set_last_used(&key);
        self.add_executable(&key);

        let file = source_basename(source_file);
        let toggle = self
            .document
            .entries
            .get_mut(&key)
            .map(|config| config.toggle(&file, line))
            .ok_or_else(|| anyhow::anyhow!("Executable {} vanished from configuration", key))?;

        info!("{:?} breakpoint {}:{} for {}", toggle, file, line, key);
        Ok(toggle)
    }

    /// 実行ファイルの全ブレークポイントを解除する
    ///
    /// 記録済みの各ブレークポイントを逆順にトグルし直して取り除きます。
    /// 未登録の実行ファイルに対しては何もしません。戻り値は解除した数です。
    pub fn clean_breakpoints(&mut self, executable: Option<&Path>) -> Result<usize> {
        let key = self.resolve_executable(executable)?;
        let locations: Vec<(String, u32)> = match self.document.entries.get(&key) {
            Some(config) => config
                .locations()
                .map(|(file, line)| (file.to_string(), line))
                .collect(),
            None => {
                debug!("No configuration for {}, nothing to clean", key);
                return Ok(0);
            }
        };

        let target = PathBuf::from(&key);
        for (file, line) in locations.iter().rev() {
            self.toggle_breakpoint(Some(target.as_path()), file, *line)?;
        }
        Ok(locations.len())
    }

    /// 設定を完全に削除する
    ///
    /// メモリ上の設定を破棄し、config.json と生成済みスクリプトを全て削除します。
    pub fn clean(&mut self) -> Result<()> {
        self.document = ConfigDocument::default();

        match fs::remove_file(&self.config_path) {
            Ok(()) => info!("Removed {:?}", self.config_path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to remove {:?}", self.config_path));
            }
        }

        if !self.dir.is_dir() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory {:?}", self.dir))?
        {
            let path = entry?.path();
            if path.is_file() && is_script_file(&path) {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {:?}", path))?;
                debug!("Removed {:?}", path);
            }
        }
        Ok(())
    }

    /// ブレークポイント一覧を出力する
    ///
    /// 見出しには実行ファイル名（`verbose` の場合はフルパス）を表示し、
    /// 続けて `file:line` を保存順に1行ずつ出力します。
    pub fn print_breakpoints<W: Write>(
        &self,
        executable: Option<&Path>,
        verbose: bool,
        out: &mut W,
    ) -> Result<()> {
        let key = self.resolve_executable(executable)?;
        let name = if verbose {
            key.clone()
        } else {
            source_basename(&key)
        };

        let header = format!("Executable: {}", name);
        writeln!(out, "{}", header)?;
        writeln!(out, "{}", "-".repeat(header.chars().count()))?;

        match self.document.entries.get(&key) {
            Some(config) => {
                for (file, line) in config.locations() {
                    writeln!(out, "{}:{}", file, line)?;
                }
            }
            None => debug!("{} touched but not configured yet", key),
        }
        Ok(())
    }

    /// デバッグセッションの起動内容を決める
    ///
    /// 対象を最後に使用した実行ファイルとして記録します。
    /// 設定済みの実行ファイルなら生成済みスクリプトを、そうでなければ実行ファイルを直接渡します。
    pub fn debug(&mut self, executable: Option<&Path>) -> Result<LaunchPlan> {
        let key = self.resolve_executable(executable)?;
        self.set_last_used(&key);

        let script = self
            .document
            .entries
            .contains_key(&key)
            .then(|| script_path(&self.dir, &key));
        Ok(plan_for(script.as_deref(), Path::new(&key)))
    }

    /// 全ての実行ファイルについて lldb スクリプトを書き出す
    ///
    /// ディスク上に存在しない実行ファイルは飛ばします。戻り値は書き出したスクリプトのパスです。
    pub fn export_commands(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (executable, config) in &self.document.entries {
            if !Path::new(executable).is_file() {
                debug!("Skipping missing executable {}", executable);
                continue;
            }

            let path = script_path(&self.dir, executable);
            fs::write(&path, render_script(executable, config))
                .with_context(|| format!("Failed to write script {:?}", path))?;
            debug!("Exported {} breakpoint(s) to {:?}", config.count(), path);
            written.push(path);
        }
        Ok(written)
    }
}
