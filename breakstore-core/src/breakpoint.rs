//! ブレークポイント管理

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// トグル操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// ブレークポイントを設定した
    Set,
    /// ブレークポイントを解除した
    Cleared,
}

/// 1つの実行ファイルに対するブレークポイント設定
///
/// キーはソースファイルのベース名、値は挿入順の行番号リストです。
/// 同じ行番号がリスト内に重複することはありません。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableConfig {
    #[serde(rename = "Breakpoints", default)]
    pub breakpoints: IndexMap<String, Vec<u32>>,
}

impl ExecutableConfig {
    /// 空の設定を作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// ブレークポイントをトグルする
    ///
    /// 行が未設定なら末尾に追加し、設定済みなら取り除きます。
    /// 最後の行を解除してもファイルのキーは空リストとして残ります。
    pub fn toggle(&mut self, file: &str, line: u32) -> Toggle {
        let lines = match self.breakpoints.entry(file.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(vec![line]);
                return Toggle::Set;
            }
            Entry::Occupied(entry) => entry.into_mut(),
        };

        match lines.iter().position(|&l| l == line) {
            Some(index) => {
                lines.remove(index);
                Toggle::Cleared
            }
            None => {
                lines.push(line);
                Toggle::Set
            }
        }
    }

    /// 指定位置にブレークポイントが設定されているか
    pub fn contains(&self, file: &str, line: u32) -> bool {
        self.breakpoints
            .get(file)
            .map(|lines| lines.contains(&line))
            .unwrap_or(false)
    }

    /// 全てのブレークポイントを `(ファイル, 行)` の保存順で列挙する
    pub fn locations(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.breakpoints
            .iter()
            .flat_map(|(file, lines)| lines.iter().map(move |&line| (file.as_str(), line)))
    }

    /// ブレークポイントの数を取得する
    pub fn count(&self) -> usize {
        self.breakpoints.values().map(Vec::len).sum()
    }
}
