//! breakstore のコア機能
//!
//! このクレートは、実行ファイルごとのブレークポイント設定を永続化するストアを提供します。
//! 設定の読み書き、ブレークポイントのトグル、lldb スクリプトの生成、デバッガの起動を行います。

pub mod breakpoint;
pub mod command;
pub mod errors;
pub mod launcher;
pub mod path;
pub mod script;
pub mod store;

pub use breakpoint::{ExecutableConfig, Toggle};
pub use command::{Command, CommandOptions};
pub use errors::StoreError;
pub use launcher::{DebuggerLauncher, LaunchPlan};
pub use store::BreakpointStore;

/// ストア操作の結果型
pub type Result<T> = anyhow::Result<T>;
