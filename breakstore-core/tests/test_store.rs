//! ストアの永続化とスクリプト生成のテスト

use breakstore_core::script::script_path;
use breakstore_core::{BreakpointStore, Command, CommandOptions, Toggle};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 一時ディレクトリに設定ディレクトリとダミーの実行ファイルを用意する
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let dir = temp.path().join(".dbg");
    let exe = temp.path().join("foo.out");
    fs::write(&exe, b"\x7fELF").unwrap();
    (temp, dir, exe)
}

#[test]
fn test_toggle_twice_scenario() {
    let (_temp, dir, _exe) = setup();
    let mut store = BreakpointStore::open(&dir).unwrap();
    let foo = Path::new("/bin/foo");

    assert_eq!(store.toggle_breakpoint(Some(foo), "main.c", 42).unwrap(), Toggle::Set);
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.executable(foo).unwrap().breakpoints["main.c"], vec![42]);

    assert_eq!(store.toggle_breakpoint(Some(foo), "main.c", 42).unwrap(), Toggle::Cleared);
    // 空リストとしてキーは残る
    assert!(store.executable(foo).unwrap().breakpoints["main.c"].is_empty());
}

#[test]
fn test_save_and_reload_round_trip() {
    let (_temp, dir, exe) = setup();
    let mut store = BreakpointStore::open(&dir).unwrap();
    store.toggle_breakpoint(Some(exe.as_path()), "src/a.c", 10).unwrap();
    store.toggle_breakpoint(Some(exe.as_path()), "a.c", 20).unwrap();
    store.toggle_breakpoint(Some(Path::new("/bin/other")), "b.c", 3).unwrap();
    store.set_last_used(&exe);
    store.save().unwrap();

    let reloaded = BreakpointStore::open(&dir).unwrap();
    assert_eq!(reloaded.entries(), store.entries());
    assert_eq!(reloaded.last_used(), store.last_used());
    assert_eq!(reloaded.last_used(), Some(exe.to_str().unwrap()));
}

#[test]
fn test_config_json_layout() {
    let (_temp, dir, _exe) = setup();
    let mut store = BreakpointStore::open(&dir).unwrap();
    store.toggle_breakpoint(Some(Path::new("/bin/foo")), "main.c", 42).unwrap();
    store.save().unwrap();

    let contents = fs::read_to_string(dir.join("config.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["/bin/foo"]["Breakpoints"]["main.c"], serde_json::json!([42]));
    assert_eq!(value["LASTUSED"], "/bin/foo");
}

#[test]
fn test_load_existing_document() {
    let (_temp, dir, _exe) = setup();
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("config.json"),
        r#"{"/bin/foo": {"Breakpoints": {"b.c": [7], "a.c": [3, 1]}}, "LASTUSED": "/bin/foo"}"#,
    )
    .unwrap();

    let store = BreakpointStore::open(&dir).unwrap();
    assert_eq!(store.last_used(), Some("/bin/foo"));
    let locations: Vec<_> = store.executable("/bin/foo").unwrap().locations().collect();
    assert_eq!(locations, vec![("b.c", 7), ("a.c", 3), ("a.c", 1)]);
}

#[test]
fn test_export_script_content() {
    let (_temp, dir, exe) = setup();
    let mut store = BreakpointStore::open(&dir).unwrap();
    store.toggle_breakpoint(Some(exe.as_path()), "a.c", 10).unwrap();
    store.toggle_breakpoint(Some(exe.as_path()), "a.c", 20).unwrap();

    let written = store.export_commands().unwrap();
    let script = script_path(&dir, &exe);
    assert_eq!(written, vec![script.clone()]);
    assert_eq!(
        fs::read_to_string(script).unwrap(),
        format!(
            "file {}\nbreakpoint set --file a.c --line 10\nbreakpoint set --file a.c --line 20",
            exe.display()
        )
    );
}

#[test]
fn test_export_skips_missing_executables() {
    let (temp, dir, exe) = setup();
    let mut store = BreakpointStore::open(&dir).unwrap();
    let missing = temp.path().join("gone.out");
    store.toggle_breakpoint(Some(exe.as_path()), "a.c", 1).unwrap();
    store.toggle_breakpoint(Some(missing.as_path()), "a.c", 1).unwrap();

    let written = store.export_commands().unwrap();
    assert_eq!(written, vec![dir.join("foo.lldb")]);
    assert!(!dir.join("gone.lldb").exists());
}

#[test]
fn test_clean_all_removes_everything() {
    let (_temp, dir, exe) = setup();
    let mut store = BreakpointStore::open(&dir).unwrap();
    store.toggle_breakpoint(Some(exe.as_path()), "a.c", 10).unwrap();
    store.save().unwrap();
    fs::write(dir.join("notes.txt"), "keep me").unwrap();
    assert!(dir.join("config.json").exists());
    assert!(dir.join("foo.lldb").exists());

    store.clean().unwrap();
    assert!(store.entries().is_empty());
    assert_eq!(store.last_used(), None);
    assert!(!dir.join("config.json").exists());
    assert!(!dir.join("foo.lldb").exists());
    assert!(dir.join("notes.txt").exists());

    let reloaded = BreakpointStore::open(&dir).unwrap();
    assert!(reloaded.entries().is_empty());
    assert_eq!(reloaded.last_used(), None);

    // 既に削除済みでもエラーにならない
    store.clean().unwrap();
}

#[test]
fn test_break_command_persists_and_exports() {
    let (_temp, dir, exe) = setup();
    let options = CommandOptions::default();
    let mut out = Vec::new();

    let mut store = BreakpointStore::open(&dir).unwrap();
    Command::Break {
        executable: Some(exe.clone()),
        source: PathBuf::from("src/main.c"),
        line: 42,
    }
    .execute(&mut store, &options, &mut out)
    .unwrap();

    let mut store = BreakpointStore::open(&dir).unwrap();
    assert!(store.executable(&exe).unwrap().contains("main.c", 42));
    assert!(fs::read_to_string(dir.join("foo.lldb"))
        .unwrap()
        .ends_with("breakpoint set --file main.c --line 42"));

    Command::Clean {
        all: false,
        executable: None,
    }
    .execute(&mut store, &options, &mut out)
    .unwrap();

    let store = BreakpointStore::open(&dir).unwrap();
    assert_eq!(store.executable(&exe).unwrap().count(), 0);
    assert_eq!(
        fs::read_to_string(dir.join("foo.lldb")).unwrap(),
        format!("file {}", exe.display())
    );
}

#[test]
fn test_build_does_not_rewrite_config() {
    let (_temp, dir, exe) = setup();
    fs::create_dir_all(&dir).unwrap();
    let document = format!(
        r#"{{"{}": {{"Breakpoints": {{"a.c": [5]}}}}}}"#,
        exe.display()
    );
    fs::write(dir.join("config.json"), &document).unwrap();

    let mut store = BreakpointStore::open(&dir).unwrap();
    Command::Build
        .execute(&mut store, &CommandOptions::default(), &mut Vec::new())
        .unwrap();

    assert_eq!(fs::read_to_string(dir.join("config.json")).unwrap(), document);
    assert!(dir.join("foo.lldb").exists());
}
