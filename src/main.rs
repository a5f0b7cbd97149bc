use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use smartplaylist_sql::field::{
    available_field_names, available_groupings, available_sort_orders, group_name,
};
use smartplaylist_sql::{CompilerConfig, DirectoryStore, MediaType, Playlist, SqlCompiler};

const DEFAULT_CONFIG_FILE: &str = "compiler_config.json";
const DEFAULT_PLAYLIST_DIR: &str = "playlists";

const HELP: &str = "\
命令:
  list                   列出已加载的播放列表
  show <name>            显示播放列表的 JSON 文档
  compile <name>         编译播放列表为 SQL
  file <path>            编译一个播放列表文件
  folders <name>         显示播放列表的虚拟文件夹
  fields <type>          列出媒体类型可用的规则字段
  orders <type>          列出媒体类型可用的排序方式
  groups <type>          列出媒体类型可用的分组方式
  help                   显示帮助
  quit                   退出";

/// 加载配置: 优先使用命令行给出的文件, 其次是默认配置文件, 都没有时使用默认配置
fn load_config(path: Option<&str>) -> Result<CompilerConfig> {
    match path {
        Some(path) => CompilerConfig::from_json_file(path)
            .with_context(|| format!("无法加载配置文件 {path}")),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Ok(CompilerConfig::from_json_file(DEFAULT_CONFIG_FILE)?)
        }
        None => {
            info!("未找到 {DEFAULT_CONFIG_FILE}, 使用默认配置");
            Ok(CompilerConfig::default())
        }
    }
}

fn open_store(config: &CompilerConfig) -> Result<DirectoryStore> {
    let dir = config
        .playlist_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAYLIST_DIR));
    fs::create_dir_all(&dir)
        .with_context(|| format!("无法创建播放列表目录 {}", dir.display()))?;
    Ok(DirectoryStore::open(&dir)?)
}

fn find_playlist<'a>(compiler: &'a SqlCompiler<DirectoryStore>, name: &str) -> Result<&'a Playlist> {
    compiler
        .store()
        .playlists()
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .with_context(|| format!("没有名为 '{name}' 的播放列表"))
}

fn print_compiled(compiler: &SqlCompiler<DirectoryStore>, playlist: &Playlist) {
    let result = compiler.compile(playlist);
    for query in &result.queries {
        println!("[{}]", query.media_type);
        if query.where_clause.is_empty() {
            println!("WHERE: (无过滤条件)");
        } else {
            println!("WHERE: {}", query.where_clause);
        }
        println!("SQL:   {}", query.sql);
    }
}

fn run_command(compiler: &SqlCompiler<DirectoryStore>, line: &str) -> Result<bool> {
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    match command {
        "quit" | "exit" => return Ok(false),
        "help" => println!("{HELP}"),
        "list" => {
            for playlist in compiler.store().playlists() {
                println!("{:<12} {}", playlist.media_type.as_str(), playlist.name);
            }
        }
        "show" => println!("{}", find_playlist(compiler, argument)?.to_json_string()?),
        "compile" => print_compiled(compiler, find_playlist(compiler, argument)?),
        "file" => {
            let content = fs::read_to_string(argument)
                .with_context(|| format!("无法读取文件 {argument}"))?;
            let playlist = Playlist::from_json_str(&content)?;
            print_compiled(compiler, &playlist);
        }
        "folders" => {
            let folders = compiler.virtual_folders(find_playlist(compiler, argument)?);
            if folders.is_empty() {
                println!("(无虚拟文件夹)");
            }
            for folder in folders {
                println!("{folder}");
            }
        }
        "fields" => {
            let media_type: MediaType = argument.parse()?;
            println!("{}", available_field_names(media_type).join(", "));
        }
        "orders" => {
            let media_type: MediaType = argument.parse()?;
            let names: Vec<&str> = available_sort_orders(media_type)
                .into_iter()
                .map(|key| key.name())
                .collect();
            println!("{}", names.join(", "));
        }
        "groups" => {
            let media_type: MediaType = argument.parse()?;
            let names: Vec<&str> = available_groupings(media_type)
                .into_iter()
                .filter_map(group_name)
                .collect();
            println!("{}", names.join(", "));
        }
        "" => {}
        other => bail!("未知命令 '{other}', 输入 help 查看帮助"),
    }
    Ok(true)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("--- 智能播放列表: 规则到 SQL 编译器 ---");

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref())?;
    let store = open_store(&config)?;
    let compiler = SqlCompiler::new(config, store);
    println!("已加载 {} 个播放列表, 输入 help 查看帮助", compiler.store().playlists().len());

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("playlist> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;
                match run_command(&compiler, line) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => warn!("{e:#}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
