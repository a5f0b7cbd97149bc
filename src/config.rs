//! 配置模块，负责加载JSON配置文件

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::media::MediaType;

/// 编译器配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// 媒体类型到视图名的映射, 未配置的类型使用默认视图
    pub views: BTreeMap<MediaType, String>,
    /// 播放列表目录 (可选)
    pub playlist_dir: Option<PathBuf>,
    /// 播放列表未设置上限时使用的默认上限
    pub default_limit: Option<u32>,
}

impl CompilerConfig {
    /// 从JSON文件加载配置, 缺失的键使用默认值
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        // 检查文件是否存在
        if !path_ref.exists() {
            return Err(Error::Config(format!(
                "配置文件不存在: {}",
                path_ref.display()
            )));
        }

        let content = fs::read_to_string(path_ref).map_err(|source| Error::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let config: CompilerConfig =
            serde_json::from_str(&content).map_err(|source| Error::Json {
                path: path_ref.to_path_buf(),
                source,
            })?;

        if config.views.values().any(|view| view.trim().is_empty()) {
            return Err(Error::Config(format!(
                "视图名不能为空: {}",
                path_ref.display()
            )));
        }
        Ok(config)
    }

    /// 获取媒体类型对应的视图名; mixed 按 songs 处理
    pub fn view_for(&self, media_type: MediaType) -> &str {
        let media_type = match media_type {
            MediaType::Mixed => MediaType::Songs,
            other => other,
        };
        self.views
            .get(&media_type)
            .map(String::as_str)
            .or(media_type.default_view())
            .unwrap_or("songview")
    }
}
