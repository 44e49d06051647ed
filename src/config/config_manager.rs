// ==========================================
// D.O.A 退货处置系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、运行时覆写
// 存储: 内存 key-value, 可从 JSON 文件加载
// 默认路径: <config_dir>/doa-disposition/config.json
// ==========================================

use crate::domain::types::StorageBucket;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "DOA_DISPOSITION_CONFIG";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置锁获取失败: {0}")]
    LockError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    values: RwLock<BTreeMap<String, String>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// 创建仅含默认值的配置管理器
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// 从 JSON 文件加载
    ///
    /// 文件内容为扁平对象, 值可以是字符串、数字、布尔或数组
    /// （数组按 JSON 文本保存）。
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let object: Map<String, JsonValue> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let values = object
            .into_iter()
            .map(|(k, v)| {
                let text = match v {
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect();

        tracing::info!("已加载配置文件: {}", path.display());
        Ok(Self {
            values: RwLock::new(values),
        })
    }

    /// 加载默认位置的配置（文件不存在则使用默认值）
    pub fn load_default() -> ConfigResult<Self> {
        let path = get_default_config_path();
        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!("配置文件不存在, 使用默认配置: {}", path.display());
            Ok(Self::new())
        }
    }

    /// 读取原始配置值
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 运行时覆写配置
    pub fn update_config(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        tracing::info!(key = %key, value = %value, "配置已更新");
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// 获取全部生效配置的快照（JSON格式, 含默认值）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let mut snapshot = serde_json::Map::new();
        snapshot.insert(
            config_keys::RECORD_ID_PREFIX.to_string(),
            JsonValue::String(self.get_record_id_prefix()?),
        );
        snapshot.insert(
            config_keys::RECORD_ID_WIDTH.to_string(),
            JsonValue::from(self.get_record_id_width()?),
        );
        snapshot.insert(
            config_keys::AUDIT_DEFAULT_ACTOR.to_string(),
            JsonValue::String(self.get_default_actor()?),
        );
        snapshot.insert(
            config_keys::APPROVAL_REQUIRED_BUCKETS.to_string(),
            JsonValue::Array(
                self.get_approval_required_buckets()?
                    .iter()
                    .map(|b| JsonValue::String(b.as_str().to_string()))
                    .collect(),
            ),
        );
        snapshot.insert(
            config_keys::IMPORT_MAX_ROWS.to_string(),
            JsonValue::from(self.get_import_max_rows()?),
        );

        serde_json::to_string(&snapshot).map_err(|e| ConfigError::ValueError {
            key: "snapshot".to_string(),
            value: String::new(),
            message: e.to_string(),
        })
    }

    // ===== 记录ID =====

    pub fn get_record_id_prefix(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::RECORD_ID_PREFIX, "DOA-")
    }

    pub fn get_record_id_width(&self) -> ConfigResult<usize> {
        let value = self.get_config_or_default(config_keys::RECORD_ID_WIDTH, "4")?;
        parse_value(config_keys::RECORD_ID_WIDTH, &value)
    }

    // ===== 审计 =====

    pub fn get_default_actor(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::AUDIT_DEFAULT_ACTOR, "system")
    }

    // ===== 库位审批分类 =====

    /// 需要审批的库位（JSON 数组, 如 ["DG"]）
    pub fn get_approval_required_buckets(&self) -> ConfigResult<Vec<StorageBucket>> {
        let value =
            self.get_config_or_default(config_keys::APPROVAL_REQUIRED_BUCKETS, r#"["DG"]"#)?;

        let labels: Vec<String> =
            serde_json::from_str(&value).map_err(|e| ConfigError::ValueError {
                key: config_keys::APPROVAL_REQUIRED_BUCKETS.to_string(),
                value: value.clone(),
                message: e.to_string(),
            })?;

        labels
            .iter()
            .map(|label| {
                StorageBucket::parse(label).ok_or_else(|| ConfigError::ValueError {
                    key: config_keys::APPROVAL_REQUIRED_BUCKETS.to_string(),
                    value: label.clone(),
                    message: "未知库位".to_string(),
                })
            })
            .collect()
    }

    // ===== 导入 =====

    pub fn get_import_max_rows(&self) -> ConfigResult<usize> {
        let value = self.get_config_or_default(config_keys::IMPORT_MAX_ROWS, "5000")?;
        parse_value(config_keys::IMPORT_MAX_ROWS, &value)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::ValueError {
        key: key.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// 获取默认配置文件路径
///
/// 优先级: 环境变量 DOA_DISPOSITION_CONFIG > 用户配置目录 > 当前目录
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("doa-disposition").join("config.json"),
        None => PathBuf::from("./doa-disposition.json"),
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 记录ID生成
    pub const RECORD_ID_PREFIX: &str = "record.id_prefix";
    pub const RECORD_ID_WIDTH: &str = "record.id_width";

    // 审计
    pub const AUDIT_DEFAULT_ACTOR: &str = "audit.default_actor";

    // 库位审批分类 (JSON 数组)
    pub const APPROVAL_REQUIRED_BUCKETS: &str = "storage.approval_required_buckets";

    // 导入
    pub const IMPORT_MAX_ROWS: &str = "import.max_rows";
}
