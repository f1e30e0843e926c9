// ==========================================
// 3D 打印工坊台账 - 进程配置
// ==========================================
// 来源: 环境变量，未设置时使用默认值
// ==========================================

use serde::{Deserialize, Serialize};

use crate::app::state::get_default_db_path;

/// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "PRINT_SHOP_DB_PATH";

/// 界面语言环境变量 (en / es)
pub const ENV_LOCALE: &str = "PRINT_SHOP_LOCALE";

/// 默认界面语言
pub const DEFAULT_LOCALE: &str = "en";

/// 已提供翻译的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "es"];

// ==========================================
// AppConfig - 进程配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub db_path: String,
    pub locale: String,
}

impl AppConfig {
    /// 从环境变量读取
    pub fn from_env() -> Self {
        let locale = std::env::var(ENV_LOCALE).ok();
        Self {
            db_path: get_default_db_path(),
            locale: resolve_locale(locale.as_deref()),
        }
    }

    /// 指定数据库路径 (语言取默认值)
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// 规范化语言代码; 不支持的语言回退为默认值
///
/// "es-AR" / "es_ES" 等地区变体取主语言
pub fn resolve_locale(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return DEFAULT_LOCALE.to_string();
    };
    let primary = raw
        .trim()
        .split(['-', '_', '.'])
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if SUPPORTED_LOCALES.contains(&primary.as_str()) {
        primary
    } else {
        if !primary.is_empty() {
            tracing::warn!(locale = raw, "不支持的界面语言，回退为 {}", DEFAULT_LOCALE);
        }
        DEFAULT_LOCALE.to_string()
    }
}
