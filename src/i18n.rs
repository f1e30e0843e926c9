// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和西班牙文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "es"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use print_shop_ledger::i18n::t;
/// let msg = t("job_status.printing");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use print_shop_ledger::i18n::t_with_args;
/// let msg = t_with_args("inventory.shortage", &[("name", "PLA"), ("grams", "120")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobAction, JobStatus};
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，测试默认并行执行，这里串行化
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es");
        assert_eq!(current_locale(), "es");

        set_locale("en");
        assert_eq!(current_locale(), "en");
    }

    #[test]
    fn test_status_labels() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es");
        assert_eq!(JobStatus::Done.label(), "Terminado");
        assert_eq!(JobStatus::Printing.label(), "Imprimiendo");
        assert_eq!(JobAction::Delete.label(), "Eliminado");

        set_locale("en");
        assert_eq!(JobStatus::Cancelled.label(), "Cancelled");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es");
        let msg = t_with_args("inventory.shortage", &[("name", "PLA Negro"), ("grams", "120")]);
        assert!(msg.contains("PLA Negro"));
        assert!(msg.contains("120"));

        set_locale("en");
        let msg = t_with_args("inventory.shortage", &[("name", "PLA Negro"), ("grams", "120")]);
        assert!(msg.contains("short by 120"));
    }
}
