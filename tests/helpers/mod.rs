// ==========================================
// 集成测试辅助模块
// ==========================================
// 各测试文件按需使用其中的工具，未使用部分不告警
#![allow(dead_code)]

pub mod api_test_helper;
pub mod test_data_builder;
