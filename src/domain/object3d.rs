// ==========================================
// 3D 打印工坊台账 - 打印对象领域模型
// ==========================================
// 职责: 可打印对象定义 + 计算后的单价
// 说明: 模型/G-code 路径只做存储，不解析
// ==========================================

use serde::{Deserialize, Serialize};

/// 单个文件内对象数量上限
pub const MAX_OBJECTS_PER_FILE: i64 = 100;

// ==========================================
// Object3D - 打印对象
// ==========================================
// 对齐: objects 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object3D {
    pub id: i64,
    pub name: String,
    pub stl_path: String,   // 模型文件路径
    pub gcode_path: String, // G-code 文件路径
    pub objects: i64,       // 单个文件内对象数量 (1..=100)

    // ===== 单件参数 =====
    pub weight_grams: i64,     // 单件克重
    pub print_time_hours: f64, // 单件打印时长

    // ===== 计算结果 (单件) =====
    pub cost: i64,            // 成本
    pub suggested_price: i64, // 建议售价
}

impl Object3D {
    /// 表单字段是否与草稿一致 (不含计算结果)
    pub fn matches_draft(&self, draft: &ObjectDraft) -> bool {
        self.name == draft.name
            && self.stl_path == draft.stl_path
            && self.gcode_path == draft.gcode_path
            && self.objects == draft.objects
            && self.weight_grams == draft.weight_grams
            && self.print_time_hours == draft.print_time_hours
    }
}

// ==========================================
// ObjectDraft - 打印对象录入表单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDraft {
    pub name: String,
    pub stl_path: String,
    pub gcode_path: String,
    pub objects: i64,
    pub weight_grams: i64,
    pub print_time_hours: f64,
}

impl ObjectDraft {
    /// 以草稿内容生成对象 (id 与价格由调用方补齐)
    pub fn into_object(self, id: i64, cost: i64, suggested_price: i64) -> Object3D {
        Object3D {
            id,
            name: self.name,
            stl_path: self.stl_path,
            gcode_path: self.gcode_path,
            objects: self.objects,
            weight_grams: self.weight_grams,
            print_time_hours: self.print_time_hours,
            cost,
            suggested_price,
        }
    }
}
