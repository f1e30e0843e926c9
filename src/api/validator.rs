// ==========================================
// 3D 打印工坊台账 - 主数据录入校验器
// ==========================================
// 职责: 耗材/打印机/对象/全局配置表单的字段校验
// 约束: 校验失败时一次性返回全部违规字段
// ==========================================

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::object3d::MAX_OBJECTS_PER_FILE;
use crate::domain::{FilamentDraft, GlobalConfig, ObjectDraft, PrinterDraft};

// ==========================================
// MasterDataValidator - 主数据校验器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct MasterDataValidator;

impl MasterDataValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验耗材表单
    ///
    /// - 名称/颜色/材质必填
    /// - 价格、初始克重必须为正
    /// - 有效剩余克重 (若填写) 不得为负
    pub fn validate_filament(&self, draft: &FilamentDraft) -> ApiResult<()> {
        let mut violations = Vec::new();
        require_text(&mut violations, "name", &draft.name);
        require_text(&mut violations, "color", &draft.color);
        require_text(&mut violations, "material", &draft.material);
        if draft.price <= 0 {
            violations.push(ValidationViolation::new("price", format!("价格必须大于 0: {}", draft.price)));
        }
        if draft.initial_g <= 0 {
            violations.push(ValidationViolation::new(
                "initial_g",
                format!("初始克重必须大于 0: {}", draft.initial_g),
            ));
        }
        if let Some(remaining) = draft.remaining_g_effective {
            if remaining < 0 {
                violations.push(ValidationViolation::new(
                    "remaining_g_effective",
                    format!("剩余克重不得为负: {}", remaining),
                ));
            }
        }
        finish("耗材", violations)
    }

    /// 校验打印机表单 (全部字段必填且为正)
    pub fn validate_printer(&self, draft: &PrinterDraft) -> ApiResult<()> {
        let mut violations = Vec::new();
        require_text(&mut violations, "name", &draft.name);
        if draft.price <= 0 {
            violations.push(ValidationViolation::new("price", format!("价格必须大于 0: {}", draft.price)));
        }
        require_positive(&mut violations, "wear_per_hour", draft.wear_per_hour);
        require_positive(&mut violations, "power_kwh_per_hour", draft.power_kwh_per_hour);
        finish("打印机", violations)
    }

    /// 校验打印对象表单
    pub fn validate_object(&self, draft: &ObjectDraft) -> ApiResult<()> {
        let mut violations = Vec::new();
        require_text(&mut violations, "name", &draft.name);
        if !(1..=MAX_OBJECTS_PER_FILE).contains(&draft.objects) {
            violations.push(ValidationViolation::new(
                "objects",
                format!("对象数量必须在 1..={} 之间: {}", MAX_OBJECTS_PER_FILE, draft.objects),
            ));
        }
        if draft.weight_grams < 0 {
            violations.push(ValidationViolation::new(
                "weight_grams",
                format!("克重不得为负: {}", draft.weight_grams),
            ));
        }
        require_non_negative(&mut violations, "print_time_hours", draft.print_time_hours);
        finish("打印对象", violations)
    }

    /// 校验全局配置 (成本与利润率不得为负)
    pub fn validate_config(&self, config: &GlobalConfig) -> ApiResult<()> {
        let mut violations = Vec::new();
        require_non_negative(&mut violations, "electricity_cost_kwh", config.electricity_cost_kwh);
        require_non_negative(&mut violations, "profit_margin", config.profit_margin);

        let manual = [
            ("manual_filament_cost", config.manual_filament_cost),
            ("manual_energy_cost", config.manual_energy_cost),
            ("manual_printer_cost", config.manual_printer_cost),
            ("manual_profit_margin", config.manual_profit_margin),
        ];
        for (field, value) in manual {
            if let Some(v) = value {
                require_non_negative(&mut violations, field, v);
            }
        }
        finish("全局配置", violations)
    }
}

fn require_text(violations: &mut Vec<ValidationViolation>, field: &str, value: &str) {
    if value.trim().is_empty() {
        violations.push(ValidationViolation::new(field, "不能为空"));
    }
}

fn require_positive(violations: &mut Vec<ValidationViolation>, field: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        violations.push(ValidationViolation::new(field, format!("必须大于 0: {}", value)));
    }
}

fn require_non_negative(violations: &mut Vec<ValidationViolation>, field: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        violations.push(ValidationViolation::new(field, format!("不得为负: {}", value)));
    }
}

fn finish(entity: &str, violations: Vec<ValidationViolation>) -> ApiResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
    Err(ApiError::DraftValidationError {
        reason: format!("{}表单有{}个字段不合法: {}", entity, violations.len(), fields.join(", ")),
        violations,
    })
}
