// ==========================================
// 3D 打印工坊台账 - 成本模型
// ==========================================
// 职责: 推导定价参数 (每克/每小时电费/每小时折旧/利润率)
//       计算对象单件成本与建议售价
// 红线: 纯函数，无副作用; 取整规则为截断 (与历史定价一致)
// ==========================================

use crate::domain::global_config::GlobalConfig;
use crate::domain::object3d::{Object3D, MAX_OBJECTS_PER_FILE};
use crate::domain::{Filament, Printer};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

// ==========================================
// EnergyCostSource - 电费参数来源
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergyCostSource {
    Manual,            // 人工覆盖值
    FleetAverage,      // 平均功耗 × 电价
    NoPrinterFallback, // 无打印机: 直接使用电价 (单位为 货币/kWh，非 货币/小时)
}

// ==========================================
// CostParameters - 定价参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParameters {
    pub cost_per_gram: f64,
    pub cost_per_kwh_hour: f64,  // 每打印小时电费
    pub cost_per_wear_hour: f64, // 每打印小时折旧
    pub margin_pct: f64,
    pub energy_source: EnergyCostSource,
}

impl CostParameters {
    /// 直接给定四个参数 (来源视为人工)
    pub fn new(
        cost_per_gram: f64,
        cost_per_kwh_hour: f64,
        cost_per_wear_hour: f64,
        margin_pct: f64,
    ) -> Self {
        Self {
            cost_per_gram,
            cost_per_kwh_hour,
            cost_per_wear_hour,
            margin_pct,
            energy_source: EnergyCostSource::Manual,
        }
    }
}

// ==========================================
// PriceQuote - 单件报价
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub unit_cost: i64,
    pub unit_suggested_price: i64,
}

/// 推导定价参数
///
/// - use_manual=true: 原样返回人工值，未设置的按 0
/// - 否则按耗材/打印机平均值计算; 空列表回退为 0 (电费见 EnergyCostSource)
#[instrument(skip_all, fields(use_manual = config.use_manual, filaments = filaments.len(), printers = printers.len()))]
pub fn resolve_cost_parameters(
    config: &GlobalConfig,
    filaments: &[Filament],
    printers: &[Printer],
) -> CostParameters {
    if config.use_manual {
        return CostParameters {
            cost_per_gram: config.manual_filament_cost.unwrap_or(0.0),
            cost_per_kwh_hour: config.manual_energy_cost.unwrap_or(0.0),
            cost_per_wear_hour: config.manual_printer_cost.unwrap_or(0.0),
            margin_pct: config.manual_profit_margin.unwrap_or(0.0),
            energy_source: EnergyCostSource::Manual,
        };
    }

    let per_gram: Vec<f64> = filaments
        .iter()
        .filter_map(|f| {
            let ratio = f.price_per_gram();
            if ratio.is_none() {
                warn!(filament_id = f.id, initial_g = f.initial_g, "耗材初始克重非正，跳过每克成本计算");
            }
            ratio
        })
        .collect();
    let cost_per_gram = mean(&per_gram).unwrap_or(0.0);

    let power: Vec<f64> = printers.iter().map(|p| p.power_kwh_per_hour).collect();
    let (cost_per_kwh_hour, energy_source) = match mean(&power) {
        Some(avg_kwh) => (
            avg_kwh * config.electricity_cost_kwh,
            EnergyCostSource::FleetAverage,
        ),
        None => {
            warn!(
                electricity_cost_kwh = config.electricity_cost_kwh,
                "无打印机记录，电费参数直接取电价 (单位为 货币/kWh)"
            );
            (config.electricity_cost_kwh, EnergyCostSource::NoPrinterFallback)
        }
    };

    let wear: Vec<f64> = printers.iter().map(|p| p.wear_per_hour).collect();
    let cost_per_wear_hour = mean(&wear).unwrap_or(0.0);

    CostParameters {
        cost_per_gram,
        cost_per_kwh_hour,
        cost_per_wear_hour,
        margin_pct: config.profit_margin,
        energy_source,
    }
}

/// 计算对象单件成本与建议售价
///
/// raw = (克重 × 每克 + 时长 × 电费 + 时长 × 折旧) / 文件内对象数
/// 成本与售价均截断取整
pub fn price_object(object: &Object3D, params: &CostParameters) -> EngineResult<PriceQuote> {
    price_components(
        object.weight_grams,
        object.print_time_hours,
        object.objects,
        params,
    )
}

/// 按原始字段计算报价 (供录入表单在生成对象前调用)
pub fn price_components(
    weight_grams: i64,
    print_time_hours: f64,
    objects: i64,
    params: &CostParameters,
) -> EngineResult<PriceQuote> {
    if objects == 0 {
        return Err(EngineError::DivisionByZero(
            "文件内对象数量为 0".to_string(),
        ));
    }
    if !(1..=MAX_OBJECTS_PER_FILE).contains(&objects) {
        return Err(EngineError::Validation(format!(
            "文件内对象数量必须在 1..={} 之间: {}",
            MAX_OBJECTS_PER_FILE, objects
        )));
    }

    let raw = (weight_grams as f64 * params.cost_per_gram
        + print_time_hours * params.cost_per_kwh_hour
        + print_time_hours * params.cost_per_wear_hour)
        / objects as f64;
    let unit_cost = raw.trunc() as i64;

    let unit_suggested_price =
        (unit_cost as f64 * ((params.margin_pct / 100.0) + 1.0)).trunc() as i64;

    Ok(PriceQuote {
        unit_cost,
        unit_suggested_price,
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
