// ==========================================
// 3D 打印工坊台账 - 主入口
// ==========================================
// 职责: 初始化数据库并输出当前台账概况
// ==========================================

use anyhow::{anyhow, Result};
use print_shop_ledger::app::AppState;
use print_shop_ledger::config::AppConfig;
use print_shop_ledger::engine::EnergyCostSource;
use print_shop_ledger::i18n::t_with_args;
use print_shop_ledger::logging;

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", print_shop_ledger::APP_NAME, print_shop_ledger::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env();
    tracing::info!(db_path = %config.db_path, locale = %config.locale, "使用进程配置");

    let state = AppState::from_config(&config).map_err(|e| anyhow!(e))?;

    // ===== 定价参数 =====
    let params = state.config_api.get_cost_parameters()?;
    tracing::info!(
        cost_per_gram = params.cost_per_gram,
        cost_per_kwh_hour = params.cost_per_kwh_hour,
        cost_per_wear_hour = params.cost_per_wear_hour,
        margin_pct = params.margin_pct,
        energy_source = ?params.energy_source,
        "当前定价参数"
    );
    if params.energy_source == EnergyCostSource::NoPrinterFallback {
        tracing::warn!("尚未登记打印机，电费参数直接取电价");
    }

    // ===== 主数据 =====
    let filaments = state.filament_api.list_filaments()?;
    let printers = state.printer_api.list_printers()?;
    let objects = state.object_api.list_objects()?;
    tracing::info!(
        filaments = filaments.len(),
        printers = printers.len(),
        objects = objects.len(),
        "主数据"
    );

    // ===== 打印队列 =====
    let queue = state.queue_api.list_active()?;
    tracing::info!(active_jobs = queue.len(), "打印队列");
    for view in &queue {
        tracing::info!(
            job_id = view.job.id,
            status = %view.job.status.label(),
            object = view.object_name.as_deref().unwrap_or("-"),
            filament = view.filament_name.as_deref().unwrap_or("-"),
            quantity = view.job.quantity,
            filament_used_g = view.job.filament_used_g,
            "队列任务"
        );
    }

    // ===== 库存缺口 =====
    for shortage in state.inventory_api.list_shortages()? {
        let grams = shortage.shortage_g.to_string();
        let message = t_with_args(
            "inventory.shortage",
            &[("name", shortage.name.as_str()), ("grams", grams.as_str())],
        );
        tracing::warn!(filament_id = shortage.filament_id, "{}", message);
    }

    Ok(())
}
