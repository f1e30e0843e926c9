// ==========================================
// 3D 打印工坊台账 - 批量重算对象价格
// ==========================================
// 用途: 修改电价/利润率或主数据后，按当前定价参数重算全部对象
// 用法: reprice_objects [db_path]
//       未指定时使用 PRINT_SHOP_DB_PATH 或默认路径
// ==========================================

use anyhow::{anyhow, Result};
use print_shop_ledger::app::{get_default_db_path, AppState};
use print_shop_ledger::logging;

fn main() -> Result<()> {
    logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "开始重算对象价格");

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let summary = state.object_api.reprice_all()?;

    tracing::info!(
        total = summary.total,
        changed = summary.changed,
        cost_per_gram = summary.params.cost_per_gram,
        cost_per_kwh_hour = summary.params.cost_per_kwh_hour,
        cost_per_wear_hour = summary.params.cost_per_wear_hour,
        margin_pct = summary.params.margin_pct,
        "对象价格重算完成"
    );
    if !summary.skipped.is_empty() {
        tracing::warn!(skipped = ?summary.skipped, "部分对象参数非法，未重算");
    }
    Ok(())
}
