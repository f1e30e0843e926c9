// ==========================================
// 3D 打印工坊台账 - 全局配置 API
// ==========================================
// 职责: 全局配置查询/更新，当前定价参数推导
// ==========================================

use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::MasterDataValidator;
use crate::domain::GlobalConfig;
use crate::engine::{resolve_cost_parameters, CostParameters};
use crate::repository::{FilamentRepository, GlobalConfigRepository, PrinterRepository};

// ==========================================
// ConfigApi - 全局配置 API
// ==========================================
pub struct ConfigApi {
    config_repo: Arc<GlobalConfigRepository>,
    filament_repo: Arc<FilamentRepository>,
    printer_repo: Arc<PrinterRepository>,
    validator: MasterDataValidator,
}

impl ConfigApi {
    pub fn new(
        config_repo: Arc<GlobalConfigRepository>,
        filament_repo: Arc<FilamentRepository>,
        printer_repo: Arc<PrinterRepository>,
    ) -> Self {
        Self {
            config_repo,
            filament_repo,
            printer_repo,
            validator: MasterDataValidator::new(),
        }
    }

    /// 查询全局配置
    ///
    /// # 错误
    /// - InternalError: 启动流程未创建配置记录
    pub fn get_config(&self) -> ApiResult<GlobalConfig> {
        self.config_repo.load()?.ok_or_else(|| {
            ApiError::InternalError("全局配置未初始化 (启动时应调用 ensure)".to_string())
        })
    }

    /// 更新全局配置
    #[instrument(skip(self, config), fields(use_manual = config.use_manual))]
    pub fn update_config(&self, config: &GlobalConfig) -> ApiResult<GlobalConfig> {
        self.validator.validate_config(config)?;
        self.config_repo.save(config)?;
        info!(
            electricity_cost_kwh = config.electricity_cost_kwh,
            profit_margin = config.profit_margin,
            "全局配置已更新"
        );
        Ok(config.clone())
    }

    /// 按当前配置与主数据推导定价参数
    pub fn get_cost_parameters(&self) -> ApiResult<CostParameters> {
        let config = self.get_config()?;
        let filaments = self.filament_repo.list_all()?;
        let printers = self.printer_repo.list_all()?;
        Ok(resolve_cost_parameters(&config, &filaments, &printers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::{FilamentDraft, PrinterDraft};
    use crate::engine::EnergyCostSource;
    use std::sync::Mutex;

    fn setup() -> (ConfigApi, Arc<GlobalConfigRepository>, Arc<FilamentRepository>, Arc<PrinterRepository>) {
        let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
        let config_repo = Arc::new(GlobalConfigRepository::new(conn.clone()));
        let filament_repo = Arc::new(FilamentRepository::new(conn.clone()));
        let printer_repo = Arc::new(PrinterRepository::new(conn));
        let api = ConfigApi::new(config_repo.clone(), filament_repo.clone(), printer_repo.clone());
        (api, config_repo, filament_repo, printer_repo)
    }

    #[test]
    fn test_get_config_requires_ensure() {
        let (api, config_repo, _, _) = setup();
        assert!(matches!(api.get_config(), Err(ApiError::InternalError(_))));
        config_repo.ensure().unwrap();
        assert_eq!(api.get_config().unwrap(), GlobalConfig::default());
    }

    #[test]
    fn test_cost_parameters_follow_master_data() {
        let (api, config_repo, filament_repo, printer_repo) = setup();
        config_repo.ensure().unwrap();

        let params = api.get_cost_parameters().unwrap();
        assert_eq!(params.cost_per_gram, 0.0);
        assert_eq!(params.energy_source, EnergyCostSource::NoPrinterFallback);

        filament_repo
            .insert(&FilamentDraft {
                name: "PLA".to_string(),
                color: "blanco".to_string(),
                material: "PLA".to_string(),
                price: 10_000,
                initial_g: 1000,
                remaining_g_effective: None,
            })
            .unwrap();
        printer_repo
            .insert(&PrinterDraft {
                name: "Ender".to_string(),
                price: 200_000,
                wear_per_hour: 20.0,
                power_kwh_per_hour: 0.5,
            })
            .unwrap();

        let params = api.get_cost_parameters().unwrap();
        assert_eq!(params.cost_per_gram, 10.0);
        assert_eq!(params.cost_per_kwh_hour, 60.0);
        assert_eq!(params.cost_per_wear_hour, 20.0);
        assert_eq!(params.energy_source, EnergyCostSource::FleetAverage);
    }

    #[test]
    fn test_update_config_validates() {
        let (api, config_repo, _, _) = setup();
        config_repo.ensure().unwrap();

        let bad = GlobalConfig {
            profit_margin: -5.0,
            ..GlobalConfig::default()
        };
        assert!(api.update_config(&bad).is_err());

        let manual = GlobalConfig {
            use_manual: true,
            manual_filament_cost: Some(8.0),
            ..GlobalConfig::default()
        };
        api.update_config(&manual).unwrap();
        let params = api.get_cost_parameters().unwrap();
        assert_eq!(params.cost_per_gram, 8.0);
        assert_eq!(params.cost_per_kwh_hour, 0.0);
        assert_eq!(params.margin_pct, 0.0);
    }
}
