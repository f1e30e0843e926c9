// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 基于临时数据库文件装配完整 AppState
// ==========================================

use std::sync::Arc;
use tempfile::NamedTempFile;

use print_shop_ledger::api::{ConfigApi, FilamentApi, InventoryApi, ObjectApi, PrinterApi, QueueApi};
use print_shop_ledger::app::AppState;
use print_shop_ledger::domain::{Filament, GlobalConfig, Object3D, Printer};
use print_shop_ledger::logging;

use super::test_data_builder::{FilamentBuilder, ObjectBuilder, PrinterBuilder};

// ==========================================
// API测试环境
// ==========================================

pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,

    pub filament_api: Arc<FilamentApi>,
    pub printer_api: Arc<PrinterApi>,
    pub object_api: Arc<ObjectApi>,
    pub queue_api: Arc<QueueApi>,
    pub inventory_api: Arc<InventoryApi>,
    pub config_api: Arc<ConfigApi>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        logging::init_test();

        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file.path().to_string_lossy().to_string();
        let state = AppState::new(db_path.clone())?;

        Ok(Self {
            db_path,
            filament_api: state.filament_api.clone(),
            printer_api: state.printer_api.clone(),
            object_api: state.object_api.clone(),
            queue_api: state.queue_api.clone(),
            inventory_api: state.inventory_api.clone(),
            config_api: state.config_api.clone(),
            state,
            _temp_file: temp_file,
        })
    }

    /// 基准场景
    ///
    /// - 电价 100，利润率 100%
    /// - 耗材: 1000 g / 10000 → 每克 10
    /// - 打印机: 折旧 20/小时，功耗 0.5 kWh → 电费 50/小时
    /// - 对象: 100 g，2 小时，每文件 1 个 → 成本 1140，售价 2280
    pub fn seed_reference_scenario(&self) -> Scenario {
        self.config_api
            .update_config(&GlobalConfig {
                electricity_cost_kwh: 100.0,
                profit_margin: 100.0,
                ..GlobalConfig::default()
            })
            .expect("更新配置失败");

        let filament = self
            .filament_api
            .create_filament(&FilamentBuilder::new("PLA Negro").build())
            .expect("创建耗材失败");
        let printer = self
            .printer_api
            .create_printer(&PrinterBuilder::new("Ender 3").build())
            .expect("创建打印机失败");
        let object = self
            .object_api
            .create_object(&ObjectBuilder::new("soporte").build())
            .expect("创建对象失败");

        Scenario {
            filament,
            printer,
            object,
        }
    }

    /// 重新读取耗材
    pub fn filament(&self, id: i64) -> Filament {
        self.filament_api.get_filament(id).expect("读取耗材失败")
    }
}

/// 基准场景中的主数据
pub struct Scenario {
    pub filament: Filament,
    pub printer: Printer,
    pub object: Object3D,
}
