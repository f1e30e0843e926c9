// ==========================================
// 3D 打印工坊台账 - 打印机管理 API
// ==========================================

use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::MasterDataValidator;
use crate::domain::{Printer, PrinterDraft};
use crate::repository::{PrintJobRepository, PrinterRepository};

pub struct PrinterApi {
    printer_repo: Arc<PrinterRepository>,
    print_job_repo: Arc<PrintJobRepository>,
    validator: MasterDataValidator,
}

impl PrinterApi {
    pub fn new(printer_repo: Arc<PrinterRepository>, print_job_repo: Arc<PrintJobRepository>) -> Self {
        Self {
            printer_repo,
            print_job_repo,
            validator: MasterDataValidator::new(),
        }
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn create_printer(&self, draft: &PrinterDraft) -> ApiResult<Printer> {
        let draft = PrinterDraft {
            name: draft.name.trim().to_string(),
            ..draft.clone()
        };
        self.validator.validate_printer(&draft)?;
        let printer = self.printer_repo.insert(&draft)?;
        info!(printer_id = printer.id, "打印机已创建");
        Ok(printer)
    }

    #[instrument(skip(self, draft))]
    pub fn update_printer(&self, id: i64, draft: &PrinterDraft) -> ApiResult<Printer> {
        let draft = PrinterDraft {
            name: draft.name.trim().to_string(),
            ..draft.clone()
        };
        self.validator.validate_printer(&draft)?;

        let printer = Printer {
            id,
            name: draft.name,
            price: draft.price,
            wear_per_hour: draft.wear_per_hour,
            power_kwh_per_hour: draft.power_kwh_per_hour,
        };
        self.printer_repo.update(&printer)?;
        Ok(printer)
    }

    /// 删除打印机
    ///
    /// # 错误
    /// - ReferentialIntegrity: 仍有进行中的任务引用该打印机
    #[instrument(skip(self))]
    pub fn delete_printer(&self, id: i64) -> ApiResult<()> {
        let active = self.print_job_repo.active_ids_by_printer(id)?;
        if !active.is_empty() {
            return Err(ApiError::ReferentialIntegrity(format!(
                "打印机(id={})仍被进行中的任务引用: {:?}",
                id, active
            )));
        }
        self.printer_repo.delete(id)?;
        info!(printer_id = id, "打印机已删除");
        Ok(())
    }

    pub fn get_printer(&self, id: i64) -> ApiResult<Printer> {
        self.printer_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Printer(id={})不存在", id)))
    }

    pub fn list_printers(&self) -> ApiResult<Vec<Printer>> {
        Ok(self.printer_repo.list_all()?)
    }
}
