// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use print_shop_ledger::domain::{FilamentDraft, ObjectDraft, PrinterDraft};

// ==========================================
// FilamentDraft 构建器
// ==========================================

pub struct FilamentBuilder {
    draft: FilamentDraft,
}

impl FilamentBuilder {
    /// 默认: PLA 1000 g，整卷 10000
    pub fn new(name: &str) -> Self {
        Self {
            draft: FilamentDraft {
                name: name.to_string(),
                color: "negro".to_string(),
                material: "PLA".to_string(),
                price: 10_000,
                initial_g: 1000,
                remaining_g_effective: None,
            },
        }
    }

    pub fn price(mut self, price: i64) -> Self {
        self.draft.price = price;
        self
    }

    pub fn initial_g(mut self, grams: i64) -> Self {
        self.draft.initial_g = grams;
        self
    }

    pub fn remaining(mut self, grams: i64) -> Self {
        self.draft.remaining_g_effective = Some(grams);
        self
    }

    pub fn build(self) -> FilamentDraft {
        self.draft
    }
}

// ==========================================
// PrinterDraft 构建器
// ==========================================

pub struct PrinterBuilder {
    draft: PrinterDraft,
}

impl PrinterBuilder {
    /// 默认: 折旧 20/小时，功耗 0.5 kWh/小时
    pub fn new(name: &str) -> Self {
        Self {
            draft: PrinterDraft {
                name: name.to_string(),
                price: 250_000,
                wear_per_hour: 20.0,
                power_kwh_per_hour: 0.5,
            },
        }
    }

    pub fn wear(mut self, wear_per_hour: f64) -> Self {
        self.draft.wear_per_hour = wear_per_hour;
        self
    }

    pub fn power(mut self, kwh: f64) -> Self {
        self.draft.power_kwh_per_hour = kwh;
        self
    }

    pub fn build(self) -> PrinterDraft {
        self.draft
    }
}

// ==========================================
// ObjectDraft 构建器
// ==========================================

pub struct ObjectBuilder {
    draft: ObjectDraft,
}

impl ObjectBuilder {
    /// 默认: 单件 100 g，2 小时，每文件 1 个
    pub fn new(name: &str) -> Self {
        Self {
            draft: ObjectDraft {
                name: name.to_string(),
                stl_path: format!("/modelos/{}.stl", name),
                gcode_path: format!("/modelos/{}.gcode", name),
                objects: 1,
                weight_grams: 100,
                print_time_hours: 2.0,
            },
        }
    }

    pub fn weight(mut self, grams: i64) -> Self {
        self.draft.weight_grams = grams;
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.draft.print_time_hours = hours;
        self
    }

    pub fn objects(mut self, objects: i64) -> Self {
        self.draft.objects = objects;
        self
    }

    pub fn build(self) -> ObjectDraft {
        self.draft
    }
}
