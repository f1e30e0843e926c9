// ==========================================
// QueueApi 集成测试
// ==========================================
// 测试范围:
// 1. 任务创建: 预留预测库存、校验失败无副作用
// 2. 状态推进: 打印中/完成/取消(含部分消耗)/删除
// 3. 终态与引用完整性
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use helpers::test_data_builder::{FilamentBuilder, ObjectBuilder};
use print_shop_ledger::api::ApiError;
use print_shop_ledger::domain::{JobAction, JobStatus, MovementKind};

// ==========================================
// 任务创建
// ==========================================

#[test]
fn test_create_job_预留预测库存() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();

    let created = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 2)
        .expect("创建任务失败");

    assert_eq!(created.job.filament_used_g, 200);
    assert_eq!(created.job.hours, 4.0);
    assert_eq!(created.job.status, JobStatus::Pending);
    assert_eq!(created.shortage_g, 0);

    let f = env.filament(s.filament.id);
    assert_eq!(f.remaining_g_projected, 800);
    assert_eq!(f.remaining_g_effective, 1000);

    let queue = env.queue_api.list_active().expect("查询队列失败");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].object_name.as_deref(), Some("soporte"));
}

#[test]
fn test_create_job_数量非法无副作用() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();

    for qty in [0, 101] {
        let err = env
            .queue_api
            .create_job(s.object.id, s.filament.id, s.printer.id, qty)
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)), "qty={}: {:?}", qty, err);
    }

    assert!(env.queue_api.list_jobs().unwrap().is_empty());
    assert_eq!(env.filament(s.filament.id).remaining_g_projected, 1000);
}

#[test]
fn test_create_job_引用不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();

    let err = env
        .queue_api
        .create_job(s.object.id, s.filament.id + 100, s.printer.id, 1)
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    let err = env
        .queue_api
        .create_job(s.object.id + 100, s.filament.id, s.printer.id, 1)
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    assert!(env.queue_api.list_jobs().unwrap().is_empty());
}

#[test]
fn test_create_job_库存不足返回缺口() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let small = env
        .filament_api
        .create_filament(&FilamentBuilder::new("PETG Resto").remaining(150).build())
        .unwrap();

    let created = env
        .queue_api
        .create_job(s.object.id, small.id, s.printer.id, 2)
        .expect("库存不足时仍应创建任务");

    assert_eq!(created.shortage_g, 50);
    assert_eq!(created.balance.remaining_g_projected, -50);
    assert_eq!(env.filament(small.id).remaining_g_projected, -50);
}

#[test]
fn test_create_job_用量溢出返回校验错误() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let heavy = env
        .object_api
        .create_object(&ObjectBuilder::new("bloque").weight(i64::MAX / 2 + 1).build())
        .expect("超重对象本身允许创建");

    let err = env
        .queue_api
        .create_job(heavy.id, s.filament.id, s.printer.id, 2)
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)), "{:?}", err);

    assert!(env.queue_api.list_jobs().unwrap().is_empty());
    assert_eq!(env.filament(s.filament.id).remaining_g_projected, 1000);
}

// ==========================================
// 状态推进
// ==========================================

#[test]
fn test_create_then_delete_恢复预测库存() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let before = env.filament(s.filament.id);

    let created = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 3)
        .unwrap();
    let advanced = env
        .queue_api
        .advance_job(created.job.id, JobAction::Delete, None)
        .unwrap();

    assert!(advanced.job.is_none());
    let after = env.filament(s.filament.id);
    assert_eq!(after.remaining_g_projected, before.remaining_g_projected);
    assert_eq!(after.remaining_g_effective, before.remaining_g_effective);
    assert!(matches!(
        env.queue_api.get_job(created.job.id),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_printing_then_done_扣减有效库存() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 2)
        .unwrap()
        .job;

    let printing = env
        .queue_api
        .advance_job(job.id, JobAction::Printing, None)
        .unwrap();
    assert_eq!(printing.job.unwrap().status, JobStatus::Printing);
    assert_eq!(env.filament(s.filament.id).remaining_g_effective, 1000);

    env.queue_api
        .advance_job(job.id, JobAction::Done, None)
        .unwrap();

    let done = env.queue_api.get_job(job.id).unwrap();
    assert_eq!(done.status, JobStatus::Done);
    assert!(done.completed_at.is_some());

    let f = env.filament(s.filament.id);
    assert_eq!(f.remaining_g_effective, 800);
    assert_eq!(f.remaining_g_projected, 800);
    assert!(env.queue_api.list_active().unwrap().is_empty());
}

#[test]
fn test_cancel_部分打印按比例消耗() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 2)
        .unwrap()
        .job;
    env.queue_api
        .advance_job(job.id, JobAction::Printing, None)
        .unwrap();

    let advanced = env
        .queue_api
        .advance_job(job.id, JobAction::Cancelled, Some(2.0))
        .unwrap();

    let cancelled = advanced.job.unwrap();
    assert_eq!(cancelled.status, JobStatus::Cancelled);
    assert_eq!(cancelled.hours, 2.0);
    assert_eq!(cancelled.filament_used_g, 100);

    // 相对创建前: 两个计数器各 -100
    let f = env.filament(s.filament.id);
    assert_eq!(f.remaining_g_projected, 900);
    assert_eq!(f.remaining_g_effective, 900);
    assert_eq!(env.queue_api.get_job(job.id).unwrap(), cancelled);
}

#[test]
fn test_cancel_无部分时长全部归还() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 2)
        .unwrap()
        .job;

    env.queue_api
        .advance_job(job.id, JobAction::Cancelled, None)
        .unwrap();

    let f = env.filament(s.filament.id);
    assert_eq!(f.remaining_g_projected, 1000);
    assert_eq!(f.remaining_g_effective, 1000);
}

#[test]
fn test_cancel_部分时长超出总时长() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 2)
        .unwrap()
        .job;

    let err = env
        .queue_api
        .advance_job(job.id, JobAction::Cancelled, Some(10.0))
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    // 无任何写入
    assert_eq!(env.queue_api.get_job(job.id).unwrap().status, JobStatus::Pending);
    assert_eq!(env.filament(s.filament.id).remaining_g_projected, 800);
}

// ==========================================
// 终态与引用完整性
// ==========================================

#[test]
fn test_终态任务只允许删除() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 1)
        .unwrap()
        .job;
    env.queue_api.advance_job(job.id, JobAction::Done, None).unwrap();

    for action in [JobAction::Printing, JobAction::Done, JobAction::Cancelled] {
        let err = env.queue_api.advance_job(job.id, action, None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
    }

    // 删除已完成任务不影响库存
    let before = env.filament(s.filament.id);
    let advanced = env.queue_api.advance_job(job.id, JobAction::Delete, None).unwrap();
    assert!(advanced.balance.is_none());
    assert_eq!(env.filament(s.filament.id), before);
}

#[test]
fn test_删除部分取消的任务不重复归还() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 2)
        .unwrap()
        .job;
    env.queue_api
        .advance_job(job.id, JobAction::Cancelled, Some(2.0))
        .unwrap();

    let settled = env.filament(s.filament.id);
    assert_eq!(settled.remaining_g_projected, 900);
    assert_eq!(settled.remaining_g_effective, 900);
    let movements_before = env.inventory_api.list_movements(s.filament.id).unwrap().len();

    let advanced = env.queue_api.advance_job(job.id, JobAction::Delete, None).unwrap();
    assert!(advanced.job.is_none());
    assert!(advanced.balance.is_none());

    assert_eq!(env.filament(s.filament.id), settled);
    assert_eq!(
        env.inventory_api.list_movements(s.filament.id).unwrap().len(),
        movements_before
    );
    assert!(matches!(env.queue_api.get_job(job.id), Err(ApiError::NotFound(_))));
}

#[test]
fn test_进行中任务阻止删除主数据() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 1)
        .unwrap()
        .job;

    assert!(matches!(
        env.filament_api.delete_filament(s.filament.id),
        Err(ApiError::ReferentialIntegrity(_))
    ));
    assert!(matches!(
        env.printer_api.delete_printer(s.printer.id),
        Err(ApiError::ReferentialIntegrity(_))
    ));
    assert!(matches!(
        env.object_api.delete_object(s.object.id),
        Err(ApiError::ReferentialIntegrity(_))
    ));

    // 任务结束后可以删除，历史任务外键置空
    env.queue_api.advance_job(job.id, JobAction::Done, None).unwrap();
    env.filament_api.delete_filament(s.filament.id).unwrap();
    let history = env.queue_api.get_job(job.id).unwrap();
    assert_eq!(history.filament_id, None);
}

#[test]
fn test_耗材缺失的进行中任务() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 1)
        .unwrap()
        .job;

    // 绕过 API 直接删除耗材 (模拟历史数据)
    {
        let conn = env.state.connection();
        let guard = conn.lock().unwrap();
        guard
            .execute("DELETE FROM filaments WHERE id = ?1", [s.filament.id])
            .unwrap();
    }

    for action in [JobAction::Printing, JobAction::Done, JobAction::Cancelled, JobAction::Delete] {
        let err = env.queue_api.advance_job(job.id, action, None).unwrap_err();
        assert!(matches!(err, ApiError::ReferentialIntegrity(_)), "{:?}", action);
    }
    assert_eq!(env.queue_api.get_job(job.id).unwrap().status, JobStatus::Pending);
}

#[test]
fn test_流水记录完整() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env.seed_reference_scenario();
    let job = env
        .queue_api
        .create_job(s.object.id, s.filament.id, s.printer.id, 2)
        .unwrap()
        .job;
    env.queue_api
        .advance_job(job.id, JobAction::Cancelled, Some(1.0))
        .unwrap();

    let ledger = env.inventory_api.list_movements(s.filament.id).unwrap();
    let kinds: Vec<MovementKind> = ledger.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![MovementKind::Reserve, MovementKind::Release, MovementKind::Consume]
    );
    assert!(ledger.iter().all(|m| m.job_id == Some(job.id)));

    // 1 / 4 小时 → 50 g
    let summary = env.inventory_api.ledger_summary(s.filament.id).unwrap();
    assert_eq!(summary.net_effective_g, -50);
    assert_eq!(summary.net_projected_g, -50);
    assert_eq!(summary.reserved_g, 0);
}
