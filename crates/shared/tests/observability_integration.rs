//! 可观测性模块集成测试
//!
//! 测试指标记录与 Prometheus 渲染。

use progression_shared::observability::metrics::{
    self, record_catalog_reload, record_login, record_points_award, record_standing_evaluation,
};
use progression_shared::observability::ObservabilityConfig;

#[test]
fn test_record_without_recorder_is_noop() {
    // 未安装 recorder 时记录指标不应 panic
    record_standing_evaluation(false);
    record_points_award(0, 0);
}

#[test]
fn test_recorded_metrics_are_rendered() {
    let config = ObservabilityConfig::default().with_service_name("progression-test");
    let handle = metrics::init(&config).unwrap();

    record_standing_evaluation(true);
    record_points_award(25, 2);
    record_catalog_reload("failure");
    record_login("learner");

    let rendered = handle.render();
    assert!(rendered.contains("progression_evaluations_total"));
    assert!(rendered.contains("points_awarded_total"));
    assert!(rendered.contains("tier_ups_total"));
    assert!(rendered.contains("catalog_reloads_total"));
    assert!(rendered.contains("learner_logins_total"));
}

#[test]
fn test_init_is_idempotent() {
    let config = ObservabilityConfig::default();
    assert!(metrics::init(&config).is_ok());
    assert!(metrics::init(&config).is_ok());
}
