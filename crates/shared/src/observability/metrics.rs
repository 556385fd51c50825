//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集。
//! 只安装 recorder，不启动 HTTP 监听；宿主通过 `render` 获取文本快照。

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Mutex, OnceLock};

use super::ObservabilityConfig;

/// 全局 Prometheus handle，recorder 在进程内只能安装一次
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// 串行化安装过程，避免并发初始化时重复安装 recorder
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Metrics 资源句柄
#[derive(Clone)]
pub struct MetricsHandle {
    handle: PrometheusHandle,
}

impl MetricsHandle {
    /// 渲染 Prometheus 文本格式的指标快照
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 初始化 Prometheus recorder
///
/// 重复调用时返回已安装的 handle。
pub fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let _lock = INIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(MetricsHandle {
            handle: handle.clone(),
        });
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let handle = PROMETHEUS_HANDLE.get_or_init(|| handle).clone();

    register_common_metrics(&config.service_name);

    Ok(MetricsHandle { handle })
}

/// 注册通用指标描述，会出现在渲染结果的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!(
        "progression_evaluations_total",
        "Total number of standing evaluations"
    );
    metrics::describe_counter!("points_awarded_total", "Total number of points awarded");
    metrics::describe_counter!("tier_ups_total", "Total number of tiers newly attained");
    metrics::describe_counter!(
        "catalog_reloads_total",
        "Total number of catalog reload attempts"
    );
    metrics::describe_counter!("learner_logins_total", "Total number of learner logins");

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

// ============================================================================
// 业务指标记录
// ============================================================================

/// 记录一次位置评估
pub fn record_standing_evaluation(is_max_tier: bool) {
    metrics::counter!(
        "progression_evaluations_total",
        "max_tier" => is_max_tier.to_string()
    )
    .increment(1);
}

/// 记录积分发放及新达成的等级数
pub fn record_points_award(amount: u64, tier_ups: usize) {
    metrics::counter!("points_awarded_total").increment(amount);
    if tier_ups > 0 {
        metrics::counter!("tier_ups_total").increment(tier_ups as u64);
    }
}

/// 记录目录重新加载结果（success / failure）
pub fn record_catalog_reload(outcome: &str) {
    metrics::counter!("catalog_reloads_total", "outcome" => outcome.to_string()).increment(1);
}

/// 记录登录
pub fn record_login(role: &str) {
    metrics::counter!("learner_logins_total", "role" => role.to_string()).increment(1);
}
