//! 进度引擎
//!
//! 对已校验目录的纯函数计算：当前等级、下一等级、等级内进度。
//! 引擎不持有学习者状态，每次调用接收一个积分快照。
//!
//! 负数积分属于宿主的契约违规，所有操作统一按 0 处理。

use progression_shared::observability::metrics::record_standing_evaluation;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::TierCatalog;
use crate::models::{Standing, Tier, TierStatus};

/// 进度引擎
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    catalog: Arc<TierCatalog>,
}

impl ProgressionEngine {
    pub fn new(catalog: TierCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn with_shared(catalog: Arc<TierCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    /// 当前等级
    ///
    /// 从最高阈值向下查找第一个 `required_points <= points` 的等级；
    /// 积分低于最低阈值时返回最低等级作为保底。
    pub fn current_tier(&self, points: i64) -> &Tier {
        self.current_tier_at(normalize(points))
    }

    /// 下一等级
    ///
    /// 按升序查找第一个 `required_points > points` 的等级，已达最高等级时返回 None。
    pub fn next_tier(&self, points: i64) -> Option<&Tier> {
        self.next_tier_at(normalize(points))
    }

    /// 等级内进度百分比，0..=100
    ///
    /// 进度只在当前等级与下一等级之间计算，跨入新等级后从 0 重新开始。
    /// 百分比按四舍五入（0.5 进位）取整。区间长度为 0 时返回 100；
    /// 积分低于最低阈值时当前与下一等级同为最低等级，因此也返回 100。
    pub fn progress_to_next(&self, points: i64) -> u8 {
        self.progress_at(normalize(points))
    }

    /// 距下一等级还差的积分
    pub fn points_to_next(&self, points: i64) -> Option<u64> {
        let points = normalize(points);
        self.next_tier_at(points)
            .map(|next| next.required_points - points)
    }

    /// 汇总当前位置，供宿主一次性读取全部派生状态
    pub fn standing(&self, points: i64) -> Standing {
        let points = normalize(points);
        let current = self.current_tier_at(points).clone();
        let next = self.next_tier_at(points).cloned();
        let points_to_next = next.as_ref().map(|n| n.required_points - points);

        record_standing_evaluation(next.is_none());

        Standing {
            points,
            is_max_tier: next.is_none(),
            progress: self.progress_at(points),
            current,
            next,
            points_to_next,
        }
    }

    /// 等级阶梯视图：每个等级是否已解锁、是否为当前等级
    pub fn ladder(&self, points: i64) -> Vec<TierStatus> {
        let points = normalize(points);
        let current_id = &self.current_tier_at(points).id;

        self.catalog
            .iter()
            .map(|tier| TierStatus {
                unlocked: tier.is_attained(points),
                current: &tier.id == current_id,
                tier: tier.clone(),
            })
            .collect()
    }

    /// 积分从 `before` 增加到 `after` 时新达成的等级（按升序）
    pub fn tier_ups(&self, before: i64, after: i64) -> Vec<&Tier> {
        let (before, after) = (normalize(before), normalize(after));
        self.catalog
            .iter()
            .filter(|t| !t.is_attained(before) && t.is_attained(after))
            .collect()
    }

    fn current_tier_at(&self, points: u64) -> &Tier {
        self.catalog
            .iter()
            .rev()
            .find(|t| t.required_points <= points)
            .unwrap_or_else(|| self.catalog.first())
    }

    fn next_tier_at(&self, points: u64) -> Option<&Tier> {
        self.catalog.iter().find(|t| t.required_points > points)
    }

    fn progress_at(&self, points: u64) -> u8 {
        let Some(next) = self.next_tier_at(points) else {
            return 100;
        };
        let current = self.current_tier_at(points);

        let range = next.required_points.saturating_sub(current.required_points);
        if range == 0 {
            return 100;
        }
        let advance = points.saturating_sub(current.required_points);

        round_percent(advance, range)
    }
}

impl From<TierCatalog> for ProgressionEngine {
    fn from(catalog: TierCatalog) -> Self {
        Self::new(catalog)
    }
}

/// 负数积分按 0 处理
fn normalize(points: i64) -> u64 {
    if points < 0 {
        debug!(points, "negative point total clamped to 0");
    }
    points.max(0) as u64
}

/// round_half_up(100 * advance / range)，夹在 [0, 100]
///
/// 整数运算：floor((200 * advance + range) / (2 * range))，u128 避免溢出。
fn round_percent(advance: u64, range: u64) -> u8 {
    let advance = u128::from(advance);
    let range = u128::from(range);
    let percent = (200 * advance + range) / (2 * range);
    percent.min(100) as u8
}
