//! 学习者会话
//!
//! 宿主持有学习者的可变积分，每次读取派生状态时把积分快照交给引擎。
//! 会话是调用方显式持有的结构体，而不是进程级单例。

use progression_shared::config::SessionConfig;
use progression_shared::observability::metrics::{record_login, record_points_award};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::error::{ProgressionError, Result};
use crate::models::{Learner, Standing, Tier, UserRole};
use crate::source::CatalogSource;
use crate::store::CatalogStore;

/// 登录请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

/// 一次积分发放的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Award {
    pub before: u64,
    pub after: u64,
    /// 本次新达成的等级
    pub tier_ups: Vec<Tier>,
}

/// 学习者会话宿主
pub struct LearnerSession {
    store: CatalogStore,
    starting_points: u64,
    learner: Option<Learner>,
}

impl LearnerSession {
    pub fn new(store: CatalogStore, config: &SessionConfig) -> Self {
        Self {
            store,
            starting_points: config.starting_points,
            learner: None,
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn learner(&self) -> Option<&Learner> {
        self.learner.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.learner.is_some()
    }

    /// 登录，初始积分取自配置
    ///
    /// 已登录时以新身份替换当前学习者。
    #[instrument(skip(self, email))]
    pub fn login(&mut self, email: &str, role: UserRole) -> Result<&Learner> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            role,
        };
        request
            .validate()
            .map_err(|e| ProgressionError::InvalidLogin(e.to_string()))?;

        let learner = Learner::new(request.email, request.role, self.starting_points);
        info!(learner_id = %learner.id, role = %learner.role, "学习者已登录");
        record_login(&learner.role.to_string());

        Ok(self.learner.insert(learner))
    }

    pub fn logout(&mut self) {
        if let Some(learner) = self.learner.take() {
            info!(learner_id = %learner.id, "学习者已登出");
        }
    }

    #[instrument(skip(self))]
    pub fn switch_role(&mut self, role: UserRole) -> Result<()> {
        let learner = self.signed_in_mut("switch_role")?;
        learner.role = role;
        info!(learner_id = %learner.id, "角色已切换");
        Ok(())
    }

    /// 发放积分（饱和加法），返回前后积分与新达成的等级
    #[instrument(skip(self))]
    pub fn add_points(&mut self, amount: u64) -> Result<Award> {
        let engine = self.store.load();
        let learner = self.signed_in_mut("add_points")?;

        let before = learner.total_points;
        let after = before.saturating_add(amount);
        learner.total_points = after;

        let tier_ups: Vec<Tier> = engine
            .tier_ups(to_snapshot(before), to_snapshot(after))
            .into_iter()
            .cloned()
            .collect();

        record_points_award(after - before, tier_ups.len());
        if !tier_ups.is_empty() {
            info!(
                learner_id = %learner.id,
                tiers = ?tier_ups.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
                "达成新等级"
            );
        }

        Ok(Award {
            before,
            after,
            tier_ups,
        })
    }

    /// 重新加载徽章目录，仅后台角色（管理员、讲师）可用
    #[instrument(skip(self, source))]
    pub fn reload_catalog(&self, source: &dyn CatalogSource) -> Result<()> {
        let learner = self
            .learner
            .as_ref()
            .ok_or_else(|| ProgressionError::NotSignedIn {
                operation: "reload_catalog".to_string(),
            })?;
        if !learner.role.can_access_backoffice() {
            return Err(ProgressionError::Forbidden {
                operation: "reload_catalog".to_string(),
            });
        }

        self.store.reload(source)?;
        info!(learner_id = %learner.id, "目录已由后台角色重新加载");
        Ok(())
    }

    /// 当前位置；未登录时为 None
    pub fn standing(&self) -> Option<Standing> {
        let points = self.learner.as_ref()?.total_points;
        Some(self.store.load().standing(to_snapshot(points)))
    }

    /// 等级内进度；未登录时为 0
    pub fn progress_to_next(&self) -> u8 {
        self.learner
            .as_ref()
            .map(|l| self.store.load().progress_to_next(to_snapshot(l.total_points)))
            .unwrap_or(0)
    }

    fn signed_in_mut(&mut self, operation: &str) -> Result<&mut Learner> {
        self.learner
            .as_mut()
            .ok_or_else(|| ProgressionError::NotSignedIn {
                operation: operation.to_string(),
            })
    }
}

/// 宿主积分是 u64，引擎接口是 i64 快照；超出部分在最高等级之上，按 i64::MAX 处理
fn to_snapshot(points: u64) -> i64 {
    i64::try_from(points).unwrap_or(i64::MAX)
}
