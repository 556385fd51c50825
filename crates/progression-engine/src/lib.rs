//! 学习者进度引擎
//!
//! 根据积分推导徽章等级阶梯上的位置，支持：
//! - 强类型、构造时校验的徽章目录
//! - 当前等级 / 下一等级 / 等级内进度百分比的纯函数计算
//! - 可原子替换的目录存储（快照读取）
//! - 显式传递的学习者会话宿主
//! - 基于学习统计的成就徽章评估

pub mod achievements;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod models;
pub mod operators;
pub mod session;
pub mod source;
pub mod store;

pub use achievements::{
    Achievement, AchievementEvaluator, AchievementStatus, AchievementSummary, Condition,
};
pub use catalog::TierCatalog;
pub use engine::ProgressionEngine;
pub use error::{CatalogError, ProgressionError, Result};
pub use models::{Learner, LearnerStats, Standing, StatField, Tier, TierStatus, UserRole};
pub use operators::Operator;
pub use session::{Award, LearnerSession};
pub use source::{CatalogSource, FileSource, PresetSource};
pub use store::CatalogStore;
