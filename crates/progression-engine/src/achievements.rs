//! 成就徽章
//!
//! 与积分阶梯相互独立：每个成就是一个作用在学习统计上的条件，
//! 满足即解锁。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{ProgressionError, Result};
use crate::models::{LearnerStats, StatField};
use crate::operators::Operator;

/// 条件：`stats.field <operator> value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: StatField,
    pub operator: Operator,
    pub value: u64,
}

impl Condition {
    pub fn new(field: StatField, operator: Operator, value: u64) -> Self {
        Self {
            field,
            operator,
            value,
        }
    }

    pub fn at_least(field: StatField, value: u64) -> Self {
        Self::new(field, Operator::Gte, value)
    }

    /// 布尔字段为真
    pub fn is_set(field: StatField) -> Self {
        Self::new(field, Operator::Eq, 1)
    }

    pub fn matches(&self, stats: &LearnerStats) -> bool {
        self.operator.compare(stats.value(self.field), self.value)
    }
}

/// 成就定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub condition: Condition,
}

impl Achievement {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        condition: Condition,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            condition,
        }
    }
}

/// 单个成就的评估结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub unlocked: bool,
}

/// 成就汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementSummary {
    pub earned: usize,
    pub locked: usize,
    pub streak_days: u64,
}

/// 成就评估器
#[derive(Debug, Clone)]
pub struct AchievementEvaluator {
    achievements: Vec<Achievement>,
}

impl AchievementEvaluator {
    /// 构造评估器，拒绝重复 id
    pub fn new(achievements: Vec<Achievement>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(achievements.len());
        for achievement in &achievements {
            if !seen.insert(achievement.id.as_str()) {
                return Err(ProgressionError::DuplicateAchievement(
                    achievement.id.clone(),
                ));
            }
        }
        Ok(Self { achievements })
    }

    /// 从 JSON 数组加载成就定义
    pub fn from_json(json: &str) -> Result<Self> {
        let achievements: Vec<Achievement> = serde_json::from_str(json)?;
        Self::new(achievements)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn evaluate(&self, stats: &LearnerStats) -> Vec<AchievementStatus> {
        self.achievements
            .iter()
            .map(|achievement| {
                let unlocked = achievement.condition.matches(stats);
                debug!(
                    achievement = %achievement.id,
                    field = %achievement.condition.field,
                    operator = %achievement.condition.operator,
                    unlocked,
                    "成就评估"
                );
                AchievementStatus {
                    achievement: achievement.clone(),
                    unlocked,
                }
            })
            .collect()
    }

    pub fn summary(&self, stats: &LearnerStats) -> AchievementSummary {
        let earned = self
            .achievements
            .iter()
            .filter(|a| a.condition.matches(stats))
            .count();

        AchievementSummary {
            earned,
            locked: self.achievements.len() - earned,
            streak_days: stats.streak_days,
        }
    }
}

impl Default for AchievementEvaluator {
    /// 内置成就
    fn default() -> Self {
        Self {
            achievements: vec![
                Achievement::new(
                    "first-login",
                    "First Launch",
                    "Logged in for the first time",
                    Condition::at_least(StatField::LoginCount, 1),
                ),
                Achievement::new(
                    "course-starter",
                    "Course Starter",
                    "Started your first course",
                    Condition::at_least(StatField::CoursesStarted, 1),
                ),
                Achievement::new(
                    "consistent-learner",
                    "Consistency King",
                    "Maintained a 7-day learning streak",
                    Condition::at_least(StatField::StreakDays, 7),
                ),
                Achievement::new(
                    "night-owl",
                    "Night Owl",
                    "Studied after midnight",
                    Condition::is_set(StatField::StudiedAtNight),
                ),
                Achievement::new(
                    "course-finisher",
                    "Finisher",
                    "Completed a full course",
                    Condition::at_least(StatField::CoursesCompleted, 1),
                ),
                Achievement::new(
                    "five-courses",
                    "Course Explorer",
                    "Started 5 different courses",
                    Condition::at_least(StatField::CoursesStarted, 5),
                ),
            ],
        }
    }
}
