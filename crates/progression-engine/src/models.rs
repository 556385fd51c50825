//! 进度引擎领域模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ProgressionError;

/// 徽章等级定义
///
/// `icon` 与 `color` 只用于展示，不参与计算。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: String,
    pub name: String,
    pub level: u32,
    #[serde(alias = "requiredPoints")]
    pub required_points: u64,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl Tier {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level: u32,
        required_points: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            required_points,
            icon: String::new(),
            color: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// 积分达到阈值即视为已获得该等级
    pub fn is_attained(&self, points: u64) -> bool {
        points >= self.required_points
    }
}

/// 阶梯视图中单个等级的状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierStatus {
    pub tier: Tier,
    pub unlocked: bool,
    pub current: bool,
}

/// 学习者在徽章阶梯上的位置快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub points: u64,
    pub current: Tier,
    pub next: Option<Tier>,
    /// 等级内进度，0..=100
    pub progress: u8,
    /// 距下一等级还差多少积分
    pub points_to_next: Option<u64>,
    pub is_max_tier: bool,
}

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Learner,
    Instructor,
    Admin,
}

impl UserRole {
    /// 管理员和讲师可以进入后台
    pub fn can_access_backoffice(&self) -> bool {
        matches!(self, Self::Admin | Self::Instructor)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Learner => "learner",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for UserRole {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learner" => Ok(Self::Learner),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            other => Err(ProgressionError::UnknownRole(other.to_string())),
        }
    }
}

/// 已登录的学习者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub total_points: u64,
    pub created_at: DateTime<Utc>,
}

impl Learner {
    /// 显示名取邮箱 @ 之前的部分
    pub fn new(email: impl Into<String>, role: UserRole, total_points: u64) -> Self {
        let email = email.into();
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            role,
            total_points,
            created_at: Utc::now(),
        }
    }
}

/// 学习行为统计，成就徽章的评估输入
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerStats {
    pub login_count: u64,
    pub courses_started: u64,
    pub courses_completed: u64,
    pub streak_days: u64,
    pub studied_at_night: bool,
}

impl LearnerStats {
    /// 读取统计字段；布尔字段映射为 0/1
    pub fn value(&self, field: StatField) -> u64 {
        match field {
            StatField::LoginCount => self.login_count,
            StatField::CoursesStarted => self.courses_started,
            StatField::CoursesCompleted => self.courses_completed,
            StatField::StreakDays => self.streak_days,
            StatField::StudiedAtNight => u64::from(self.studied_at_night),
        }
    }
}

/// 可用于成就条件的统计字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    LoginCount,
    CoursesStarted,
    CoursesCompleted,
    StreakDays,
    StudiedAtNight,
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LoginCount => "login_count",
            Self::CoursesStarted => "courses_started",
            Self::CoursesCompleted => "courses_completed",
            Self::StreakDays => "streak_days",
            Self::StudiedAtNight => "studied_at_night",
        };
        write!(f, "{}", s)
    }
}
