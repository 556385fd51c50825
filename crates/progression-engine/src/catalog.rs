//! 徽章目录
//!
//! 目录是按阈值升序排列的不可变等级序列。所有不变量在构造时校验，
//! 查询时不再重复检查。

use serde::Deserialize;
use std::collections::HashSet;

use crate::error::{CatalogError, Result};
use crate::models::Tier;

/// 阈值上限：引擎以 i64 接收积分快照，更高的阈值永远无法达到
pub const MAX_REQUIRED_POINTS: u64 = i64::MAX as u64;

/// 已校验的徽章目录
///
/// 保证：非空、id 唯一且非空、level 为正且严格递增、
/// required_points 严格递增且不超过 [`MAX_REQUIRED_POINTS`]。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

/// 目录文件的两种形态：顶层数组，或 `tiers` 字段（TOML 只能用这种）
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Table { tiers: Vec<Tier> },
    List(Vec<Tier>),
}

impl CatalogDocument {
    fn into_tiers(self) -> Vec<Tier> {
        match self {
            Self::Table { tiers } | Self::List(tiers) => tiers,
        }
    }
}

impl TierCatalog {
    /// 校验并构造目录
    pub fn new(tiers: Vec<Tier>) -> std::result::Result<Self, CatalogError> {
        Self::validate(&tiers)?;
        Ok(Self { tiers })
    }

    fn validate(tiers: &[Tier]) -> std::result::Result<(), CatalogError> {
        if tiers.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(tiers.len());
        for (index, tier) in tiers.iter().enumerate() {
            if tier.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { index });
            }
            if !seen.insert(tier.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: tier.id.clone(),
                });
            }
            if tier.level == 0 {
                return Err(CatalogError::InvalidLevel {
                    id: tier.id.clone(),
                });
            }
            if tier.required_points > MAX_REQUIRED_POINTS {
                return Err(CatalogError::ThresholdOutOfRange {
                    id: tier.id.clone(),
                    required: tier.required_points,
                    max: MAX_REQUIRED_POINTS,
                });
            }
        }

        for pair in tiers.windows(2) {
            let (previous, tier) = (&pair[0], &pair[1]);
            if tier.required_points <= previous.required_points {
                return Err(CatalogError::NonIncreasingThreshold {
                    id: tier.id.clone(),
                    required: tier.required_points,
                    previous_id: previous.id.clone(),
                    previous: previous.required_points,
                });
            }
            if tier.level <= previous.level {
                return Err(CatalogError::NonIncreasingLevel {
                    id: tier.id.clone(),
                    level: tier.level,
                    previous_id: previous.id.clone(),
                    previous: previous.level,
                });
            }
        }

        Ok(())
    }

    /// 从 JSON 解析目录（数组或 `{"tiers": [...]}`）
    pub fn from_json(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Ok(Self::new(document.into_tiers())?)
    }

    /// 从 TOML 解析目录（`[[tiers]]` 数组表）
    pub fn from_toml(content: &str) -> Result<Self> {
        let document: CatalogDocument = toml::from_str(content)?;
        Ok(Self::new(document.into_tiers())?)
    }

    /// 按名称获取内置预设
    pub fn preset(name: &str) -> std::result::Result<Self, CatalogError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "legacy" => Ok(Self::legacy()),
            other => Err(CatalogError::UnknownPreset(other.to_string())),
        }
    }

    /// 标准五级阶梯：0 / 50 / 150 / 300 / 500
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                Tier::new("newbie", "Newbie", 1, 0)
                    .with_icon("🌱")
                    .with_color("badge-newbie"),
                Tier::new("explorer", "Explorer", 2, 50)
                    .with_icon("🔍")
                    .with_color("badge-explorer"),
                Tier::new("achiever", "Achiever", 3, 150)
                    .with_icon("⭐")
                    .with_color("badge-achiever"),
                Tier::new("expert", "Expert", 4, 300)
                    .with_icon("💎")
                    .with_color("badge-expert"),
                Tier::new("master", "Master", 5, 500)
                    .with_icon("👑")
                    .with_color("badge-master"),
            ],
        }
    }

    /// 旧版六级阶梯，最低阈值为 20（低于 20 分时落在保底等级）
    pub fn legacy() -> Self {
        Self {
            tiers: vec![
                Tier::new("1", "Newbie", 1, 20)
                    .with_icon("🌱")
                    .with_color("badge-newbie"),
                Tier::new("2", "Explorer", 2, 40)
                    .with_icon("🔍")
                    .with_color("badge-explorer"),
                Tier::new("3", "Achiever", 3, 60)
                    .with_icon("⭐")
                    .with_color("badge-achiever"),
                Tier::new("4", "Specialist", 4, 80)
                    .with_icon("🎯")
                    .with_color("badge-specialist"),
                Tier::new("5", "Expert", 5, 100)
                    .with_icon("💎")
                    .with_color("badge-expert"),
                Tier::new("6", "Master", 6, 120)
                    .with_icon("👑")
                    .with_color("badge-master"),
            ],
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// 目录构造时保证非空，恒为 false
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// 最低等级（保底等级）
    pub fn first(&self) -> &Tier {
        &self.tiers[0]
    }

    /// 最高等级
    pub fn last(&self) -> &Tier {
        &self.tiers[self.tiers.len() - 1]
    }

    /// 最低阈值
    pub fn floor(&self) -> u64 {
        self.first().required_points
    }

    pub fn get(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.id == id)
    }
}

impl<'a> IntoIterator for &'a TierCatalog {
    type Item = &'a Tier;
    type IntoIter = std::slice::Iter<'a, Tier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}
