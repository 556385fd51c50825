//! 成就条件操作符定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 条件操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// 比较 `actual <op> expected`
    pub fn compare(&self, actual: u64, expected: u64) -> bool {
        match self {
            Self::Eq => actual == expected,
            Self::Neq => actual != expected,
            Self::Gt => actual > expected,
            Self::Gte => actual >= expected,
            Self::Lt => actual < expected,
            Self::Lte => actual <= expected,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare() {
        assert!(Operator::Gte.compare(7, 7));
        assert!(!Operator::Gt.compare(7, 7));
        assert!(Operator::Lt.compare(1, 2));
        assert!(Operator::Lte.compare(2, 2));
        assert!(Operator::Eq.compare(1, 1));
        assert!(Operator::Neq.compare(0, 1));
    }

    #[test]
    fn test_serde_names() {
        let op: Operator = serde_json::from_str("\"gte\"").unwrap();
        assert_eq!(op, Operator::Gte);
        assert_eq!(serde_json::to_string(&Operator::Neq).unwrap(), "\"neq\"");
        assert_eq!(Operator::Lte.to_string(), "lte");
    }
}
