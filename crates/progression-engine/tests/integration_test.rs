//! 进度引擎集成测试
//!
//! 覆盖目录加载、等级推导、会话积分发放与成就评估的完整工作流。

use progression_engine::{
    AchievementEvaluator, CatalogSource, CatalogStore, FileSource, LearnerSession, LearnerStats,
    PresetSource, ProgressionEngine, ProgressionError, TierCatalog, UserRole,
};
use progression_shared::config::SessionConfig;
use progression_shared::error::AppError;
use std::fs;

/// (积分, 当前等级阈值, 下一等级阈值, 进度)
const STANDARD_SCENARIOS: &[(i64, u64, Option<u64>, u8)] = &[
    (0, 0, Some(50), 0),
    (25, 0, Some(50), 50),
    (50, 50, Some(150), 0),
    (120, 50, Some(150), 70),
    (500, 500, None, 100),
    (10_000, 500, None, 100),
];

// ==================== 标准目录场景 ====================

#[test]
fn test_standard_catalog_scenarios() {
    let engine = ProgressionEngine::new(TierCatalog::standard());

    for &(points, current, next, progress) in STANDARD_SCENARIOS {
        assert_eq!(
            engine.current_tier(points).required_points,
            current,
            "current tier for {} points",
            points
        );
        assert_eq!(
            engine.next_tier(points).map(|t| t.required_points),
            next,
            "next tier for {} points",
            points
        );
        assert_eq!(
            engine.progress_to_next(points),
            progress,
            "progress for {} points",
            points
        );
    }
}

#[test]
fn test_crossing_threshold_resets_progress() {
    let engine = ProgressionEngine::new(TierCatalog::standard());

    let before = engine.standing(149);
    let after = engine.standing(150);

    assert_eq!(before.current.id, "explorer");
    assert_eq!(before.progress, 99);
    assert_eq!(after.current.id, "achiever");
    assert_eq!(after.progress, 0);
    assert_eq!(after.points_to_next, Some(150));
}

// ==================== 目录来源与存储 ====================

#[test]
fn test_store_reload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiers.json");
    fs::write(
        &path,
        r#"{"tiers": [
            {"id": "bronze", "name": "Bronze", "level": 1, "required_points": 0},
            {"id": "silver", "name": "Silver", "level": 2, "required_points": 100},
            {"id": "gold", "name": "Gold", "level": 3, "required_points": 300}
        ]}"#,
    )
    .unwrap();

    let store = CatalogStore::from_source(&PresetSource::new("standard")).unwrap();
    let source = FileSource::new(&path);
    store.reload(&source).unwrap();

    let engine = store.load();
    assert_eq!(engine.current_tier(150).id, "silver");
    assert_eq!(engine.progress_to_next(150), 25);

    // 写入非法目录后重新加载失败，保留上一次的目录
    fs::write(
        &path,
        r#"[
            {"id": "bronze", "name": "Bronze", "level": 1, "required_points": 100},
            {"id": "silver", "name": "Silver", "level": 2, "required_points": 100}
        ]"#,
    )
    .unwrap();
    let err = store.reload(&source).unwrap_err();
    assert!(matches!(err, ProgressionError::Catalog(_)));
    assert_eq!(store.load().catalog().last().id, "gold");

    let app_err: AppError = err.into();
    assert_eq!(app_err.code(), "INVALID_CATALOG");
    assert!(!app_err.is_client_error());
}

#[test]
fn test_shipped_catalog_matches_standard_preset() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/tiers.toml");
    let catalog = FileSource::new(path).load().unwrap();
    assert_eq!(catalog, TierCatalog::standard());
}

#[test]
fn test_file_source_describes_itself() {
    let source = FileSource::new("config/tiers.toml");
    assert_eq!(source.describe(), "file:config/tiers.toml");
}

// ==================== 会话 ====================

#[test]
fn test_session_workflow() {
    let store = CatalogStore::new(TierCatalog::legacy());
    let mut session = LearnerSession::new(store, &SessionConfig { starting_points: 0 });

    assert_eq!(session.progress_to_next(), 0);

    session.login("grace@example.com", UserRole::Learner).unwrap();
    // 低于最低阈值：保底等级，current 与 next 相同，进度为 100
    let standing = session.standing().unwrap();
    assert_eq!(standing.current.name, "Newbie");
    assert_eq!(standing.next.as_ref().unwrap().name, "Newbie");
    assert_eq!(standing.progress, 100);
    assert_eq!(standing.points_to_next, Some(20));

    let award = session.add_points(15).unwrap();
    assert!(award.tier_ups.is_empty());
    assert_eq!(session.progress_to_next(), 100);

    let award = session.add_points(30).unwrap();
    let names: Vec<&str> = award.tier_ups.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Newbie", "Explorer"]);

    let standing = session.standing().unwrap();
    assert_eq!(standing.points, 45);
    assert_eq!(standing.current.name, "Explorer");
    assert_eq!(standing.points_to_next, Some(15));
    assert_eq!(standing.progress, 25);

    session.add_points(1_000).unwrap();
    let standing = session.standing().unwrap();
    assert!(standing.is_max_tier);
    assert_eq!(standing.current.name, "Master");

    session.logout();
    assert!(session.standing().is_none());
}

#[test]
fn test_session_errors_map_to_app_errors() {
    let mut session = LearnerSession::new(CatalogStore::default(), &SessionConfig::default());

    let err: AppError = session.add_points(5).unwrap_err().into();
    assert_eq!(err.code(), "UNAUTHORIZED");

    let err: AppError = session
        .login("no-at-sign", UserRole::Learner)
        .unwrap_err()
        .into();
    assert_eq!(err.code(), "INVALID_ARGUMENT");
    assert!(err.is_client_error());

    session.login("grace@example.com", UserRole::Learner).unwrap();
    let err: AppError = session
        .reload_catalog(&PresetSource::new("legacy"))
        .unwrap_err()
        .into();
    assert_eq!(err.code(), "FORBIDDEN");

    session.switch_role(UserRole::Instructor).unwrap();
    let err: AppError = session
        .reload_catalog(&PresetSource::new("platinum"))
        .unwrap_err()
        .into();
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(session.store().load().catalog(), &TierCatalog::standard());
}

// ==================== 成就 ====================

#[test]
fn test_achievements_alongside_ladder() {
    let stats = LearnerStats {
        login_count: 1,
        courses_started: 5,
        courses_completed: 0,
        streak_days: 2,
        studied_at_night: false,
    };

    let summary = AchievementEvaluator::default().summary(&stats);
    assert_eq!(summary.earned, 3);
    assert_eq!(summary.locked, 3);

    let unlocked: Vec<String> = AchievementEvaluator::default()
        .evaluate(&stats)
        .into_iter()
        .filter(|s| s.unlocked)
        .map(|s| s.achievement.id)
        .collect();
    assert_eq!(unlocked, vec!["first-login", "course-starter", "five-courses"]);
}
