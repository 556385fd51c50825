//! 进度引擎命令行
//!
//! 加载配置与徽章目录，输出给定积分在徽章阶梯上的位置。
//!
//! ```text
//! progression-engine [POINTS]...
//! ```
//!
//! 未给出积分时使用配置中的初始积分。

use anyhow::{Context, Result, bail};
use progression_engine::{CatalogStore, ProgressionEngine, Standing, TierStatus, source};
use progression_shared::config::AppConfig;
use progression_shared::error::AppError;
use progression_shared::observability;
use serde::Serialize;
use tracing::{debug, info};

/// 单个积分的报告
#[derive(Serialize)]
struct Report {
    standing: Standing,
    ladder: Vec<TierStatus>,
}

fn main() -> Result<()> {
    let config = AppConfig::load("progression-engine").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let guard = observability::init(&obs_config)?;

    let totals = parse_points(std::env::args().skip(1), config.session.starting_points)?;

    let catalog_source = source::from_config(&config.catalog);
    let store = CatalogStore::from_source(catalog_source.as_ref())
        .map_err(AppError::from)
        .with_context(|| format!("无法加载徽章目录: {}", catalog_source.describe()))?;

    let engine = store.load();
    info!(
        source = %catalog_source.describe(),
        tiers = engine.catalog().len(),
        "Catalog ready"
    );

    let reports: Vec<Report> = totals
        .into_iter()
        .map(|points| build_report(&engine, points))
        .collect();

    match config.report.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&reports)?),
        _ => {
            for report in &reports {
                print_text(report);
            }
        }
    }

    if let Some(metrics) = guard.metrics() {
        debug!(snapshot = %metrics.render(), "Metrics snapshot");
    }

    Ok(())
}

/// 解析命令行积分，允许负数（引擎按 0 处理）
fn parse_points(args: impl Iterator<Item = String>, default: u64) -> Result<Vec<i64>> {
    let mut totals = Vec::new();
    for arg in args {
        match arg.trim().parse::<i64>() {
            Ok(points) => totals.push(points),
            Err(_) => bail!("无效的积分参数: '{}'", arg),
        }
    }

    if totals.is_empty() {
        totals.push(i64::try_from(default).unwrap_or(i64::MAX));
    }
    Ok(totals)
}

fn build_report(engine: &ProgressionEngine, points: i64) -> Report {
    Report {
        standing: engine.standing(points),
        ladder: engine.ladder(points),
    }
}

fn print_text(report: &Report) {
    let standing = &report.standing;
    println!(
        "{} pts  {} {} (level {})",
        standing.points, standing.current.icon, standing.current.name, standing.current.level
    );

    match (&standing.next, standing.points_to_next) {
        (Some(next), Some(to_go)) => println!(
            "  next: {} {}  {}%  {} pts to go",
            next.icon, next.name, standing.progress, to_go
        ),
        _ => println!("  max tier reached  {}%", standing.progress),
    }

    let ladder: Vec<String> = report
        .ladder
        .iter()
        .map(|status| {
            let marker = match (status.current, status.unlocked) {
                (true, _) => "*",
                (false, true) => "+",
                (false, false) => "-",
            };
            format!("{}{}:{}", marker, status.tier.name, status.tier.required_points)
        })
        .collect();
    println!("  ladder: {}", ladder.join(" "));
}
