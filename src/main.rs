// ==========================================
// D.O.A 退货处置系统 - 命令行入口
// ==========================================
// 用法: doa-disposition [导入文件.csv|.xlsx] [--export 导出文件.csv]
// 加载配置 → 可选批量导入 → 输出看板汇总
// ==========================================

use anyhow::{bail, Context};
use doa_disposition::app::{get_default_config_path, AppState};
use doa_disposition::config::ConfigManager;
use doa_disposition::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", doa_disposition::APP_NAME);
    tracing::info!("系统版本: {}", doa_disposition::VERSION);
    tracing::info!("==================================================");

    let mut import_path: Option<String> = None;
    let mut export_path: Option<String> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export" => match args.next() {
                Some(path) => export_path = Some(path),
                None => bail!("--export 需要文件路径"),
            },
            _ if import_path.is_none() => import_path = Some(arg),
            _ => bail!("无法识别的参数: {}", arg),
        }
    }

    tracing::info!("配置文件: {}", get_default_config_path().display());
    let config = ConfigManager::load_default().context("加载配置失败")?;
    let state = AppState::new(config).context("初始化AppState失败")?;

    if let Some(path) = import_path {
        let response = state
            .import_api
            .import_file(&path)
            .with_context(|| format!("导入文件失败: {}", path))?;
        let report = &response.report;
        println!(
            "导入完成: 共 {} 行, 成功 {}, 失败 {} ({} ms)",
            report.total_rows,
            report.success_count(),
            report.failure_count(),
            response.elapsed_ms
        );
        for failure in &report.failures {
            println!("  行 {}: {}", failure.row, failure.reason);
        }
    }

    let overview = state.dashboard_api.overview()?;
    println!(
        "退货总数 {} | 送修中 {} | 待清仓 {} | 已处置 {}",
        overview.total, overview.at_service, overview.in_clearance, overview.finished
    );

    for (status, count) in state.dashboard_api.count_by_status()? {
        println!("  {:<16} {}", status.label(), count);
    }

    if let Some(path) = export_path {
        let written = state.import_api.export_csv(&path, "")?;
        println!("已导出 {} 条记录到 {}", written, path);
    }

    Ok(())
}
