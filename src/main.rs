use clap::Parser;
use dupfind::core::report;
use dupfind::core::{ConfigProvider, Pipeline};
use dupfind::utils::{logger, validation::Validate};
use dupfind::{
    CliConfig, DuplicatePipeline, DuplicateReport, LocalFileSystem, ReportFormat, ScanEngine,
    TomlConfig,
};
use std::future::Future;
use std::time::Instant;

const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting dupfind");
    tracing::debug!("CLI config: {:?}", cli);

    let exit_code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config.with_overrides(&cli).with_default_root(),
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            let monitor_enabled = config.monitoring_enabled();
            execute(config, monitor_enabled).await
        }
        None => {
            let monitor_enabled = cli.monitor;
            execute(cli.with_default_root(), monitor_enabled).await
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn execute<C: ConfigProvider + Validate + 'static>(config: C, monitor_enabled: bool) -> i32 {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return 1;
    }

    let format = config.report_format();
    let text_stdout = format == ReportFormat::Text || config.output_path().is_some();

    if text_stdout {
        println!(
            "[root={}, delete={}]",
            config.root().display(),
            config.delete()
        );
    }
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let time_start = Instant::now();

    let pipeline = match DuplicatePipeline::new(LocalFileSystem::new(), config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            return e.exit_code().max(1);
        }
    };
    let engine = ScanEngine::new_with_monitoring(pipeline, monitor_enabled).quiet(!text_stdout);

    let exit_code = run_scan(&engine, format, text_stdout, interrupted()).await;

    if text_stdout {
        println!("Done, took={:.2} seconds", time_start.elapsed().as_secs_f64());
    }

    exit_code
}

/// Runs the scan until it finishes or `interrupt` resolves, prints the
/// report and returns the process exit code.
async fn run_scan<P: Pipeline>(
    engine: &ScanEngine<P>,
    format: ReportFormat,
    text_stdout: bool,
    interrupt: impl Future<Output = ()>,
) -> i32 {
    tokio::select! {
        biased;
        _ = interrupt => {
            println!("Interrupted!");
            EXIT_INTERRUPTED
        }
        result = engine.run() => match result {
            Ok(report) => print_report(&report, format, text_stdout),
            Err(e) => {
                // 記錄詳細錯誤信息
                tracing::error!(
                    "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

                e.exit_code()
            }
        },
    }
}

fn print_report(report: &DuplicateReport, format: ReportFormat, text_stdout: bool) -> i32 {
    let rendered = if text_stdout {
        Ok(report::render_text(report))
    } else {
        report::render(report, format)
    };

    match rendered {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            return e.exit_code().max(1);
        }
    }

    // 報告已輸出，但存檔失敗仍要反映在結束碼
    match &report.save_error {
        Some(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            e.exit_code()
        }
        None => 0,
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
