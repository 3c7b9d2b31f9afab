// ==========================================
// 商品目录导入 - 命令行入口
// ==========================================
// 用法:
//   product-catalog-import [--db <path>] [--json] [--set key=value]... <file>...
//
// 每个文件输出一行结果；任一文件未成功导入时以非零状态退出
// ==========================================

use anyhow::{bail, Context, Result};
use product_catalog_import::db::get_default_db_path;
use product_catalog_import::logging::{self, LogFormat};
use product_catalog_import::{ImportApi, ImportStatus};
use std::process::ExitCode;

#[derive(Debug, Default)]
struct CliArgs {
    db_path: Option<String>,
    json: bool,
    settings: Vec<(String, String)>,
    files: Vec<String>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<CliArgs> {
    let mut cli = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let path = args.next().context("--db 需要数据库路径")?;
                cli.db_path = Some(path);
            }
            "--json" => cli.json = true,
            "--set" => {
                let pair = args.next().context("--set 需要 key=value")?;
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("--set 参数格式错误: {}", pair))?;
                cli.settings.push((key.trim().to_string(), value.to_string()));
            }
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            _ => cli.files.push(arg),
        }
    }

    if cli.files.is_empty() {
        bail!(
            "用法: product-catalog-import [--db <path>] [--json] [--set key=value]... <file>..."
        );
    }
    Ok(cli)
}

async fn run(cli: CliArgs) -> Result<bool> {
    let db_path = cli.db_path.unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let api = ImportApi::open(&db_path).context("无法打开数据库")?;
    for (key, value) in &cli.settings {
        api.set_config(key, value)
            .with_context(|| format!("配置写入失败: {}", key))?;
    }

    let responses = api.import_paths(&cli.files).await?;

    let mut all_success = true;
    for (file, response) in cli.files.iter().zip(&responses) {
        all_success &= response.status == ImportStatus::Success;
        if cli.json {
            let mut value = serde_json::to_value(response)?;
            value["file"] = serde_json::Value::String(file.clone());
            println!("{}", value);
        } else {
            println!("{}: {}", file, response.message);
        }
    }
    Ok(all_success)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    logging::init_with_format(if cli.json { LogFormat::Json } else { LogFormat::Text });
    tracing::info!(
        "{} v{}",
        product_catalog_import::APP_NAME,
        product_catalog_import::VERSION
    );

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "导入中止");
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
