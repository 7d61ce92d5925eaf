// ==========================================
// 商品目录导入系统 - 命令行入口
// ==========================================
// 用法:
//   catalog-import file ./price.xlsx
//   catalog-import sheet https://docs.google.com/spreadsheets/d/<id>/edit#gid=0
//   catalog-import list --limit 20
// ==========================================

use anyhow::{Context, Result};
use catalog_import::api::{ImportApi, ImportRequest};
use catalog_import::{db, i18n, logging};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-import")]
#[command(version, about = "Импорт каталога товаров из Excel / CSV / Google Sheets")]
struct Args {
    /// SQLite 数据库路径（默认: CATALOG_IMPORT_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 消息语言（ru / en）
    #[arg(long, global = true, default_value = "ru")]
    lang: String,

    /// JSON 格式日志
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 导入本地文件（.xlsx / .xls / .csv）
    File {
        path: PathBuf,
        /// 声明的 MIME 类型（模拟上传时校验）
        #[arg(long)]
        mime: Option<String>,
    },
    /// 导入远程表格（表格 ID 或分享链接）
    Sheet { reference: String },
    /// 分页列出已导入商品
    List {
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.json_log);
    i18n::set_locale(&args.lang);

    let db_path = args.db.clone().unwrap_or_else(db::default_db_path);
    tracing::info!(version = catalog_import::VERSION, db_path = %db_path, "{}", catalog_import::APP_NAME);

    let api = ImportApi::new(db_path);

    let request = match args.command {
        Command::List { limit, offset } => {
            let products = api.list_products(limit, offset).await?;
            println!("{}", serde_json::to_string_pretty(&products)?);
            return Ok(());
        }
        Command::File { path, mime } => {
            let bytes = std::fs::read(&path).with_context(|| {
                i18n::t_with_args("import.file_not_found", &[("path", &path.display().to_string())])
            })?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            ImportRequest::File {
                bytes,
                filename,
                mime_type: mime,
            }
        }
        Command::Sheet { reference } => ImportRequest::Remote {
            identifier_or_url: reference,
        },
    };

    // Ctrl-C 取消: 丢弃导入 future（已落库的行不回滚）
    tokio::select! {
        result = api.import_products(request) => {
            let response = result?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("{}", i18n::t("import.cancelled"));
            std::process::exit(130);
        }
    }

    Ok(())
}
