use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
mod catalog;
mod config;
mod error;
mod events;
mod services;
mod switcher;
mod utils;

use config::Config;
use services::{create_keyboard_listener, create_window_service, serve_hotkey, WindowCatalogClient};
use switcher::{FlashTimer, LogPresenter, Presenter, SwitcherController};

/// Ёмкость очереди ShowWindow + нажатий
const EVENT_QUEUE: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "tabfix-switcher")]
#[command(about = "Переключатель окон: ShowWindow по D-Bus, выбор окна двухбуквенным кодом")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "tabfix.toml")]
    config: String,

    /// Режим сухого запуска (фиктивный список окон, без устройств ввода)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает значение из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    let config = Arc::new(config);

    init_tracing(&config.logging.level, &config.logging.format)?;

    info!("Запуск tabfix-switcher v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - сервис окон и клавиатура эмулируются");
    } else {
        utils::permissions::check_permissions()?;
    }

    let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE);

    // В сухом режиме шина может отсутствовать, это не повод останавливаться
    let connection = match serve_hotkey(&config.hotkey, events_tx.clone()).await {
        Ok(connection) => Some(connection),
        Err(e) if args.dry_run => {
            warn!("Сервис горячей клавиши недоступен в dry-run: {}", e);
            None
        }
        Err(e) => return Err(e.into()),
    };

    let window_service = create_window_service(&config.service, connection.as_ref(), args.dry_run).await?;
    let client = WindowCatalogClient::new(
        window_service,
        config.catalog.shell_class.clone(),
        config.service.call_timeout(),
    );

    let presenter: Arc<dyn Presenter> = Arc::new(LogPresenter::new());
    let flash = FlashTimer::new(presenter.clone(), config.feedback.flash_duration());
    let controller = SwitcherController::new(client, presenter, flash);

    let keyboard_listener = create_keyboard_listener(
        config.clone(),
        events_tx,
        controller.subscribe_visibility(),
        args.dry_run,
    )?;

    info!("Все компоненты инициализированы");

    let controller_handle = tokio::spawn(controller.run(events_rx));
    let keyboard_handle = tokio::spawn(async move {
        if let Err(e) = keyboard_listener.run().await {
            error!("Ошибка в KeyboardListener: {}", e);
        }
    });

    info!("Ожидаем ShowWindow");

    match signal::ctrl_c().await {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
    }

    info!("Завершение работы...");

    // Прерываем задачи; Drop слушателя отпускает захваченную клавиатуру
    controller_handle.abort();
    keyboard_handle.abort();

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = controller_handle.await;
        let _ = keyboard_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    // Освобождаем имя на шине последним
    drop(connection);

    info!("tabfix-switcher завершил работу");
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }

    Ok(())
}
