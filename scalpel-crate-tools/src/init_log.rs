use std::io::Write;

use anstyle::{AnsiColor, Color, RgbColor, Style};

/// 日志等级对应的颜色
fn level_style(level: log::Level) -> Style {
    let color = match level {
        log::Level::Error => AnsiColor::Red,
        log::Level::Warn => AnsiColor::Yellow,
        log::Level::Info => AnsiColor::Green,
        log::Level::Debug => AnsiColor::Blue,
        log::Level::Trace => AnsiColor::Magenta,
    };
    Style::new().bold().fg_color(Some(Color::Ansi(color)))
}

/// 初始化全局 logger
///
/// 默认等级为 `Info`，可以通过 `RUST_LOG` 环境变量覆盖，例如 `RUST_LOG=scalpel_gfx=debug`
///
/// 输出格式：`[时间] 等级 [文件:行号] 消息`
pub fn init_log() {
    let env = env_logger::Env::default().default_filter_or("info");
    let origin_style = Style::new().fg_color(Some(Color::Rgb(RgbColor(110, 110, 110))));

    let result = env_logger::Builder::from_env(env)
        .format(move |buf, record| {
            let level_style = level_style(record.level());

            // windows 下的路径分隔符是 '\'
            let file = record.file().unwrap_or("").rsplit(['/', '\\']).next().unwrap_or("");
            let line = record.line().unwrap_or(0);
            let time = chrono::Local::now().format("%H:%M:%S%.3f");

            writeln!(
                buf,
                "[{time}] {level_style}{:<5}{level_style:#} {origin_style}[{file}:{line}]{origin_style:#} {}",
                record.level(),
                record.args()
            )
        })
        .try_init();

    // 测试中可能会被多次调用
    if let Err(e) = result {
        log::debug!("logger already initialized: {e}");
    }
}
