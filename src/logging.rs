//! 结构化日志初始化。浏览器里写到 `console`，其他平台写到 stderr。
//!
//! 可以重复调用，只有第一次生效；已有全局 subscriber 时静默跳过。

use once_cell::sync::OnceCell;
use tracing::Level;
use tracing_subscriber::fmt;

static INITIALIZED: OnceCell<()> = OnceCell::new();

pub fn init_console_logging() {
    init_with_level(Level::INFO);
}

pub fn init_with_level(level: Level) {
    INITIALIZED.get_or_init(|| {
        fmt()
            .with_max_level(level)
            .with_writer(console::ConsoleMakeWriter)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .try_init()
            .ok();
    });
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;

    pub struct ConsoleMakeWriter;

    /// 缓冲一条格式化好的事件，drop 时按级别写到对应的 console 方法。
    pub struct ConsoleWriter {
        level: Level,
        buffer: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            if self.buffer.is_empty() {
                return;
            }
            let line = String::from_utf8_lossy(&self.buffer);
            let message = wasm_bindgen::JsValue::from_str(line.trim_end());
            match self.level {
                Level::ERROR => web_sys::console::error_1(&message),
                Level::WARN => web_sys::console::warn_1(&message),
                Level::INFO => web_sys::console::info_1(&message),
                _ => web_sys::console::debug_1(&message),
            }
        }
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter {
                level: Level::INFO,
                buffer: Vec::new(),
            }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter {
                level: *meta.level(),
                buffer: Vec::new(),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod console {
    use std::io;

    use tracing_subscriber::fmt::MakeWriter;

    pub struct ConsoleMakeWriter;

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = io::Stderr;

        fn make_writer(&'a self) -> Self::Writer {
            io::stderr()
        }
    }
}
