use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 指定 Chrome 執行檔的環境變數
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

/// 隨程式附帶的瀏覽器，相對於執行檔所在目錄
pub const BUNDLED_CHROME: &str = "drivers/chrome";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Chrome executable to launch. Resolved once by [`BrowserSettings::resolve`].
    pub executable: Option<PathBuf>,
    /// DevTools endpoint of an already running, signed-in browser
    /// (`ws://...` or `http://host:port`). Takes precedence over launching.
    pub ws_endpoint: Option<String>,
    pub headless: bool,
    /// 重用已登入的瀏覽器設定檔
    pub user_data_dir: Option<PathBuf>,
}

impl BrowserSettings {
    /// Fill in `executable` from, in order: the explicit value, `CHROME_PATH`,
    /// the bundled `drivers/chrome` next to the running binary. Leaves it
    /// unset when none applies so the CDP layer can auto-detect Chrome.
    pub fn resolve(mut self) -> Self {
        let env_value = std::env::var(CHROME_PATH_ENV).ok();
        let bundled = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(BUNDLED_CHROME)));
        self.executable = resolve_executable(self.executable.take(), env_value, bundled.as_deref());
        self
    }

    /// 要連線的既有瀏覽器；空白的 endpoint 視為未設定
    pub fn existing_endpoint(&self) -> Option<&str> {
        self.ws_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }
}

pub fn resolve_executable(
    explicit: Option<PathBuf>,
    env_value: Option<String>,
    bundled: Option<&Path>,
) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    if let Some(path) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    bundled.filter(|p| p.exists()).map(Path::to_path_buf)
}
