use std::path::PathBuf;

/// Well-known install locations of a Chrome/Chromium binary, tried in order
/// before falling back to the automation library's own discovery.
///
/// Paths that don't exist on the current machine are skipped at launch time.
pub fn get_local_browser_paths() -> Vec<PathBuf> {
    [
        "/usr/local/bin/chromium",
        "/opt/homebrew/bin/chromium",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/bin/google-chrome",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}
