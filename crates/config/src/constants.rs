//! Built-in defaults shared by the config layers

/// Public Visual Studio Marketplace gallery API root
pub const DEFAULT_GALLERY_URL: &str = "https://marketplace.visualstudio.com/_apis/public/gallery";

/// User agent the marketplace has historically accepted for offline downloads
pub const DEFAULT_USER_AGENT: &str = "Offline VSIX/1.0";

pub const DEFAULT_DOWNLOAD_DIR: &str = "./vscode-vsix";

/// Worker pool size; small to stay within the catalog's rate tolerance
pub const DEFAULT_JOBS: usize = 4;
pub const MAX_JOBS: usize = 32;

pub const CONFIG_DIR_NAME: &str = "vsixget";
pub const CONFIG_FILE_NAME: &str = "config.toml";
