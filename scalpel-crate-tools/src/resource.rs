use std::path::{Path, PathBuf};

/// 统一资源路径管理
///
/// 所有路径基于工作区根目录（通过 `CARGO_MANIFEST_DIR` 推导）。
///
/// # 使用示例
/// ```ignore
/// let vert = ScalpelPath::shader_path("triangle/triangle.vert"); // shader/.build/triangle/triangle.vert.spv
/// let config = ScalpelPath::config_path("opaque.toml");        // config/opaque.toml
/// ```
pub struct ScalpelPath;
impl ScalpelPath {
    /// 获取工作区根目录
    pub fn workspace_path() -> PathBuf {
        // scalpel-crate-tools 直接位于 workspace 根目录下
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
    }

    /// shader 的根目录：`shader/`
    pub fn shader_root_path() -> PathBuf {
        Self::workspace_path().join("shader")
    }

    /// 编译后的 SPIR-V 文件路径：`shader/.build/<name>.spv`
    pub fn shader_path(name: &str) -> PathBuf {
        let mut file_name = Self::shader_root_path().join(".build").join(name).into_os_string();
        file_name.push(".spv");
        PathBuf::from(file_name)
    }

    /// 管线配置文件路径：`config/<name>`
    pub fn config_path(name: &str) -> PathBuf {
        Self::workspace_path().join("config").join(name)
    }
}
