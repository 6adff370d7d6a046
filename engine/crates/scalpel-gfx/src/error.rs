use std::path::PathBuf;

use ash::vk;

/// GFX 层可恢复的错误
///
/// 所有错误对于当前的构建调用都是致命的：不会自动重试，也不会回退。
/// 前置条件的违反（例如 render target 没有 image view）属于编程错误，直接 panic，不在此列。
#[derive(Debug, thiserror::Error)]
pub enum GfxError {
    /// shader 或配置文件无法打开或读取
    #[error("failed to read file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// shader 二进制格式错误，或者包含无法反射的类型
    #[error("failed to reflect shader `{shader}`: {reason}")]
    Reflection { shader: String, reason: String },

    /// 设备拒绝创建对象（layout、pipeline、render pass、framebuffer、pool、set）
    #[error("device rejected {what}: {result}")]
    DeviceResource { what: &'static str, result: vk::Result },

    /// 管线配置文件无法解析
    #[error("invalid pipeline config `{path}`: {reason}")]
    Config { path: PathBuf, reason: String },
}

pub type GfxResult<T> = Result<T, GfxError>;

impl GfxError {
    #[inline]
    pub fn reflection(shader: impl AsRef<str>, reason: impl Into<String>) -> Self {
        Self::Reflection {
            shader: shader.as_ref().to_string(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn device(what: &'static str, result: vk::Result) -> Self {
        Self::DeviceResource { what, result }
    }
}
