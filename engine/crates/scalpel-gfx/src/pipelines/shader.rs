use std::ffi::CStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ash::vk;

use crate::error::{GfxError, GfxResult};
use crate::foundation::device::GfxDevice;

/// 一个 shader stage 的描述：stage 类型、SPIR-V 文件路径、入口函数
#[derive(Clone, Debug)]
pub struct GfxShaderStageInfo {
    pub stage: vk::ShaderStageFlags,
    pub entry_point: &'static CStr,
    pub path: PathBuf,
}
impl GfxShaderStageInfo {
    #[inline]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

/// 从文件中读取 SPIR-V，并转换为 u32 words
///
/// - 文件无法打开或读取：[`GfxError::Io`]
/// - 字节数不是 4 的倍数，或者 magic number 不正确：[`GfxError::Reflection`]
pub fn load_shader_code(path: &Path) -> GfxResult<Vec<u32>> {
    let bytes = std::fs::read(path).map_err(|source| {
        log::error!("Failed to load shader: {:?}", path);
        GfxError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    spirv_words_from_bytes(&bytes).map_err(|e| GfxError::reflection(path.to_string_lossy(), e.to_string()))
}

/// 字节流转换为 SPIR-V words，处理大小端
pub fn spirv_words_from_bytes(bytes: &[u8]) -> std::io::Result<Vec<u32>> {
    ash::util::read_spv(&mut std::io::Cursor::new(bytes))
}

/// shader module 的 RAII 封装
///
/// 只在 pipeline 的构建过程中短暂存在，离开作用域（包括出错提前返回）时销毁
pub struct GfxShaderModule {
    handle: vk::ShaderModule,
    device: Arc<dyn GfxDevice>,
}
impl GfxShaderModule {
    pub fn new(device: Arc<dyn GfxDevice>, code: &[u32], debug_name: &str) -> GfxResult<Self> {
        let handle = device.create_shader_module(code, debug_name)?;
        Ok(Self { handle, device })
    }

    #[inline]
    pub fn handle(&self) -> vk::ShaderModule {
        self.handle
    }
}
impl Drop for GfxShaderModule {
    fn drop(&mut self) {
        self.device.destroy_shader_module(self.handle);
    }
}
