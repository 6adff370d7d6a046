use ash::vk;

/// 标量的数值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GfxScalarKind {
    Float,
    Sint,
    Uint,
}

/// 根据分量的类型、位宽和数量得到对应的 vertex attribute format
///
/// 只支持 1~4 个分量，位宽为 16、32、64
pub fn vertex_format(kind: GfxScalarKind, width: u32, component_cnt: u32) -> Option<vk::Format> {
    use vk::Format as F;

    let formats: [F; 4] = match (kind, width) {
        (GfxScalarKind::Float, 16) => [F::R16_SFLOAT, F::R16G16_SFLOAT, F::R16G16B16_SFLOAT, F::R16G16B16A16_SFLOAT],
        (GfxScalarKind::Float, 32) => [F::R32_SFLOAT, F::R32G32_SFLOAT, F::R32G32B32_SFLOAT, F::R32G32B32A32_SFLOAT],
        (GfxScalarKind::Float, 64) => [F::R64_SFLOAT, F::R64G64_SFLOAT, F::R64G64B64_SFLOAT, F::R64G64B64A64_SFLOAT],
        (GfxScalarKind::Sint, 16) => [F::R16_SINT, F::R16G16_SINT, F::R16G16B16_SINT, F::R16G16B16A16_SINT],
        (GfxScalarKind::Sint, 32) => [F::R32_SINT, F::R32G32_SINT, F::R32G32B32_SINT, F::R32G32B32A32_SINT],
        (GfxScalarKind::Sint, 64) => [F::R64_SINT, F::R64G64_SINT, F::R64G64B64_SINT, F::R64G64B64A64_SINT],
        (GfxScalarKind::Uint, 16) => [F::R16_UINT, F::R16G16_UINT, F::R16G16B16_UINT, F::R16G16B16A16_UINT],
        (GfxScalarKind::Uint, 32) => [F::R32_UINT, F::R32G32_UINT, F::R32G32B32_UINT, F::R32G32B32A32_UINT],
        (GfxScalarKind::Uint, 64) => [F::R64_UINT, F::R64G64_UINT, F::R64G64B64_UINT, F::R64G64B64A64_UINT],
        _ => return None,
    };

    match component_cnt {
        1..=4 => Some(formats[component_cnt as usize - 1]),
        _ => None,
    }
}

/// 一个 texel（或者一个 vertex attribute）占用的字节数
///
/// 覆盖 vertex attribute 可能出现的 format，以及常见的 color/depth attachment format
pub fn format_byte_size(format: vk::Format) -> Option<u32> {
    use vk::Format as F;

    let size = match format {
        F::R8_UNORM | F::R8_SNORM | F::R8_UINT | F::R8_SINT | F::R8_SRGB | F::S8_UINT => 1,

        F::R8G8_UNORM | F::R8G8_SNORM | F::R8G8_UINT | F::R8G8_SINT | F::R8G8_SRGB => 2,
        F::R16_UNORM | F::R16_SNORM | F::R16_UINT | F::R16_SINT | F::R16_SFLOAT | F::D16_UNORM => 2,

        F::R8G8B8_UNORM | F::R8G8B8_SNORM | F::R8G8B8_UINT | F::R8G8B8_SINT | F::R8G8B8_SRGB => 3,
        F::D16_UNORM_S8_UINT => 3,

        F::R8G8B8A8_UNORM | F::R8G8B8A8_SNORM | F::R8G8B8A8_UINT | F::R8G8B8A8_SINT | F::R8G8B8A8_SRGB => 4,
        F::B8G8R8A8_UNORM | F::B8G8R8A8_SRGB | F::A2B10G10R10_UNORM_PACK32 | F::B10G11R11_UFLOAT_PACK32 => 4,
        F::R16G16_UNORM | F::R16G16_SNORM | F::R16G16_UINT | F::R16G16_SINT | F::R16G16_SFLOAT => 4,
        F::R32_UINT | F::R32_SINT | F::R32_SFLOAT => 4,
        F::D32_SFLOAT | F::D24_UNORM_S8_UINT | F::X8_D24_UNORM_PACK32 => 4,

        F::R16G16B16_UNORM | F::R16G16B16_SNORM | F::R16G16B16_UINT | F::R16G16B16_SINT | F::R16G16B16_SFLOAT => 6,

        F::R16G16B16A16_UNORM
        | F::R16G16B16A16_SNORM
        | F::R16G16B16A16_UINT
        | F::R16G16B16A16_SINT
        | F::R16G16B16A16_SFLOAT => 8,
        F::R32G32_UINT | F::R32G32_SINT | F::R32G32_SFLOAT => 8,
        F::R64_UINT | F::R64_SINT | F::R64_SFLOAT => 8,
        // depth 32 + stencil 8，实际存储时按 8 字节对齐
        F::D32_SFLOAT_S8_UINT => 8,

        F::R32G32B32_UINT | F::R32G32B32_SINT | F::R32G32B32_SFLOAT => 12,

        F::R32G32B32A32_UINT | F::R32G32B32A32_SINT | F::R32G32B32A32_SFLOAT => 16,
        F::R64G64_UINT | F::R64G64_SINT | F::R64G64_SFLOAT => 16,

        F::R64G64B64_UINT | F::R64G64B64_SINT | F::R64G64B64_SFLOAT => 24,

        F::R64G64B64A64_UINT | F::R64G64B64A64_SINT | F::R64G64B64A64_SFLOAT => 32,

        _ => return None,
    };
    Some(size)
}
