use std::path::Path;

use ash::vk;
use serde::{Deserialize, Serialize};

use crate::error::{GfxError, GfxResult};
use crate::pipelines::graphics_pipeline::GfxGraphicsPipelineCreateInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GfxTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
    TriangleFan,
}
impl From<GfxTopology> for vk::PrimitiveTopology {
    fn from(value: GfxTopology) -> Self {
        match value {
            GfxTopology::PointList => vk::PrimitiveTopology::POINT_LIST,
            GfxTopology::LineList => vk::PrimitiveTopology::LINE_LIST,
            GfxTopology::LineStrip => vk::PrimitiveTopology::LINE_STRIP,
            GfxTopology::TriangleList => vk::PrimitiveTopology::TRIANGLE_LIST,
            GfxTopology::TriangleStrip => vk::PrimitiveTopology::TRIANGLE_STRIP,
            GfxTopology::TriangleFan => vk::PrimitiveTopology::TRIANGLE_FAN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GfxCullMode {
    None,
    Front,
    Back,
    FrontAndBack,
}
impl From<GfxCullMode> for vk::CullModeFlags {
    fn from(value: GfxCullMode) -> Self {
        match value {
            GfxCullMode::None => vk::CullModeFlags::NONE,
            GfxCullMode::Front => vk::CullModeFlags::FRONT,
            GfxCullMode::Back => vk::CullModeFlags::BACK,
            GfxCullMode::FrontAndBack => vk::CullModeFlags::FRONT_AND_BACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GfxFrontFace {
    Clockwise,
    CounterClockwise,
}
impl From<GfxFrontFace> for vk::FrontFace {
    fn from(value: GfxFrontFace) -> Self {
        match value {
            GfxFrontFace::Clockwise => vk::FrontFace::CLOCKWISE,
            GfxFrontFace::CounterClockwise => vk::FrontFace::COUNTER_CLOCKWISE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GfxCompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}
impl From<GfxCompareOp> for vk::CompareOp {
    fn from(value: GfxCompareOp) -> Self {
        match value {
            GfxCompareOp::Never => vk::CompareOp::NEVER,
            GfxCompareOp::Less => vk::CompareOp::LESS,
            GfxCompareOp::Equal => vk::CompareOp::EQUAL,
            GfxCompareOp::LessOrEqual => vk::CompareOp::LESS_OR_EQUAL,
            GfxCompareOp::Greater => vk::CompareOp::GREATER,
            GfxCompareOp::NotEqual => vk::CompareOp::NOT_EQUAL,
            GfxCompareOp::GreaterOrEqual => vk::CompareOp::GREATER_OR_EQUAL,
            GfxCompareOp::Always => vk::CompareOp::ALWAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GfxDynamicState {
    Viewport,
    Scissor,
    LineWidth,
    DepthBias,
    BlendConstants,
    DepthBounds,
    StencilReference,
}
impl From<GfxDynamicState> for vk::DynamicState {
    fn from(value: GfxDynamicState) -> Self {
        match value {
            GfxDynamicState::Viewport => vk::DynamicState::VIEWPORT,
            GfxDynamicState::Scissor => vk::DynamicState::SCISSOR,
            GfxDynamicState::LineWidth => vk::DynamicState::LINE_WIDTH,
            GfxDynamicState::DepthBias => vk::DynamicState::DEPTH_BIAS,
            GfxDynamicState::BlendConstants => vk::DynamicState::BLEND_CONSTANTS,
            GfxDynamicState::DepthBounds => vk::DynamicState::DEPTH_BOUNDS,
            GfxDynamicState::StencilReference => vk::DynamicState::STENCIL_REFERENCE,
        }
    }
}

/// 可以从 TOML 文件加载的管线固定功能配置
///
/// 未出现的字段使用默认值，与 [`GfxGraphicsPipelineCreateInfo::default`] 一致
///
/// ```toml
/// topology = "triangle_list"
/// cull_mode = "none"
/// depth_write = false
/// blend_enable = true
/// dynamic_states = ["viewport", "scissor"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GfxPipelineConfig {
    pub topology: GfxTopology,
    pub cull_mode: GfxCullMode,
    pub front_face: GfxFrontFace,
    pub depth_test: bool,
    pub depth_write: bool,
    pub depth_compare_op: GfxCompareOp,
    /// 常规的 alpha 混合
    pub blend_enable: bool,
    pub dynamic_states: Vec<GfxDynamicState>,
}
impl Default for GfxPipelineConfig {
    fn default() -> Self {
        Self {
            topology: GfxTopology::TriangleList,
            cull_mode: GfxCullMode::Back,
            front_face: GfxFrontFace::CounterClockwise,
            depth_test: true,
            depth_write: true,
            depth_compare_op: GfxCompareOp::Less,
            blend_enable: false,
            dynamic_states: vec![],
        }
    }
}
// new & init
impl GfxPipelineConfig {
    /// `path` 仅用于错误信息
    pub fn from_toml_str(content: &str, path: &Path) -> GfxResult<Self> {
        toml::from_str(content).map_err(|e| GfxError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> GfxResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GfxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        log::info!("load pipeline config {:?}: {:?}", path, config);
        Ok(config)
    }
}
// tools
impl GfxPipelineConfig {
    /// 将配置写入 create info，shader stage、viewport 等其他字段保持不变
    pub fn apply(&self, ci: &mut GfxGraphicsPipelineCreateInfo) {
        ci.topology(self.topology.into())
            .cull_mode(self.cull_mode.into(), self.front_face.into())
            .depth_test(self.depth_test.then_some(self.depth_compare_op.into()), self.depth_write)
            .dynamic_states(self.dynamic_states.iter().map(|&state| state.into()).collect());

        if self.blend_enable {
            ci.alpha_blend();
        } else {
            ci.color_blend(
                vk::PipelineColorBlendAttachmentState::default()
                    .blend_enable(false)
                    .color_write_mask(vk::ColorComponentFlags::RGBA),
            );
        }
    }
}
impl From<&GfxPipelineConfig> for GfxGraphicsPipelineCreateInfo {
    fn from(config: &GfxPipelineConfig) -> Self {
        let mut ci = GfxGraphicsPipelineCreateInfo::default();
        config.apply(&mut ci);
        ci
    }
}
