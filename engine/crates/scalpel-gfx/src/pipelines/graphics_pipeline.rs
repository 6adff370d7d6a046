use std::ffi::{CStr, CString};
use std::path::PathBuf;
use std::sync::Arc;

use ash::vk;

use crate::descriptors::descriptor_layout::{GfxDescriptorBinding, GfxDescriptorSetLayout, merge_descriptor_bindings};
use crate::descriptors::descriptor_pool::{GfxDescriptorData, GfxDescriptorPool};
use crate::error::GfxResult;
use crate::foundation::device::GfxDevice;
use crate::pipelines::reflection::GfxShaderReflection;
use crate::pipelines::shader::{GfxShaderModule, GfxShaderStageInfo, load_shader_code};
use crate::pipelines::vertex_input::GfxVertexInputLayout;
use crate::render_pass::pass::GfxRenderPass;

/// 一个 shader stage 在 pipeline 中的信息
#[derive(Debug, Clone)]
pub struct GfxPipelineStageDesc {
    pub stage: vk::ShaderStageFlags,
    pub module: vk::ShaderModule,
    pub entry_point: CString,
}

/// 传递给 [`GfxDevice::create_graphics_pipeline`] 的完整描述
///
/// 只有一个 viewport 和一个 scissor；multisample 固定为单采样
pub struct GfxGraphicsPipelineDesc {
    pub stages: Vec<GfxPipelineStageDesc>,
    /// `None` 表示不需要 vertex buffer
    pub vertex_input: Option<GfxVertexInputLayout>,
    pub topology: vk::PrimitiveTopology,
    pub primitive_restart: bool,

    pub viewport: vk::Viewport,
    pub scissor: vk::Rect2D,

    pub rasterization: vk::PipelineRasterizationStateCreateInfo<'static>,
    pub samples: vk::SampleCountFlags,
    pub depth_stencil: vk::PipelineDepthStencilStateCreateInfo<'static>,

    /// 与 render pass 的 color attachment 一一对应
    pub color_blend_attachments: Vec<vk::PipelineColorBlendAttachmentState>,
    pub logic_op: Option<vk::LogicOp>,
    pub blend_constants: [f32; 4],

    /// 为空时不设置 dynamic state
    pub dynamic_states: Vec<vk::DynamicState>,

    pub layout: vk::PipelineLayout,
    pub render_pass: vk::RenderPass,
    pub subpass: u32,
}

/// 创建 graphics pipeline 的配置
///
/// 由调用者持有，在 [`GfxGraphicsPipeline::new`] 时以引用的方式传入
pub struct GfxGraphicsPipelineCreateInfo {
    vertex_stage: Option<GfxShaderStageInfo>,
    fragment_stage: Option<GfxShaderStageInfo>,

    primitive_topology: vk::PrimitiveTopology,
    primitive_restart: bool,

    /// `None` 表示使用 render pass 的 extent
    viewport: Option<vk::Viewport>,
    scissor: Option<vk::Rect2D>,

    rasterize_state_info: vk::PipelineRasterizationStateCreateInfo<'static>,

    depth_stencil_info: vk::PipelineDepthStencilStateCreateInfo<'static>,

    /// 应用于 render pass 的每一个 color attachment
    color_attach_blend_state: vk::PipelineColorBlendAttachmentState,
    blend_logic_op: Option<vk::LogicOp>,
    blend_constants: [f32; 4],

    dynamic_states: Vec<vk::DynamicState>,
}
impl Default for GfxGraphicsPipelineCreateInfo {
    fn default() -> Self {
        Self {
            vertex_stage: None,
            fragment_stage: None,

            primitive_topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            primitive_restart: false,

            viewport: None,
            scissor: None,

            rasterize_state_info: vk::PipelineRasterizationStateCreateInfo::default()
                .depth_clamp_enable(false)
                .rasterizer_discard_enable(false)
                .polygon_mode(vk::PolygonMode::FILL)
                .line_width(1.0)
                .cull_mode(vk::CullModeFlags::BACK)
                .front_face(vk::FrontFace::COUNTER_CLOCKWISE)
                .depth_bias_enable(false),

            depth_stencil_info: vk::PipelineDepthStencilStateCreateInfo::default()
                .depth_test_enable(true)
                .depth_write_enable(true)
                .depth_compare_op(vk::CompareOp::LESS)
                .depth_bounds_test_enable(false)
                .stencil_test_enable(false),

            color_attach_blend_state: vk::PipelineColorBlendAttachmentState::default()
                .blend_enable(false)
                .color_write_mask(vk::ColorComponentFlags::RGBA),
            blend_logic_op: None,
            blend_constants: [0.0; 4],

            dynamic_states: vec![],
        }
    }
}
/// builder
impl GfxGraphicsPipelineCreateInfo {
    #[inline]
    pub fn vertex_shader_stage(&mut self, path: impl Into<PathBuf>, entry_point: &'static CStr) -> &mut Self {
        self.vertex_stage = Some(GfxShaderStageInfo {
            stage: vk::ShaderStageFlags::VERTEX,
            entry_point,
            path: path.into(),
        });
        self
    }

    #[inline]
    pub fn fragment_shader_stage(&mut self, path: impl Into<PathBuf>, entry_point: &'static CStr) -> &mut Self {
        self.fragment_stage = Some(GfxShaderStageInfo {
            stage: vk::ShaderStageFlags::FRAGMENT,
            entry_point,
            path: path.into(),
        });
        self
    }

    #[inline]
    pub fn topology(&mut self, topology: vk::PrimitiveTopology) -> &mut Self {
        self.primitive_topology = topology;
        self
    }

    #[inline]
    pub fn primitive_restart(&mut self, enable: bool) -> &mut Self {
        self.primitive_restart = enable;
        self
    }

    #[inline]
    pub fn viewport(&mut self, viewport: vk::Viewport) -> &mut Self {
        self.viewport = Some(viewport);
        self
    }

    #[inline]
    pub fn scissor(&mut self, scissor: vk::Rect2D) -> &mut Self {
        self.scissor = Some(scissor);
        self
    }

    #[inline]
    pub fn polygon_mode(&mut self, polygon_mode: vk::PolygonMode) -> &mut Self {
        self.rasterize_state_info.polygon_mode = polygon_mode;
        self
    }

    #[inline]
    pub fn cull_mode(&mut self, cull_mode: vk::CullModeFlags, front_face: vk::FrontFace) -> &mut Self {
        self.rasterize_state_info.cull_mode = cull_mode;
        self.rasterize_state_info.front_face = front_face;
        self
    }

    #[inline]
    pub fn line_width(&mut self, line_width: f32) -> &mut Self {
        self.rasterize_state_info.line_width = line_width;
        self
    }

    #[inline]
    pub fn depth_test(&mut self, compare_op: Option<vk::CompareOp>, write: bool) -> &mut Self {
        self.depth_stencil_info.depth_test_enable = compare_op.is_some().into();
        self.depth_stencil_info.depth_compare_op = compare_op.unwrap_or(vk::CompareOp::ALWAYS);
        self.depth_stencil_info.depth_write_enable = write.into();
        self
    }

    /// `None` 表示关闭 depth bounds test
    #[inline]
    pub fn depth_bounds(&mut self, bounds: Option<(f32, f32)>) -> &mut Self {
        let (min, max) = bounds.unwrap_or((0.0, 1.0));
        self.depth_stencil_info.depth_bounds_test_enable = bounds.is_some().into();
        self.depth_stencil_info.min_depth_bounds = min;
        self.depth_stencil_info.max_depth_bounds = max;
        self
    }

    /// `None` 表示关闭 stencil test
    #[inline]
    pub fn stencil_test(&mut self, ops: Option<(vk::StencilOpState, vk::StencilOpState)>) -> &mut Self {
        let (front, back) = ops.unwrap_or_default();
        self.depth_stencil_info.stencil_test_enable = ops.is_some().into();
        self.depth_stencil_info.front = front;
        self.depth_stencil_info.back = back;
        self
    }

    #[inline]
    pub fn color_blend(&mut self, attach_state: vk::PipelineColorBlendAttachmentState) -> &mut Self {
        self.color_attach_blend_state = attach_state;
        self
    }

    /// 常规的 alpha 混合：`src * src_alpha + dst * (1 - src_alpha)`
    #[inline]
    pub fn alpha_blend(&mut self) -> &mut Self {
        self.color_attach_blend_state = vk::PipelineColorBlendAttachmentState::default()
            .blend_enable(true)
            .src_color_blend_factor(vk::BlendFactor::SRC_ALPHA)
            .dst_color_blend_factor(vk::BlendFactor::ONE_MINUS_SRC_ALPHA)
            .color_blend_op(vk::BlendOp::ADD)
            .src_alpha_blend_factor(vk::BlendFactor::ONE)
            .dst_alpha_blend_factor(vk::BlendFactor::ZERO)
            .alpha_blend_op(vk::BlendOp::ADD)
            .color_write_mask(vk::ColorComponentFlags::RGBA);
        self
    }

    /// logic op 启用时 blend 会被忽略
    #[inline]
    pub fn blend_logic_op(&mut self, logic_op: Option<vk::LogicOp>) -> &mut Self {
        self.blend_logic_op = logic_op;
        self
    }

    #[inline]
    pub fn blend_constants(&mut self, constants: [f32; 4]) -> &mut Self {
        self.blend_constants = constants;
        self
    }

    #[inline]
    pub fn dynamic_states(&mut self, dynamic_states: Vec<vk::DynamicState>) -> &mut Self {
        self.dynamic_states = dynamic_states;
        self
    }
}
// getters
impl GfxGraphicsPipelineCreateInfo {
    #[inline]
    pub fn vertex_stage(&self) -> Option<&GfxShaderStageInfo> {
        self.vertex_stage.as_ref()
    }

    #[inline]
    pub fn fragment_stage(&self) -> Option<&GfxShaderStageInfo> {
        self.fragment_stage.as_ref()
    }

    #[inline]
    pub fn primitive_topology(&self) -> vk::PrimitiveTopology {
        self.primitive_topology
    }

    #[inline]
    pub fn rasterize_state(&self) -> &vk::PipelineRasterizationStateCreateInfo<'static> {
        &self.rasterize_state_info
    }

    #[inline]
    pub fn depth_stencil_state(&self) -> &vk::PipelineDepthStencilStateCreateInfo<'static> {
        &self.depth_stencil_info
    }

    #[inline]
    pub fn color_blend_state(&self) -> &vk::PipelineColorBlendAttachmentState {
        &self.color_attach_blend_state
    }

    #[inline]
    pub fn dynamic_state_list(&self) -> &[vk::DynamicState] {
        &self.dynamic_states
    }
}

/// pipeline layout 的 RAII 封装，只引用一个 descriptor set layout，没有 push constant
pub struct GfxPipelineLayout {
    handle: vk::PipelineLayout,
    device: Arc<dyn GfxDevice>,
}
impl GfxPipelineLayout {
    pub fn new(
        device: Arc<dyn GfxDevice>,
        set_layouts: &[vk::DescriptorSetLayout],
        debug_name: &str,
    ) -> GfxResult<Self> {
        let handle = device.create_pipeline_layout(set_layouts, debug_name)?;
        Ok(Self { handle, device })
    }

    #[inline]
    pub fn handle(&self) -> vk::PipelineLayout {
        self.handle
    }
}
impl Drop for GfxPipelineLayout {
    fn drop(&mut self) {
        self.device.destroy_pipeline_layout(self.handle);
    }
}

/// graphics pipeline，以及由 shader 反射得到的 layout
///
/// 独占 pipeline、pipeline layout、descriptor set layout；销毁顺序与创建顺序相反。
/// 依赖创建时使用的 render pass，需要在 render pass 销毁之前销毁
pub struct GfxGraphicsPipeline {
    handle: vk::Pipeline,

    // 字段的 drop 顺序即声明顺序
    layout: GfxPipelineLayout,
    descriptor_set_layout: GfxDescriptorSetLayout,

    descriptor_bindings: Vec<GfxDescriptorBinding>,
    vertex_input: Option<GfxVertexInputLayout>,
    render_pass: vk::RenderPass,

    device: Arc<dyn GfxDevice>,
    name: String,
}
// new & init
impl GfxGraphicsPipeline {
    /// 从文件中加载 vertex shader 和 fragment shader，并创建 pipeline
    ///
    /// shader 文件在创建任何 Vulkan 对象之前读取
    ///
    /// # panics
    /// `ci` 中没有设置 vertex shader 或 fragment shader
    pub fn new(
        device: Arc<dyn GfxDevice>,
        render_pass: &GfxRenderPass,
        ci: &GfxGraphicsPipelineCreateInfo,
        debug_name: &str,
    ) -> GfxResult<Self> {
        let vertex_stage = ci.vertex_stage.as_ref().unwrap_or_else(|| panic!("{debug_name}: vertex shader not set"));
        let fragment_stage =
            ci.fragment_stage.as_ref().unwrap_or_else(|| panic!("{debug_name}: fragment shader not set"));

        let vertex_code = load_shader_code(vertex_stage.path())?;
        let fragment_code = load_shader_code(fragment_stage.path())?;

        Self::from_spirv(device, render_pass, ci, &vertex_code, &fragment_code, debug_name)
    }

    /// 与 [`Self::new`] 相同，但 shader 代码由调用者提供，`ci` 中 shader stage 的路径仅用于错误信息
    ///
    /// 没有设置 shader stage 时，入口函数为 `main`
    pub fn from_spirv(
        device: Arc<dyn GfxDevice>,
        render_pass: &GfxRenderPass,
        ci: &GfxGraphicsPipelineCreateInfo,
        vertex_code: &[u32],
        fragment_code: &[u32],
        debug_name: &str,
    ) -> GfxResult<Self> {
        let stage_name = |stage: Option<&GfxShaderStageInfo>, suffix: &str| match stage {
            Some(stage) => stage.path().display().to_string(),
            None => format!("{debug_name}-{suffix}"),
        };
        let entry_point = |stage: Option<&GfxShaderStageInfo>| stage.map_or(c"main", |stage| stage.entry_point);

        // 反射：此时还没有创建任何 Vulkan 对象
        let vertex_reflection = GfxShaderReflection::reflect(
            vertex_code,
            vk::ShaderStageFlags::VERTEX,
            &stage_name(ci.vertex_stage(), "vert"),
        )?;
        let fragment_reflection = GfxShaderReflection::reflect(
            fragment_code,
            vk::ShaderStageFlags::FRAGMENT,
            &stage_name(ci.fragment_stage(), "frag"),
        )?;

        let vertex_input = GfxVertexInputLayout::from_reflected_inputs(&vertex_reflection.inputs)?;
        let descriptor_bindings = merge_descriptor_bindings(&[
            (vk::ShaderStageFlags::VERTEX, vertex_reflection.bindings.as_slice()),
            (vk::ShaderStageFlags::FRAGMENT, fragment_reflection.bindings.as_slice()),
        ]);
        log::debug!("pipeline {} descriptor bindings: {:?}", debug_name, descriptor_bindings);

        // shader module 只在创建 pipeline 期间存在，离开作用域时销毁
        let vertex_module = GfxShaderModule::new(device.clone(), vertex_code, &format!("{debug_name}-vert"))?;
        let fragment_module = GfxShaderModule::new(device.clone(), fragment_code, &format!("{debug_name}-frag"))?;

        let descriptor_set_layout = GfxDescriptorSetLayout::new(device.clone(), &descriptor_bindings, debug_name)?;
        let layout = GfxPipelineLayout::new(device.clone(), &[descriptor_set_layout.handle()], debug_name)?;

        let extent = render_pass.extent();
        let desc = GfxGraphicsPipelineDesc {
            stages: vec![
                GfxPipelineStageDesc {
                    stage: vk::ShaderStageFlags::VERTEX,
                    module: vertex_module.handle(),
                    entry_point: entry_point(ci.vertex_stage()).to_owned(),
                },
                GfxPipelineStageDesc {
                    stage: vk::ShaderStageFlags::FRAGMENT,
                    module: fragment_module.handle(),
                    entry_point: entry_point(ci.fragment_stage()).to_owned(),
                },
            ],
            vertex_input: vertex_input.clone(),
            topology: ci.primitive_topology,
            primitive_restart: ci.primitive_restart,
            viewport: ci.viewport.unwrap_or(vk::Viewport {
                x: 0.0,
                y: 0.0,
                width: extent.width as f32,
                height: extent.height as f32,
                min_depth: 0.0,
                max_depth: 1.0,
            }),
            scissor: ci.scissor.unwrap_or(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            }),
            rasterization: ci.rasterize_state_info,
            samples: vk::SampleCountFlags::TYPE_1,
            depth_stencil: ci.depth_stencil_info,
            color_blend_attachments: vec![ci.color_attach_blend_state; render_pass.color_attachment_count()],
            logic_op: ci.blend_logic_op,
            blend_constants: ci.blend_constants,
            dynamic_states: ci.dynamic_states.clone(),
            layout: layout.handle(),
            render_pass: render_pass.handle(),
            subpass: 0,
        };

        let handle = device.create_graphics_pipeline(&desc, debug_name)?;
        log::info!("create graphics pipeline {}: {:?}", debug_name, handle);

        Ok(Self {
            handle,
            layout,
            descriptor_set_layout,
            descriptor_bindings,
            vertex_input,
            render_pass: render_pass.handle(),
            device,
            name: debug_name.to_string(),
        })
    }
}
// getters
impl GfxGraphicsPipeline {
    #[inline]
    pub fn handle(&self) -> vk::Pipeline {
        self.handle
    }

    #[inline]
    pub fn layout(&self) -> vk::PipelineLayout {
        self.layout.handle()
    }

    #[inline]
    pub fn descriptor_set_layout(&self) -> vk::DescriptorSetLayout {
        self.descriptor_set_layout.handle()
    }

    /// 按照 binding 号升序排列
    #[inline]
    pub fn descriptor_bindings(&self) -> &[GfxDescriptorBinding] {
        &self.descriptor_bindings
    }

    #[inline]
    pub fn vertex_input(&self) -> Option<&GfxVertexInputLayout> {
        self.vertex_input.as_ref()
    }

    #[inline]
    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }
}
// descriptor
impl GfxGraphicsPipeline {
    /// 按照 pipeline 的 descriptor binding 创建 pool，每个 binding 对应一个 pool size
    pub fn create_descriptor_pool(&self, max_sets: u32) -> GfxResult<GfxDescriptorPool> {
        GfxDescriptorPool::new(self.device.clone(), &self.descriptor_bindings, max_sets, &self.name)
    }

    /// 创建一个新的 pool，并从中分配 `count` 个使用该 pipeline descriptor set layout 的 set
    ///
    /// # panics
    /// `count` 为 0
    pub fn allocate_descriptor_sets(&self, count: u32) -> GfxResult<GfxDescriptorData> {
        assert!(count > 0, "pipeline {} allocates 0 descriptor sets", self.name);
        let pool = self.create_descriptor_pool(count)?;
        let sets = pool.allocate_sets(self.descriptor_set_layout.handle(), count)?;
        Ok(GfxDescriptorData { pool, sets })
    }
}
impl Drop for GfxGraphicsPipeline {
    fn drop(&mut self) {
        log::info!("destroy graphics pipeline {}: {:?}", self.name, self.handle);
        self.device.destroy_pipeline(self.handle);
    }
}
