use std::ffi::CString;

use ash::vk;
use itertools::Itertools;

use crate::descriptors::descriptor_layout::GfxDescriptorBinding;
use crate::error::{GfxError, GfxResult};
use crate::foundation::device::GfxDevice;
use crate::pipelines::graphics_pipeline::GfxGraphicsPipelineDesc;
use crate::render_pass::pass::GfxRenderPassDesc;

/// 基于 `ash::Device` 的 [`GfxDevice`] 实现
///
/// 不持有 device 的所有权：device 的创建与销毁属于外部的 context，
/// 需要保证 device 比所有通过本对象创建的 Vulkan 对象活得更久。
///
/// 如果提供了 debug utils，会为创建的对象设置 debug name，格式为 `<类型>::<名称>`
pub struct GfxAshDevice {
    device: ash::Device,
    debug_utils: Option<ash::ext::debug_utils::Device>,
}
// new & init
impl GfxAshDevice {
    pub fn new(device: ash::Device, debug_utils: Option<ash::ext::debug_utils::Device>) -> Self {
        Self { device, debug_utils }
    }
}
// getters
impl GfxAshDevice {
    #[inline]
    pub fn ash_device(&self) -> &ash::Device {
        &self.device
    }
}
// tools
impl GfxAshDevice {
    fn set_debug_name<T: vk::Handle + Copy>(&self, handle: T, type_name: &str, name: &str) {
        let Some(debug_utils) = &self.debug_utils else {
            return;
        };
        let Ok(debug_name) = CString::new(format!("{type_name}::{name}")) else {
            log::warn!("debug name contains nul byte: {name}");
            return;
        };

        let name_info = vk::DebugUtilsObjectNameInfoEXT::default().object_handle(handle).object_name(&debug_name);
        if let Err(e) = unsafe { debug_utils.set_debug_utils_object_name(&name_info) } {
            log::warn!("failed to set debug name {}: {}", name, e);
        }
    }
}
impl GfxDevice for GfxAshDevice {
    fn create_shader_module(&self, code: &[u32], debug_name: &str) -> GfxResult<vk::ShaderModule> {
        let create_info = vk::ShaderModuleCreateInfo::default().code(code);
        let module = unsafe { self.device.create_shader_module(&create_info, None) }
            .map_err(|e| GfxError::device("shader module", e))?;
        self.set_debug_name(module, "GfxShaderModule", debug_name);
        Ok(module)
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        unsafe { self.device.destroy_shader_module(module, None) }
    }

    fn create_descriptor_set_layout(
        &self,
        bindings: &[GfxDescriptorBinding],
        debug_name: &str,
    ) -> GfxResult<vk::DescriptorSetLayout> {
        let vk_bindings = bindings
            .iter()
            .map(|binding| {
                vk::DescriptorSetLayoutBinding::default()
                    .binding(binding.binding)
                    .descriptor_type(binding.descriptor_type)
                    .descriptor_count(binding.descriptor_count)
                    .stage_flags(binding.stage_flags)
            })
            .collect_vec();

        let create_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&vk_bindings);
        let layout = unsafe { self.device.create_descriptor_set_layout(&create_info, None) }
            .map_err(|e| GfxError::device("descriptor set layout", e))?;
        self.set_debug_name(layout, "GfxDescriptorSetLayout", debug_name);
        Ok(layout)
    }

    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout) {
        unsafe { self.device.destroy_descriptor_set_layout(layout, None) }
    }

    fn create_pipeline_layout(
        &self,
        set_layouts: &[vk::DescriptorSetLayout],
        debug_name: &str,
    ) -> GfxResult<vk::PipelineLayout> {
        let create_info = vk::PipelineLayoutCreateInfo::default().set_layouts(set_layouts);
        let layout = unsafe { self.device.create_pipeline_layout(&create_info, None) }
            .map_err(|e| GfxError::device("pipeline layout", e))?;
        self.set_debug_name(layout, "GfxPipelineLayout", debug_name);
        Ok(layout)
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        unsafe { self.device.destroy_pipeline_layout(layout, None) }
    }

    fn create_graphics_pipeline(&self, desc: &GfxGraphicsPipelineDesc, debug_name: &str) -> GfxResult<vk::Pipeline> {
        let shader_stages_info = desc
            .stages
            .iter()
            .map(|stage| {
                vk::PipelineShaderStageCreateInfo::default()
                    .stage(stage.stage)
                    .module(stage.module)
                    .name(stage.entry_point.as_c_str())
            })
            .collect_vec();

        // 没有 vertex input 时依然需要一个空的 state
        let (vertex_bindings, vertex_attributes) = match &desc.vertex_input {
            Some(layout) => (layout.bindings(), layout.attributes()),
            None => (&[][..], &[][..]),
        };
        let vertex_input_state_info = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(vertex_bindings)
            .vertex_attribute_descriptions(vertex_attributes);

        let input_assembly_info = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(desc.topology)
            .primitive_restart_enable(desc.primitive_restart);

        let viewport_info = vk::PipelineViewportStateCreateInfo::default()
            .viewports(std::slice::from_ref(&desc.viewport))
            .scissors(std::slice::from_ref(&desc.scissor));

        let msaa_info = vk::PipelineMultisampleStateCreateInfo::default()
            .sample_shading_enable(false)
            .rasterization_samples(desc.samples);

        // logic op 和 blend op 是互斥的
        let color_blend_info = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(desc.logic_op.is_some())
            .logic_op(desc.logic_op.unwrap_or(vk::LogicOp::COPY))
            .attachments(&desc.color_blend_attachments)
            .blend_constants(desc.blend_constants);

        let dynamic_state_info = vk::PipelineDynamicStateCreateInfo::default().dynamic_states(&desc.dynamic_states);

        // =======================================
        // === 创建 pipeline

        let mut pipeline_info = vk::GraphicsPipelineCreateInfo::default()
            .stages(&shader_stages_info)
            .vertex_input_state(&vertex_input_state_info)
            .input_assembly_state(&input_assembly_info)
            .viewport_state(&viewport_info)
            .rasterization_state(&desc.rasterization)
            .multisample_state(&msaa_info)
            .depth_stencil_state(&desc.depth_stencil)
            .color_blend_state(&color_blend_info)
            .layout(desc.layout)
            .render_pass(desc.render_pass)
            .subpass(desc.subpass);
        if !desc.dynamic_states.is_empty() {
            pipeline_info = pipeline_info.dynamic_state(&dynamic_state_info);
        }

        let pipelines = unsafe {
            self.device.create_graphics_pipelines(vk::PipelineCache::null(), std::slice::from_ref(&pipeline_info), None)
        }
        .map_err(|(_, e)| GfxError::device("graphics pipeline", e))?;
        let pipeline = pipelines[0];

        self.set_debug_name(pipeline, "GfxGraphicsPipeline", debug_name);
        Ok(pipeline)
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        unsafe { self.device.destroy_pipeline(pipeline, None) }
    }

    fn create_render_pass(&self, desc: &GfxRenderPassDesc, debug_name: &str) -> GfxResult<vk::RenderPass> {
        let mut subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&desc.color_refs);
        if let Some(depth_ref) = &desc.depth_ref {
            subpass = subpass.depth_stencil_attachment(depth_ref);
        }

        let create_info = vk::RenderPassCreateInfo::default()
            .attachments(&desc.attachments)
            .subpasses(std::slice::from_ref(&subpass))
            .dependencies(&desc.dependencies);
        let render_pass = unsafe { self.device.create_render_pass(&create_info, None) }
            .map_err(|e| GfxError::device("render pass", e))?;
        self.set_debug_name(render_pass, "GfxRenderPass", debug_name);
        Ok(render_pass)
    }

    fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        unsafe { self.device.destroy_render_pass(render_pass, None) }
    }

    fn create_framebuffer(
        &self,
        render_pass: vk::RenderPass,
        attachments: &[vk::ImageView],
        extent: vk::Extent2D,
        debug_name: &str,
    ) -> GfxResult<vk::Framebuffer> {
        let create_info = vk::FramebufferCreateInfo::default()
            .render_pass(render_pass)
            .attachments(attachments)
            .width(extent.width)
            .height(extent.height)
            .layers(1);
        let framebuffer = unsafe { self.device.create_framebuffer(&create_info, None) }
            .map_err(|e| GfxError::device("framebuffer", e))?;
        self.set_debug_name(framebuffer, "GfxFramebuffer", debug_name);
        Ok(framebuffer)
    }

    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        unsafe { self.device.destroy_framebuffer(framebuffer, None) }
    }

    fn create_descriptor_pool(
        &self,
        flags: vk::DescriptorPoolCreateFlags,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
        debug_name: &str,
    ) -> GfxResult<vk::DescriptorPool> {
        let create_info =
            vk::DescriptorPoolCreateInfo::default().flags(flags).max_sets(max_sets).pool_sizes(pool_sizes);
        let pool = unsafe { self.device.create_descriptor_pool(&create_info, None) }
            .map_err(|e| GfxError::device("descriptor pool", e))?;
        self.set_debug_name(pool, "GfxDescriptorPool", debug_name);
        Ok(pool)
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        unsafe { self.device.destroy_descriptor_pool(pool, None) }
    }

    fn allocate_descriptor_sets(
        &self,
        pool: vk::DescriptorPool,
        layouts: &[vk::DescriptorSetLayout],
    ) -> GfxResult<Vec<vk::DescriptorSet>> {
        let alloc_info = vk::DescriptorSetAllocateInfo::default().descriptor_pool(pool).set_layouts(layouts);
        unsafe { self.device.allocate_descriptor_sets(&alloc_info) }.map_err(|e| GfxError::device("descriptor sets", e))
    }

    fn free_descriptor_sets(&self, pool: vk::DescriptorPool, sets: &[vk::DescriptorSet]) -> GfxResult<()> {
        unsafe { self.device.free_descriptor_sets(pool, sets) }.map_err(|e| GfxError::device("descriptor sets", e))
    }
}
