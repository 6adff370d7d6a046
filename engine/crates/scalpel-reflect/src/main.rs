//! Shader 反射工具
//!
//! 读取编译后的 SPIR-V 文件，打印推导出的 vertex input 布局与合并后的 descriptor 布局。
//! 可以额外指定一个管线配置文件，检查它能否被正确解析。
//!
//! ```text
//! scalpel-reflect shader/.build/triangle/triangle.vert.spv shader/.build/triangle/triangle.frag.spv
//! scalpel-reflect --named triangle/triangle.vert triangle/triangle.frag --config opaque.toml
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use ash::vk;
use clap::Parser;
use scalpel_crate_tools::init_log::init_log;
use scalpel_crate_tools::resource::ScalpelPath;
use scalpel_gfx::descriptors::descriptor_layout::merge_descriptor_bindings;
use scalpel_gfx::pipelines::pipeline_config::GfxPipelineConfig;
use scalpel_gfx::pipelines::reflection::GfxShaderReflection;
use scalpel_gfx::pipelines::shader::load_shader_code;
use scalpel_gfx::pipelines::vertex_input::GfxVertexInputLayout;

#[derive(Parser, Debug)]
#[command(name = "scalpel-reflect", version, about = "Print vertex input and descriptor layouts reflected from SPIR-V")]
struct Cli {
    /// vertex shader 的 SPIR-V 文件
    vertex: PathBuf,

    /// fragment shader 的 SPIR-V 文件
    fragment: Option<PathBuf>,

    /// 将 shader 参数视为 `shader/.build` 下的名字，例如 `triangle/triangle.vert`
    #[arg(long)]
    named: bool,

    /// 管线配置文件；配合 `--named` 时在 `config/` 下查找
    #[arg(long)]
    config: Option<PathBuf>,
}
impl Cli {
    fn shader_path(&self, path: &Path) -> PathBuf {
        if self.named {
            ScalpelPath::shader_path(&path.to_string_lossy())
        } else {
            path.to_path_buf()
        }
    }

    fn config_path(&self, path: &Path) -> PathBuf {
        if self.named {
            ScalpelPath::config_path(&path.to_string_lossy())
        } else {
            path.to_path_buf()
        }
    }
}

fn reflect_file(path: &Path, stage: vk::ShaderStageFlags) -> anyhow::Result<GfxShaderReflection> {
    let code = load_shader_code(path)?;
    let reflection = GfxShaderReflection::reflect(&code, stage, &path.to_string_lossy())
        .with_context(|| format!("failed to reflect {:?}", path))?;
    log::info!(
        "reflect {:?}: {} inputs, {} bindings",
        path,
        reflection.inputs.len(),
        reflection.bindings.len()
    );
    Ok(reflection)
}

fn print_vertex_input(layout: Option<&GfxVertexInputLayout>) {
    println!("vertex input:");
    let Some(layout) = layout else {
        println!("  <none>");
        return;
    };
    for binding in layout.bindings() {
        println!("  binding {}: stride {}, rate {:?}", binding.binding, binding.stride, binding.input_rate);
    }
    for attribute in layout.attributes() {
        println!(
            "  location {}: {:?}, offset {}",
            attribute.location, attribute.format, attribute.offset
        );
    }
}

fn main() -> anyhow::Result<()> {
    init_log();
    let cli = Cli::parse();

    let vert_path = cli.shader_path(&cli.vertex);
    let vert = reflect_file(&vert_path, vk::ShaderStageFlags::VERTEX)?;
    let frag = cli
        .fragment
        .as_deref()
        .map(|path| reflect_file(&cli.shader_path(path), vk::ShaderStageFlags::FRAGMENT))
        .transpose()?;

    let vertex_input = GfxVertexInputLayout::from_reflected_inputs(&vert.inputs)
        .with_context(|| format!("failed to build vertex input of {:?}", vert_path))?;
    print_vertex_input(vertex_input.as_ref());

    let mut stages = vec![(vk::ShaderStageFlags::VERTEX, vert.bindings.as_slice())];
    if let Some(frag) = &frag {
        stages.push((vk::ShaderStageFlags::FRAGMENT, frag.bindings.as_slice()));
    }
    let bindings = merge_descriptor_bindings(&stages);

    println!("descriptor bindings:");
    if bindings.is_empty() {
        println!("  <none>");
    }
    for binding in &bindings {
        println!(
            "  binding {}: {:?} x{}, stages {:?}",
            binding.binding, binding.descriptor_type, binding.descriptor_count, binding.stage_flags
        );
    }

    if let Some(config) = &cli.config {
        let config = GfxPipelineConfig::load(&cli.config_path(config))?;
        println!("pipeline config:\n  {:?}", config);
    }

    Ok(())
}
