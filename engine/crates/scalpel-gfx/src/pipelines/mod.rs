pub mod graphics_pipeline;
pub mod pipeline_config;
pub mod reflection;
pub mod shader;
pub mod vertex_input;
