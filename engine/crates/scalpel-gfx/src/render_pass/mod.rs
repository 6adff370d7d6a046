pub mod pass;
pub mod pass_commands;
pub mod render_target;
