//! InkRoom Render Library
//!
//! Renderer abstraction for InkRoom, frame composition with the live shape
//! preview, and a recording display-list backend.

pub mod display_list;
mod frame;
mod renderer;

pub use display_list::{DisplayList, DrawCommand};
pub use frame::{paint_preview, paint_record, paint_state, render_frame};
pub use renderer::{PathStyle, RenderContext, RenderResult, Renderer, RendererError, TextStyle};
