//! Figures: which to draw ([`plan`], [`spec`]), what data they show
//! ([`resolve`]), and drawing them ([`render`]).

pub mod format;
pub mod plan;
pub mod render;
pub mod resolve;
pub mod spec;
pub mod table_image;
pub mod theme;
