pub(crate) mod geometry;
pub(crate) mod text_block;
