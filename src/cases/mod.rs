pub mod text_layout_consistency;
