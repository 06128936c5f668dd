//! Built-in WGSL used when no shader files are configured.
//!
//! Draws the primary texture across the quad and the overlay sprite at the
//! cursor.

pub const QUAD_VERTEX: &str = include_str!("shaders/quad_vertex.wgsl");
pub const QUAD_FRAGMENT: &str = include_str!("shaders/quad_fragment.wgsl");

#[cfg(test)]
mod tests {
    use quadlab_engine::render::{FS_ENTRY, VS_ENTRY};

    use super::*;

    #[test]
    fn built_in_stages_define_entry_points() {
        assert!(QUAD_VERTEX.contains(&format!("fn {VS_ENTRY}(")));
        assert!(QUAD_FRAGMENT.contains(&format!("fn {FS_ENTRY}(")));
    }

    #[test]
    fn built_in_stages_use_fixed_bindings() {
        assert!(QUAD_VERTEX.contains("@binding(0) var<uniform>"));
        for b in 0..5 {
            assert!(QUAD_FRAGMENT.contains(&format!("@binding({b})")));
        }
    }
}
