//! GLSL sources for the GPU backend.
//!
//! The vertex stage draws one triangle that covers the whole viewport. The
//! fragment stage runs the same escape-time loop and ramp lookup as the CPU
//! renderer, with the preset's mapping and initial `z` baked in as constants.

use shadebrot_core::{CoordinateMapping, Preset, ZStart, ESCAPE_RADIUS_SQ};

/// Vertices of the full-screen triangle, `(x, y)` pairs in clip space.
pub const FULLSCREEN_TRIANGLE: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];

pub const VERTEX_SOURCE: &str = r#"#version 330 core
layout(location = 0) in vec2 a_position;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

/// Format a float so GLSL always parses it as a float literal.
fn glsl_float(v: f64) -> String {
    format!("{v:?}")
}

/// Fragment shader for `preset`.
///
/// Uniforms: `u_translate` (vec2), `u_scale`, `u_aspect`, `u_max_iters`
/// (int), `u_resolution` (vec2), `u_ramp` (sampler2D, `len × 1`).
pub fn fragment_source(preset: &Preset) -> String {
    let sign = match preset.mapping {
        CoordinateMapping::Biased { .. } => "+",
        CoordinateMapping::CenterSubtracted => "-",
    };
    let bias = glsl_float(preset.mapping.bias());
    let z0 = match preset.z_start {
        ZStart::Zero => "vec2(0.0)",
        ZStart::C => "c",
    };
    let ramp_len = preset.ramp_length;
    let bailout = glsl_float(ESCAPE_RADIUS_SQ);

    format!(
        r#"#version 330 core
uniform vec2 u_translate;
uniform float u_scale;
uniform float u_aspect;
uniform int u_max_iters;
uniform vec2 u_resolution;
uniform sampler2D u_ramp;

out vec4 frag_color;

const int RAMP_LEN = {ramp_len};
const float BIAS = {bias};

void main() {{
    vec2 v = gl_FragCoord.xy / u_resolution * 2.0 - 1.0;
    vec2 c = vec2(u_aspect * v.x * u_scale + BIAS {sign} u_translate.x,
                  v.y * u_scale {sign} u_translate.y);

    vec2 z = {z0};
    int n = u_max_iters;
    for (int i = 0; i < u_max_iters; i++) {{
        z = vec2(z.x * z.x - z.y * z.y, 2.0 * z.x * z.y) + c;
        if (dot(z, z) > {bailout}) {{
            n = i;
            break;
        }}
    }}

    int idx = 0;
    if (n < u_max_iters) {{
        idx = min(int(floor(float(n) / float(u_max_iters) * float(RAMP_LEN))), RAMP_LEN - 1);
    }}
    frag_color = texelFetch(u_ramp, ivec2(idx, 0), 0);
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_every_uniform() {
        let src = fragment_source(&Preset::standard());
        assert!(src.starts_with("#version 330 core"));
        for name in [
            "uniform vec2 u_translate;",
            "uniform float u_scale;",
            "uniform float u_aspect;",
            "uniform int u_max_iters;",
            "uniform vec2 u_resolution;",
            "uniform sampler2D u_ramp;",
        ] {
            assert!(src.contains(name), "missing `{name}`");
        }
    }

    #[test]
    fn biased_mapping_adds_translate() {
        let src = fragment_source(&Preset::classic());
        assert!(src.contains("const float BIAS = -0.5;"));
        assert!(src.contains("BIAS + u_translate.x"));
        assert!(src.contains("v.y * u_scale + u_translate.y"));
    }

    #[test]
    fn center_subtracted_mapping_subtracts_center() {
        let src = fragment_source(&Preset::square());
        assert!(src.contains("const float BIAS = 0.0;"));
        assert!(src.contains("BIAS - u_translate.x"));
        assert!(src.contains("v.y * u_scale - u_translate.y"));
    }

    #[test]
    fn initial_z_follows_preset() {
        assert!(fragment_source(&Preset::standard()).contains("vec2 z = vec2(0.0);"));
        assert!(fragment_source(&Preset::classic()).contains("vec2 z = c;"));
    }

    #[test]
    fn ramp_length_and_clamp_are_embedded() {
        let preset = Preset {
            ramp_length: 64,
            ..Preset::standard()
        };
        let src = fragment_source(&preset);
        assert!(src.contains("const int RAMP_LEN = 64;"));
        assert!(src.contains("RAMP_LEN - 1"));
        assert!(src.contains("dot(z, z) > 4.0"));
    }

    #[test]
    fn float_literals_keep_a_decimal_point() {
        assert_eq!(glsl_float(0.0), "0.0");
        assert_eq!(glsl_float(-0.5), "-0.5");
        assert_eq!(glsl_float(2.0), "2.0");
    }

    #[test]
    fn triangle_covers_clip_space() {
        // Corners (-1,-1), (3,-1), (-1,3) contain the whole [-1,1]² square.
        assert_eq!(FULLSCREEN_TRIANGLE.len(), 6);
        assert!(VERTEX_SOURCE.contains("a_position"));
    }
}
