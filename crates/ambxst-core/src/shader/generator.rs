use std::path::Path;
use tracing::{debug, info};

use super::PaletteColor;
use crate::error::{Error, Result};

/// Falloff of the per-entry weight `exp(-sharpness * distSq)`.
/// Matches the QML wallpaper shader.
pub const DISTRIBUTION_SHARPNESS: f64 = 20.0;

const NORMALIZE_EPSILON: f64 = 0.00001;
const MIN_TOTAL_WEIGHT: f64 = 0.0001;

/// Shader emitted for an empty palette: copies the hooked texture as-is
pub const PASSTHROUGH_SHADER: &str = concat!(
    "//!HOOK MAIN\n",
    "//!BIND HOOKED\n",
    "//!DESC Ambxst Passthrough\n",
    "void main() {\n",
    "    HOOKED_col = HOOKED_tex(HOOKED_pos);\n",
    "}",
);

const TINT_HEADER: &str = concat!(
    "//!HOOK MAIN\n",
    "//!BIND HOOKED\n",
    "//!DESC Ambxst Palette Tint\n",
    "\n",
    "vec4 hook() {\n",
    "    vec4 tex = HOOKED_tex(HOOKED_pos);\n",
    "    vec3 color = tex.rgb;\n",
    "\n",
    "    vec3 accumulatedColor = vec3(0.0);\n",
    "    float totalWeight = 0.0;\n",
    "    \n",
    "    // \"Sharpness\" factor matches QML shader.\n",
    "    float distributionSharpness = 20.0; \n",
    "\n",
    "    // Unrolled palette comparison\n",
    "    ",
);

const TINT_FOOTER: &str = concat!(
    "\n",
    "\n",
    "    // Normalize\n",
    "    vec3 finalColor = accumulatedColor / (totalWeight + 0.00001);\n",
    "\n",
    "    // Fallback: If no color matches well (weight near zero), keep original\n",
    "    // This prevents solid background colors if something goes wrong\n",
    "    if (totalWeight < 0.0001) {\n",
    "        finalColor = color;\n",
    "    }\n",
    "\n",
    "    return vec4(finalColor, tex.a);\n",
    "}\n",
);

/// Build the mpv shader that pulls every pixel toward the palette.
///
/// Each entry gets its own copy of the comparison block instead of a loop
/// over a uniform array: GLES drivers handle dynamic array indexing badly.
pub fn generate_shader(palette: &[PaletteColor]) -> String {
    if palette.is_empty() {
        return PASSTHROUGH_SHADER.to_string();
    }

    let mut src = String::with_capacity(TINT_HEADER.len() + TINT_FOOTER.len() + palette.len() * 280);
    src.push_str(TINT_HEADER);
    for color in palette {
        push_palette_block(&mut src, color);
    }
    src.push_str(TINT_FOOTER);

    debug!("Generated palette shader with {} entries", palette.len());
    src
}

/// Same as [`generate_shader`]; `None` yields the passthrough shader
pub fn generate_shader_opt(palette: Option<&[PaletteColor]>) -> String {
    generate_shader(palette.unwrap_or_default())
}

fn push_palette_block(src: &mut String, color: &PaletteColor) {
    src.push_str(&format!(
        concat!(
            "\n",
            "    {{\n",
            "        vec3 pColor = vec3({}, {}, {});\n",
            "        vec3 diff = color - pColor;\n",
            "        float distSq = dot(diff, diff); \n",
            "        float weight = exp(-distributionSharpness * distSq);\n",
            "        accumulatedColor += pColor * weight;\n",
            "        totalWeight += weight;\n",
            "    }}\n",
        ),
        channel(color.r),
        channel(color.g),
        channel(color.b),
    ));
}

/// Enough digits to print any finite f64 exactly
const EXACT_DIGITS: usize = 1100;
const CHANNEL_DIGITS: usize = 5;

/// Fixed-point with five decimals. Exact ties round away from zero and
/// negative zero prints as `0.00000`.
fn channel(value: f64) -> String {
    if !value.is_finite() {
        return format!("{:.5}", value);
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, dropped) = frac_part.split_at(CHANNEL_DIGITS.min(frac_part.len()));

    let mut digits: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    if dropped.as_bytes().first().is_some_and(|d| *d >= b'5') {
        round_up(&mut digits);
    }

    let split = digits.len() - CHANNEL_DIGITS;
    let mut text = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        text.push('-');
    }
    text.push_str(std::str::from_utf8(&digits[..split]).unwrap_or("0"));
    text.push('.');
    text.push_str(std::str::from_utf8(&digits[split..]).unwrap_or("00000"));
    text
}

/// Add one to a string of ASCII decimal digits
fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// CPU version of the generated shader for a single pixel
pub fn tint_pixel(pixel: [f64; 3], palette: &[PaletteColor]) -> [f64; 3] {
    if palette.is_empty() {
        return pixel;
    }

    let mut accumulated = [0.0; 3];
    let mut total_weight = 0.0;
    for entry in palette {
        let p = entry.to_array();
        let dist_sq: f64 = (0..3).map(|i| (pixel[i] - p[i]).powi(2)).sum();
        let weight = (-DISTRIBUTION_SHARPNESS * dist_sq).exp();
        for i in 0..3 {
            accumulated[i] += p[i] * weight;
        }
        total_weight += weight;
    }

    if total_weight < MIN_TOTAL_WEIGHT {
        return pixel;
    }
    accumulated.map(|c| c / (total_weight + NORMALIZE_EPSILON))
}

/// Generate the shader for `palette` and write it where mpv can load it
pub fn write_shader(path: &Path, palette: &[PaletteColor]) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    std::fs::write(path, generate_shader(palette)).map_err(|e| Error::io(path, e))?;
    info!("Wrote palette shader ({} colors) to {:?}", palette.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_SHADER: &str = concat!(
        "//!HOOK MAIN\n",
        "//!BIND HOOKED\n",
        "//!DESC Ambxst Palette Tint\n",
        "\n",
        "vec4 hook() {\n",
        "    vec4 tex = HOOKED_tex(HOOKED_pos);\n",
        "    vec3 color = tex.rgb;\n",
        "\n",
        "    vec3 accumulatedColor = vec3(0.0);\n",
        "    float totalWeight = 0.0;\n",
        "    \n",
        "    // \"Sharpness\" factor matches QML shader.\n",
        "    float distributionSharpness = 20.0; \n",
        "\n",
        "    // Unrolled palette comparison\n",
        "    \n",
        "    {\n",
        "        vec3 pColor = vec3(1.00000, 0.00000, 0.00000);\n",
        "        vec3 diff = color - pColor;\n",
        "        float distSq = dot(diff, diff); \n",
        "        float weight = exp(-distributionSharpness * distSq);\n",
        "        accumulatedColor += pColor * weight;\n",
        "        totalWeight += weight;\n",
        "    }\n",
        "\n",
        "\n",
        "    // Normalize\n",
        "    vec3 finalColor = accumulatedColor / (totalWeight + 0.00001);\n",
        "\n",
        "    // Fallback: If no color matches well (weight near zero), keep original\n",
        "    // This prevents solid background colors if something goes wrong\n",
        "    if (totalWeight < 0.0001) {\n",
        "        finalColor = color;\n",
        "    }\n",
        "\n",
        "    return vec4(finalColor, tex.a);\n",
        "}\n",
    );

    #[test]
    fn empty_or_absent_palette_is_passthrough() {
        assert_eq!(generate_shader(&[]), PASSTHROUGH_SHADER);
        assert_eq!(generate_shader_opt(None), PASSTHROUGH_SHADER);
        let empty: &[PaletteColor] = &[];
        assert_eq!(generate_shader_opt(Some(empty)), PASSTHROUGH_SHADER);
        assert!(PASSTHROUGH_SHADER.contains("HOOKED_col = HOOKED_tex(HOOKED_pos);"));
        assert!(!PASSTHROUGH_SHADER.ends_with('\n'));
    }

    #[test]
    fn single_color_matches_reference_text() {
        let src = generate_shader(&[PaletteColor::new(1.0, 0.0, 0.0)]);
        assert_eq!(src, RED_SHADER);
        assert_eq!(src.matches("vec3 pColor = ").count(), 1);
        assert!(src.contains("vec3(1.00000, 0.00000, 0.00000)"));
    }

    #[test]
    fn one_block_per_color_in_order() {
        let palette = [
            PaletteColor::new(0.1, 0.2, 0.3),
            PaletteColor::new(0.123456, 0.5, 0.999999),
            PaletteColor::default(),
        ];
        let src = generate_shader(&palette);

        assert_eq!(src.matches("totalWeight += weight;").count(), 3);
        let first = src.find("vec3(0.10000, 0.20000, 0.30000)").unwrap();
        let second = src.find("vec3(0.12346, 0.50000, 1.00000)").unwrap();
        let third = src.find("vec3(0.00000, 0.00000, 0.00000)").unwrap();
        assert!(first < second && second < third);
        assert!(src.starts_with("//!HOOK MAIN\n//!BIND HOOKED\n//!DESC Ambxst Palette Tint\n"));
        assert!(src.contains("float distributionSharpness = 20.0;"));
    }

    #[test]
    fn channel_formatting() {
        assert_eq!(channel(-0.0), "0.00000");
        assert_eq!(channel(-0.5), "-0.50000");
        assert_eq!(channel(2.0), "2.00000");
        assert_eq!(channel(0.123456), "0.12346");
        assert_eq!(channel(0.999999), "1.00000");
        assert_eq!(channel(99.999996), "100.00000");
        assert_eq!(channel(-0.000001), "-0.00000");
    }

    #[test]
    fn channel_ties_round_up() {
        // exact binary fractions sitting halfway between two 5-digit values
        assert_eq!(channel(0.015625), "0.01563");
        assert_eq!(channel(0.328125), "0.32813");
        assert_eq!(channel(84.0 / 256.0), "0.32813");
        assert_eq!(channel(-0.015625), "-0.01563");
        assert_eq!(channel(0.5), "0.50000");

        let src = generate_shader(&[PaletteColor::new(0.015625, 0.328125, 0.0)]);
        assert!(src.contains("vec3(0.01563, 0.32813, 0.00000)"));
    }

    #[test]
    fn tint_without_palette_is_identity() {
        for pixel in [[0.0, 0.0, 0.0], [0.3, 0.6, 0.9], [1.0, 1.0, 1.0]] {
            assert_eq!(tint_pixel(pixel, &[]), pixel);
            assert_eq!(tint_pixel(tint_pixel(pixel, &[]), &[]), pixel);
        }
    }

    #[test]
    fn tint_pulls_toward_nearest_color() {
        let palette = [PaletteColor::new(1.0, 0.0, 0.0), PaletteColor::new(0.0, 0.0, 1.0)];
        let out = tint_pixel([0.9, 0.1, 0.1], &palette);
        assert!(out[0] > 0.99 && out[2] < 0.01);
    }

    #[test]
    fn tint_keeps_pixel_when_nothing_matches() {
        // distSq = 3, weight = exp(-60) is below the cutoff
        let out = tint_pixel([1.0, 1.0, 1.0], &[PaletteColor::new(0.0, 0.0, 0.0)]);
        assert_eq!(out, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn write_shader_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mpv/shaders/palette.glsl");
        write_shader(&path, &[PaletteColor::new(1.0, 0.0, 0.0)]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), RED_SHADER);
    }
}
