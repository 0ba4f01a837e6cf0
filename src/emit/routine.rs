//! Emission of the per-filter processing routines.
//!
//! Each supported filter is a distinct emission path with its per-pixel logic
//! fixed at design time; there is nothing data-driven here. Every routine is
//! shaped as an unrolled bulk loop over `count & ~(unroll - 1)` pixels plus a
//! remainder loop repeating the identical per-pixel logic, keeping the bulk
//! loop free of per-iteration branches.

use core::fmt::Write;

use crate::Filter;

// Per-pixel bodies are shared verbatim between the bulk and remainder loops.
// The 5-6-5 unpack/pack shifts must stay in lockstep with the packing tables
// in `quant::pack_table`.
const GRAYSCALE_BODY: &str = "        uint8_t r = (pixels[i] >> 8) & 0xF8;
        uint8_t g = (pixels[i] >> 3) & 0xFC;
        uint8_t b = (pixels[i] << 3) & 0xF8;
        uint8_t gray = GRAY_LUT_R[r] + GRAY_LUT_G[g] + GRAY_LUT_B[b];
        pixels[i] = (gray & 0xF8) << 8 | (gray & 0xFC) << 3 | (gray >> 3);";

const SEPIA_BODY: &str = "        uint8_t r = (pixels[i] >> 8) & 0xF8;
        uint8_t g = (pixels[i] >> 3) & 0xFC;
        uint8_t b = (pixels[i] << 3) & 0xF8;
        int tr = SEPIA_LUT_RR[r] + SEPIA_LUT_RG[g] + SEPIA_LUT_RB[b];
        int tg = SEPIA_LUT_GR[r] + SEPIA_LUT_GG[g] + SEPIA_LUT_GB[b];
        int tb = SEPIA_LUT_BR[r] + SEPIA_LUT_BG[g] + SEPIA_LUT_BB[b];
        r = tr > 255 ? 255 : tr;
        g = tg > 255 ? 255 : tg;
        b = tb > 255 ? 255 : tb;
        pixels[i] = (r & 0xF8) << 8 | (g & 0xFC) << 3 | (b >> 3);";

fn unrolled_routine(name: &str, brief: &str, note: &str, unroll: u32, body: &str) -> String {
    debug_assert!(unroll.is_power_of_two(), "alignment mask needs a power of two");
    let mut out = String::new();
    let _ = writeln!(out, "/**");
    let _ = writeln!(out, " * @brief {brief}");
    let _ = writeln!(out, " * {note}");
    let _ = writeln!(out, " *");
    let _ = writeln!(out, " * @param pixels Pointer to RGB565 pixel data");
    let _ = writeln!(out, " * @param count Number of pixels");
    let _ = writeln!(out, " */");
    let _ = writeln!(
        out,
        "static FORCEINLINE void IRAM_ATTR {name}(uint16_t* pixels, int count) {{"
    );
    let _ = writeln!(out, "    const int aligned = count & ~{};", unroll - 1);
    let _ = writeln!(out);
    let _ = writeln!(out, "    #pragma GCC unroll {unroll}");
    let _ = writeln!(out, "    for (int i = 0; i < aligned; i++) {{");
    let _ = writeln!(out, "{body}");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out);
    let _ = writeln!(out, "    // tail pixels: identical logic, no unroll");
    let _ = writeln!(out, "    for (int i = aligned; i < count; i++) {{");
    let _ = writeln!(out, "{body}");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
    out
}

/// Emitted function name for a filter, if it has a routine at all.
///
/// Gamma and vignette ship tables only; their application loops live in the
/// consuming firmware.
#[must_use]
pub const fn routine_name(filter: Filter) -> Option<&'static str> {
    match filter {
        Filter::Grayscale => Some("filter_grayscale_lut"),
        Filter::Sepia => Some("filter_sepia_lut"),
        Filter::Gamma | Filter::Vignette => None,
    }
}

/// Render the processing routine for `filter`.
#[must_use]
pub fn routine(filter: Filter) -> Option<String> {
    match filter {
        Filter::Grayscale => Some(unrolled_routine(
            "filter_grayscale_lut",
            "Grayscale filter over RGB565 pixels",
            "3 table reads and 2 adds per pixel, no multiply",
            8,
            GRAYSCALE_BODY,
        )),
        Filter::Sepia => Some(unrolled_routine(
            "filter_sepia_lut",
            "Sepia filter over RGB565 pixels",
            "9 table reads and 6 adds replace the 3x3 matrix multiply",
            4,
            SEPIA_BODY,
        )),
        Filter::Gamma | Filter::Vignette => None,
    }
}
