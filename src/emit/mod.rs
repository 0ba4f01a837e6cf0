/*
 * Copyright (c) 2025 Yumechi <yume@yumechi.jp>
 *
 * Created on Saturday, May 17, 2025
 * Author: Yumechi <yume@yumechi.jp>
 *
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Rendering of tables, coefficient constants, and filter routines as C++
//! source text.
//!
//! The formatter is independent of which filter produced the values; it only
//! cares about the element type, the row width, and the table name. Output is
//! byte-for-byte deterministic for a given table and parameters.

use core::fmt::Write;

use crate::GeneratorConfig;
use crate::quant::{ElemKind, Lut, quantize};

pub mod document;
pub mod routine;

/// Default number of values per emitted row.
pub const DEFAULT_ROW_WIDTH: usize = 16;

fn literal(kind: ElemKind, v: u32) -> String {
    match kind {
        ElemKind::U8 => format!("{v:3}"),
        ElemKind::U16 => format!("0x{v:04X}"),
    }
}

/// Render one table as a `static constexpr` array.
///
/// Produces `ceil(len / row_width)` data rows; every row except the last ends
/// with a trailing comma. The adjacent comment declares the element count and
/// type so the table can be audited without counting lines.
#[must_use]
pub fn format_lut(lut: &Lut, row_width: usize) -> String {
    assert!(row_width > 0, "row width must be positive");
    let mut out = String::new();
    let _ = writeln!(
        out,
        "// {}: {} entries, {}",
        lut.name,
        lut.values.len(),
        lut.kind.c_name()
    );
    let _ = writeln!(out, "// Stored in flash (constexpr) to save SRAM");
    let _ = writeln!(
        out,
        "static constexpr {} {}[{}] = {{",
        lut.kind.c_name(),
        lut.name,
        lut.values.len()
    );
    let rows = lut.values.len().div_ceil(row_width);
    for (idx, chunk) in lut.values.chunks(row_width).enumerate() {
        let row = chunk
            .iter()
            .map(|&v| literal(lut.kind, v))
            .collect::<Vec<_>>()
            .join(", ");
        let sep = if idx + 1 == rows { "" } else { "," };
        let _ = writeln!(out, "    {row}{sep}");
    }
    let _ = writeln!(out, "}};");
    out
}

/// Render the fixed-point coefficient constants as named scalars.
///
/// These are single values, not tables: filters that run the multiply at run
/// time (on targets where one integer multiply is acceptable) use these
/// instead of the per-channel tables.
#[must_use]
pub fn coefficient_block(cfg: &GeneratorConfig) -> String {
    let scale = cfg.coeff_scale;
    let q = format!("Q{}", scale.bits());
    let den = scale.denominator();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "// Fixed-point coefficients ({q}: value * {den}, shift right {} after multiply)",
        scale.bits()
    );
    for (name, weight) in [
        ("LUMA_R", cfg.luma_weights[0]),
        ("LUMA_G", cfg.luma_weights[1]),
        ("LUMA_B", cfg.luma_weights[2]),
    ] {
        let _ = writeln!(
            out,
            "static constexpr uint8_t {name}_{q} = {};  // {weight:.3} * {den}",
            quantize::<u8>(weight, scale)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "// Sepia transform matrix ({q})");
    for (idx, cell) in crate::quant::MATRIX_CELLS.iter().enumerate() {
        let weight = cfg.sepia_matrix[idx / 3][idx % 3];
        let _ = writeln!(
            out,
            "static constexpr uint8_t SEPIA_{cell}_{q} = {};  // {weight:.3} * {den}",
            quantize::<u8>(weight, scale)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "// Vintage (warm) adjustment");
    let _ = writeln!(
        out,
        "static constexpr uint8_t VINTAGE_WARMTH = {};",
        cfg.vintage_warmth
    );
    let _ = writeln!(
        out,
        "static constexpr uint8_t VINTAGE_FADE = {};",
        cfg.vintage_fade
    );
    let _ = writeln!(
        out,
        "static constexpr uint8_t VINTAGE_DESAT_{q} = {};  // {:.2} * {den}",
        quantize::<u8>(cfg.vintage_desaturation, scale),
        cfg.vintage_desaturation
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "// Cool adjustment");
    let _ = writeln!(
        out,
        "static constexpr uint8_t COOL_SHIFT = {};",
        cfg.cool_shift
    );
    // the contrast factor is over unity, so its quantized form needs 16 bits
    let _ = writeln!(
        out,
        "static constexpr uint16_t COOL_CONTRAST_{q} = {};  // {:.2} * {den}",
        quantize::<u16>(cfg.cool_contrast, scale),
        cfg.cool_contrast
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quant::{ElemKind, Lut};

    fn data_rows(text: &str) -> Vec<&str> {
        text.lines()
            .filter(|l| l.starts_with("    "))
            .collect::<Vec<_>>()
    }

    #[test]
    fn row_count_and_separators() {
        let lut = Lut::new("T", ElemKind::U8, (0..20).collect());
        let text = format_lut(&lut, 16);
        let rows = data_rows(&text);
        assert_eq!(rows.len(), 2); // ceil(20 / 16)
        assert!(rows[0].ends_with(','));
        assert!(!rows[1].ends_with(','));

        // exact multiple: still no trailing comma on the final row
        let lut = Lut::new("T", ElemKind::U8, (0..32).collect());
        let text_exact = format_lut(&lut, 16);
        let rows_exact = data_rows(&text_exact);
        assert_eq!(rows_exact.len(), 2);
        assert!(!rows_exact[1].ends_with(','));
    }

    #[test]
    fn literal_width_follows_element_type() {
        let narrow = Lut::new("N", ElemKind::U8, vec![0, 7, 255]);
        let text = format_lut(&narrow, 16);
        assert!(text.contains("  0,   7, 255"));
        assert!(text.contains("uint8_t N[3]"));

        let wide = Lut::new("W", ElemKind::U16, vec![0xF800, 0x07E0]);
        let text = format_lut(&wide, 16);
        assert!(text.contains("0xF800, 0x07E0"));
        assert!(text.contains("uint16_t W[2]"));
    }

    #[test]
    fn declares_count_and_type_in_comment() {
        let lut = Lut::new("GRAY_LUT_R", ElemKind::U8, vec![0; 256]);
        let text = format_lut(&lut, 16);
        assert!(text.starts_with("// GRAY_LUT_R: 256 entries, uint8_t\n"));
        assert!(text.trim_end().ends_with("};"));
    }

    #[test]
    fn formatting_is_deterministic() {
        let lut = Lut::new("T", ElemKind::U16, (0..256).map(|i| i * 17).collect());
        assert_eq!(format_lut(&lut, 12), format_lut(&lut, 12));
    }

    #[test]
    fn coefficient_block_reference_values() {
        let text = coefficient_block(&GeneratorConfig::default());
        assert!(text.contains("LUMA_R_Q8 = 77;"));
        assert!(text.contains("LUMA_G_Q8 = 150;"));
        assert!(text.contains("LUMA_B_Q8 = 29;"));
        assert!(text.contains("SEPIA_RR_Q8 = 101;"));
        assert!(text.contains("SEPIA_BB_Q8 = 34;"));
        assert!(text.contains("VINTAGE_DESAT_Q8 = 179;"));
        assert!(text.contains("uint16_t COOL_CONTRAST_Q8 = 276;"));
    }
}
