/*
 * Copyright (c) 2025 Yumechi <yume@yumechi.jp>
 *
 * Created on Sunday, May 18, 2025
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

//! Assembly of the emitted header: boilerplate, tables, coefficient
//! constants, routines, in that order, inside one namespace.
//!
//! A run assembles exactly one document for one mode and writes it once.
//! There is no partial or incremental update; the target is replaced via a
//! temp file and rename so an interrupted run never leaves a half-written
//! header for the build to pick up.

use core::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::emit::{self, DEFAULT_ROW_WIDTH, routine};
use crate::quant::{self, ElemKind, Lut, ShiftDir};
use crate::{Error, Filter, GeneratorConfig};

/// Which subset of tables and routines a run assembles.
///
/// The mode is fixed by the caller for the lifetime of the run; there are no
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every table group, the coefficient constants, and every routine.
    All,
    /// The tables (and routine, if the filter has one) for a single filter.
    Single(Filter),
    /// Coefficient constants only.
    CoefficientsOnly,
}

/// An assembled document plus a summary of what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The complete emitted text.
    pub text: String,
    /// Table groups included, in emission order.
    pub groups: Vec<&'static str>,
    /// Number of tables emitted.
    pub table_count: usize,
    /// Flash footprint of the emitted tables, in bytes.
    pub table_bytes: usize,
    /// Number of routines emitted.
    pub routine_count: usize,
}

fn gamma_table_name(gamma: f64) -> String {
    // 2.2 -> GAMMA_LUT_22
    format!("GAMMA_LUT_{}", (gamma * 10.0).round() as u32)
}

fn filter_tables(cfg: &GeneratorConfig, filter: Filter) -> Vec<Lut> {
    match filter {
        Filter::Grayscale => {
            quant::luminance_tables(&cfg.luma_weights, cfg.coeff_scale).into()
        }
        Filter::Sepia => quant::matrix_tables("SEPIA_LUT", &cfg.sepia_matrix, cfg.coeff_scale),
        Filter::Gamma => vec![
            quant::gamma_table(gamma_table_name(cfg.gamma), cfg.gamma),
            quant::gamma_table("GAMMA_LUT_INV", 1.0 / cfg.gamma),
        ],
        Filter::Vignette => vec![quant::vignette_table("VIGNETTE_LUT", cfg.vignette_size)],
    }
}

fn rgb565_pack_tables() -> Vec<Lut> {
    vec![
        quant::pack_table("RGB565_R_PACK", ElemKind::U16, 0xF8, 8, ShiftDir::Left),
        quant::pack_table("RGB565_G_PACK", ElemKind::U16, 0xFC, 3, ShiftDir::Left),
        quant::pack_table("RGB565_B_PACK", ElemKind::U8, 0xFF, 3, ShiftDir::Right),
    ]
}

fn push_prelude(out: &mut String, table_count: usize, table_bytes: usize) {
    let _ = writeln!(out, "#pragma once");
    let _ = writeln!(out, "/**");
    let _ = writeln!(
        out,
        " * @brief Precomputed lookup tables for integer-only image filters"
    );
    let _ = writeln!(out, " *");
    let _ = writeln!(out, " * GENERATED FILE - DO NOT EDIT.");
    let _ = writeln!(out, " *");
    let _ = writeln!(
        out,
        " * All tables are constexpr and resolve to flash, trading read-only"
    );
    let _ = writeln!(
        out,
        " * bytes for multiply-free arithmetic on cores without an FPU."
    );
    let _ = writeln!(
        out,
        " * Flash cost: {table_count} tables, {table_bytes} bytes."
    );
    let _ = writeln!(out, " */");
    let _ = writeln!(out);
    let _ = writeln!(out, "#include <stdint.h>");
    let _ = writeln!(out);
    let _ = writeln!(out, "// Compiler hints; a consuming build may predefine these");
    let _ = writeln!(out, "#ifndef IRAM_ATTR");
    let _ = writeln!(
        out,
        "    #define IRAM_ATTR __attribute__((section(\".iram1\")))"
    );
    let _ = writeln!(out, "#endif");
    let _ = writeln!(out, "#ifndef FORCEINLINE");
    let _ = writeln!(
        out,
        "    #define FORCEINLINE __inline__ __attribute__((always_inline))"
    );
    let _ = writeln!(out, "#endif");
    let _ = writeln!(out);
    let _ = writeln!(out, "namespace lut {{");
    let _ = writeln!(out);
}

/// Assemble the document for `mode`.
///
/// Pure: the same configuration and mode produce byte-identical text.
#[must_use]
pub fn assemble(cfg: &GeneratorConfig, mode: Mode) -> Document {
    let mut groups: Vec<&'static str> = Vec::new();
    let mut tables: Vec<Lut> = Vec::new();
    let mut routines: Vec<String> = Vec::new();
    let mut with_coefficients = false;

    match mode {
        Mode::All => {
            for filter in Filter::ALL {
                groups.push(filter.name());
                tables.extend(filter_tables(cfg, filter));
                if let Some(r) = routine::routine(filter) {
                    routines.push(r);
                }
            }
            groups.push("rgb565");
            tables.extend(rgb565_pack_tables());
            with_coefficients = true;
        }
        Mode::Single(filter) => {
            groups.push(filter.name());
            tables.extend(filter_tables(cfg, filter));
            if let Some(r) = routine::routine(filter) {
                routines.push(r);
            }
        }
        Mode::CoefficientsOnly => with_coefficients = true,
    }
    if with_coefficients {
        groups.push("coefficients");
    }

    let table_bytes = tables.iter().map(Lut::size_bytes).sum();

    let mut text = String::new();
    push_prelude(&mut text, tables.len(), table_bytes);
    for table in &tables {
        text.push_str(&emit::format_lut(table, DEFAULT_ROW_WIDTH));
        text.push('\n');
    }
    if with_coefficients {
        text.push_str(&emit::coefficient_block(cfg));
        text.push('\n');
    }
    for r in &routines {
        text.push_str(r);
        text.push('\n');
    }
    text.push_str("} // namespace lut\n");

    Document {
        text,
        groups,
        table_count: tables.len(),
        table_bytes,
        routine_count: routines.len(),
    }
}

/// Write an assembled document to `path`.
///
/// Parent directories are created as needed. The text lands in `<path>.tmp`
/// first and is renamed over the target, so a failed run leaves the previous
/// header intact. Failures carry the offending path and are never retried
/// here; retry policy belongs to the calling build system.
///
/// # Errors
///
/// [`Error::CreateDir`], [`Error::Write`], or [`Error::Rename`] on the first
/// failing I/O operation.
pub fn write(doc: &Document, path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    fs::write(&tmp, &doc.text).map_err(|source| Error::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        Error::Rename {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lutforge-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn assembly_is_deterministic() {
        let cfg = GeneratorConfig::default();
        let a = assemble(&cfg, Mode::All);
        let b = assemble(&cfg, Mode::All);
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn all_mode_inventory() {
        let doc = assemble(&GeneratorConfig::default(), Mode::All);
        // 3 luminance + 9 sepia + 2 gamma + 1 vignette + 3 rgb565
        assert_eq!(doc.table_count, 18);
        assert_eq!(doc.routine_count, 2);
        assert_eq!(
            doc.groups,
            ["grayscale", "sepia", "gamma", "vignette", "rgb565", "coefficients"]
        );
        // 15 single-byte tables of 256, two u16 pack tables, one 128-entry vignette
        assert_eq!(doc.table_bytes, 15 * 256 + 2 * 512 + 128);
        assert!(doc.text.starts_with("#pragma once\n"));
        assert!(doc.text.contains("#ifndef IRAM_ATTR"));
        assert!(doc.text.contains("#ifndef FORCEINLINE"));
        assert!(doc.text.contains("namespace lut {"));
        assert!(doc.text.trim_end().ends_with("} // namespace lut"));
        assert!(doc.text.contains("GAMMA_LUT_22"));
        assert!(doc.text.contains("GAMMA_LUT_INV"));
        assert!(doc.text.contains("RGB565_G_PACK"));
    }

    #[test]
    fn grayscale_only_document() {
        let doc = assemble(&GeneratorConfig::default(), Mode::Single(Filter::Grayscale));
        assert_eq!(doc.table_count, 3);
        assert_eq!(doc.routine_count, 1);
        assert_eq!(doc.text.matches(": 256 entries, uint8_t").count(), 3);
        for name in ["GRAY_LUT_R", "GRAY_LUT_G", "GRAY_LUT_B"] {
            assert!(doc.text.contains(name), "{name}");
        }
        assert!(doc.text.contains("filter_grayscale_lut"));
        assert!(!doc.text.contains("SEPIA"));
        assert!(!doc.text.contains("GAMMA"));
        assert!(!doc.text.contains("VIGNETTE"));
        assert!(!doc.text.contains("LUMA_R_Q8"));
    }

    #[test]
    fn coefficients_only_document() {
        let doc = assemble(&GeneratorConfig::default(), Mode::CoefficientsOnly);
        assert_eq!(doc.table_count, 0);
        assert_eq!(doc.routine_count, 0);
        assert_eq!(doc.groups, ["coefficients"]);
        assert!(doc.text.contains("LUMA_R_Q8 = 77;"));
        assert!(doc.text.contains("LUMA_G_Q8 = 150;"));
        assert!(doc.text.contains("LUMA_B_Q8 = 29;"));
        assert!(!doc.text.contains("static constexpr uint8_t GRAY_LUT_R"));
    }

    #[test]
    fn table_only_modes_have_no_routines() {
        let doc = assemble(&GeneratorConfig::default(), Mode::Single(Filter::Vignette));
        assert_eq!(doc.table_count, 1);
        assert_eq!(doc.routine_count, 0);
        assert!(doc.text.contains("VIGNETTE_LUT: 128 entries"));
    }

    #[test]
    fn write_creates_directories_and_leaves_no_temp() {
        let dir = scratch_dir("write");
        let target = dir.join("nested").join("lut_tables.hpp");
        let doc = assemble(&GeneratorConfig::default(), Mode::Single(Filter::Grayscale));

        write(&doc, &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), doc.text);
        let tmp_leftover = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .any(|e| e.path().extension().is_some_and(|x| x == "tmp"));
        assert!(!tmp_leftover);

        // a second run fully overwrites the target
        let doc2 = assemble(&GeneratorConfig::default(), Mode::CoefficientsOnly);
        write(&doc2, &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), doc2.text);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_surfaces_the_failing_path() {
        let dir = scratch_dir("write-fail");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let doc = assemble(&GeneratorConfig::default(), Mode::CoefficientsOnly);
        let err = write(&doc, &blocker.join("out.hpp")).unwrap_err();
        assert!(err.to_string().contains("blocker"), "{err}");

        let _ = fs::remove_dir_all(&dir);
    }
}
