#![doc = include_str!("../README.md")]
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
#![warn(missing_docs, clippy::pedantic)]

use std::path::{Path, PathBuf};

pub mod emit;
pub mod hook;
pub mod quant;

pub use emit::document::{Document, Mode};

/// The supported filters.
///
/// The set is fixed and enumerable, so selection is a closed enum rather than
/// an open string key; an unsupported name never survives parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Luminance-weighted grayscale (three-table sum).
    Grayscale,
    /// 3x3 color matrix transform (nine tables, saturating sums).
    Sepia,
    /// Gamma correction curve plus its inverse.
    Gamma,
    /// Radial falloff curve.
    Vignette,
}

impl Filter {
    /// Every supported filter, in emission order.
    pub const ALL: [Self; 4] = [Self::Grayscale, Self::Sepia, Self::Gamma, Self::Vignette];

    /// The filter's name as used on the command line and in summaries.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Gamma => "gamma",
            Self::Vignette => "vignette",
        }
    }
}

impl core::fmt::Display for Filter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::UnsupportedFilter(s.to_owned()))
    }
}

/// Generation-time configuration.
///
/// One value of this is the entire input of a run: the quantizer and the
/// assembler take it by reference and share no other state, so alternate
/// weights or scales can be exercised side by side (and concurrently, for
/// distinct output paths).
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Luminance weights (R, G, B). Default is ITU-R BT.601.
    pub luma_weights: [f64; 3],
    /// Sepia transform matrix, output channel major.
    pub sepia_matrix: [[f64; 3]; 3],
    /// Gamma exponent for the correction curve pair.
    pub gamma: f64,
    /// Entry count of the radial falloff table.
    pub vignette_size: usize,
    /// Fixed-point scale for coefficients and weighted tables.
    pub coeff_scale: quant::Scale,
    /// Brightness offset for [`quant::AffineOp::Add`] tables.
    pub brightness_offset: i32,
    /// Contrast multiplier for [`quant::AffineOp::ScaleAroundMidpoint`] tables.
    pub contrast_factor: f64,
    /// Vintage warm shift (orange/yellow).
    pub vintage_warmth: u8,
    /// Vintage shadow lift.
    pub vintage_fade: u8,
    /// Vintage saturation retention factor.
    pub vintage_desaturation: f64,
    /// Cool blue shift.
    pub cool_shift: u8,
    /// Cool contrast boost factor.
    pub cool_contrast: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            luma_weights: [0.299, 0.587, 0.114],
            sepia_matrix: [
                [0.393, 0.769, 0.189],
                [0.349, 0.686, 0.168],
                [0.272, 0.534, 0.131],
            ],
            gamma: 2.2,
            vignette_size: 128,
            coeff_scale: quant::Q8,
            brightness_offset: 20,
            contrast_factor: 1.2,
            vintage_warmth: 30,
            vintage_fade: 20,
            vintage_desaturation: 0.7,
            cool_shift: 25,
            cool_contrast: 1.08,
        }
    }
}

/// Failures surfaced by the generator and the build hook.
///
/// All table computation is pure and infallible over a well-formed
/// configuration; errors arise only at the filesystem boundary and are
/// surfaced once, never retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filter name outside the supported set was requested.
    #[error("unsupported filter \"{0}\" (expected grayscale, sepia, gamma or vignette)")]
    UnsupportedFilter(String),

    /// The output directory could not be created.
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The staging file could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The staged file could not be renamed onto the target.
    #[error("failed to move generated file into place at {}", path.display())]
    Rename {
        /// Intended final path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The mods directory could not be enumerated.
    #[error("failed to scan mods directory {}", path.display())]
    Scan {
        /// Directory that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The external translator failed for one mod.
    #[error("failed to translate mod {}", path.display())]
    Translate {
        /// Source mod that failed to translate.
        path: PathBuf,
        /// Failure reported by the translator.
        source: std::io::Error,
    },
}

/// Assemble the document for `mode` and write it to `path`.
///
/// Convenience wrapper over [`emit::document::assemble`] and
/// [`emit::document::write`]; returns the assembled document so callers can
/// report what was emitted.
///
/// # Errors
///
/// Propagates the write-side errors of [`emit::document::write`].
pub fn generate(cfg: &GeneratorConfig, mode: Mode, path: &Path) -> Result<Document, Error> {
    let doc = emit::document::assemble(cfg, mode);
    emit::document::write(&doc, path)?;
    Ok(doc)
}
