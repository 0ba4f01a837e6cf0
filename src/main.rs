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

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};
use lutforge::{Filter, GeneratorConfig, Mode, emit::document};

fn build_cli() -> Command {
    Command::new("lutforge")
        .about("Generate fixed-point lookup tables and filter routines for FPU-less targets")
        .long_about(
            "\
Converts floating-point image-filter formulas (luminance weighting, color\n\
matrices, gamma curves, radial falloff, RGB565 packing) into flash-resident\n\
constexpr tables plus unrolled filter routines, emitted as one C++ header.\n\
\n\
Every run is a pure function of its configuration: identical invocations\n\
produce byte-identical output, so the result is safe to cache and diff.",
        )
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("all")
                .long("all")
                .help("Emit every table group, the coefficient constants and all routines")
                .long_help(
                    "Emit every table group, the coefficient constants and all routines. \
                     This is also the default when no selection flag is given.",
                )
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["filter", "coefficients"]),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .help("Emit the tables (and routine, if any) for a single filter")
                .value_parser(["grayscale", "sepia", "gamma", "vignette"])
                .conflicts_with("coefficients"),
        )
        .arg(
            Arg::new("coefficients")
                .long("coefficients")
                .help("Emit the fixed-point coefficient constants only, no tables")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .long_help(
                    "Output file path. Parent directories are created; the file is \
                     replaced atomically via a temp file in the same directory.",
                )
                .default_value("lut_tables.hpp"),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let mode = if matches.get_flag("coefficients") {
        Mode::CoefficientsOnly
    } else if let Some(name) = matches.get_one::<String>("filter") {
        match name.parse::<Filter>() {
            Ok(filter) => Mode::Single(filter),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(255);
            }
        }
    } else {
        Mode::All
    };

    let output = PathBuf::from(matches.get_one::<String>("output").expect("has default"));
    let cfg = GeneratorConfig::default();

    let doc = document::assemble(&cfg, mode);
    if let Err(e) = document::write(&doc, &output) {
        eprintln!("{e}");
        std::process::exit(5);
    }

    println!("generated {}", output.display());
    println!(
        "  groups: {}; {} tables ({} bytes of flash), {} routine(s)",
        doc.groups.join(", "),
        doc.table_count,
        doc.table_bytes,
        doc.routine_count
    );
}
