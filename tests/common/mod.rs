use assert_cmd::{Command, cargo::cargo_bin_cmd};
use chrono::{Datelike, Local};
use std::fs;
use std::path::Path;

pub const HEADER: &str = "\
# ----------------------------------------------------------------------------
# Copyright (c) {license_date}, QIIME 2 development team.
#
# Distributed under the terms of the Modified BSD License.
#
# The full license is in the file LICENSE, distributed with this software.
# ----------------------------------------------------------------------------
";

pub const LICENSE: &str = "\
BSD 3-Clause License

Copyright (c) {license_date}, QIIME 2 development team.
All rights reserved.

Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:

* Redistributions of source code must retain the above copyright notice, this
  list of conditions and the following disclaimer.

* Redistributions in binary form must reproduce the above copyright notice,
  this list of conditions and the following disclaimer in the documentation
  and/or other materials provided with the distribution.

* Neither the name of the copyright holder nor the names of its
  contributors may be used to endorse or promote products derived from
  this software without specific prior written permission.

THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS \"AS IS\"
AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
";

pub fn q2lint_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("q2lint");
    cmd.arg("-C").arg(cwd);
    cmd
}

pub fn current_year() -> i32 {
    Local::now().year()
}

// Each integration test file is compiled as its own crate. The year_bump tests
// build their own trees, so the clean-tree helpers are unused there.
/// Years string accepted by the default check.
#[allow(dead_code)]
pub fn valid_years() -> String {
    format!("2016-{}", current_year())
}

pub fn header(years: &str) -> String {
    HEADER.replace("{license_date}", years)
}

pub fn license(years: &str) -> String {
    LICENSE.replace("{license_date}", years)
}

/// A tree with a valid LICENSE and one Python module with a valid header.
#[allow(dead_code)]
pub fn write_clean_tree(root: &Path) {
    fs::write(root.join("LICENSE"), license(&valid_years())).unwrap();
    fs::create_dir_all(root.join("q2_example")).unwrap();
    fs::write(
        root.join("q2_example/__init__.py"),
        format!("{}\n__version__ = '0.0.1'\n", header(&valid_years())),
    )
    .unwrap();
}
