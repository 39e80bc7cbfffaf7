//! Copyright header checks for source files and the tree's LICENSE file.

use crate::template::{Mismatch, Template, TemplateMatcher, Verdict};

/// Comment block every Python source file starts with.
pub const REFERENCE_HEADER: &str = "\
# ----------------------------------------------------------------------------
# Copyright (c) {license_date}, QIIME 2 development team.
#
# Distributed under the terms of the Modified BSD License.
#
# The full license is in the file LICENSE, distributed with this software.
# ----------------------------------------------------------------------------
";

/// Text the LICENSE file at the root of the tree must contain.
pub const REFERENCE_LICENSE: &str = "\
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

/// The first lines of `text`, sized to `template`.
///
/// A leading `#!` interpreter line is skipped. Returns `HeaderTooShort` when
/// the text holds fewer lines than the template.
pub fn candidate_block<'a>(text: &'a str, template: &Template) -> Result<Vec<&'a str>, Mismatch> {
    let mut lines = text.lines().peekable();
    if lines.peek().is_some_and(|line| line.starts_with("#!")) {
        lines.next();
    }

    let block: Vec<&str> = lines.take(template.len()).collect();
    if block.len() < template.len() {
        return Err(Mismatch::HeaderTooShort);
    }
    Ok(block)
}

/// Check the head of a source file against the reference header.
pub fn check_header(text: &str, matcher: &TemplateMatcher<'_>) -> Verdict {
    match candidate_block(text, matcher.template()) {
        Ok(block) => matcher.verify(&block),
        Err(mismatch) => Verdict::Invalid(mismatch),
    }
}

/// Check a complete LICENSE file against the reference license.
pub fn check_license(text: &str, matcher: &TemplateMatcher<'_>) -> Verdict {
    let lines: Vec<&str> = text.lines().collect();
    matcher.verify(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::YearPolicy;

    fn header_template() -> Template {
        Template::parse(REFERENCE_HEADER).unwrap()
    }

    fn policy() -> YearPolicy {
        YearPolicy::Tolerant { current_year: 2024 }
    }

    #[test]
    fn test_reference_templates_parse() {
        let header = Template::parse(REFERENCE_HEADER).unwrap();
        assert_eq!(header.len(), 7);
        assert_eq!(header.variable_line(), 1);

        let license = Template::parse(REFERENCE_LICENSE).unwrap();
        assert_eq!(license.variable_line(), 2);
    }

    #[test]
    fn test_valid_header_followed_by_code() {
        let template = header_template();
        let matcher = template.matcher(&policy()).unwrap();

        let text = format!("{}\nimport os\n", template.render("2016-2024"));

        assert_eq!(check_header(&text, &matcher), Verdict::Valid);
    }

    #[test]
    fn test_header_after_shebang() {
        let template = header_template();
        let matcher = template.matcher(&policy()).unwrap();

        let text = format!("#!/usr/bin/env python\n{}", template.render("2024"));

        assert_eq!(check_header(&text, &matcher), Verdict::Valid);
    }

    #[test]
    fn test_missing_header_is_too_short_only_when_file_is_short() {
        let template = header_template();
        let matcher = template.matcher(&policy()).unwrap();

        assert_eq!(
            check_header("", &matcher),
            Verdict::Invalid(Mismatch::HeaderTooShort)
        );
        assert_eq!(
            check_header("import os\n", &matcher),
            Verdict::Invalid(Mismatch::HeaderTooShort)
        );

        let long_without_header = "import os\n".repeat(20);
        assert_eq!(
            check_header(&long_without_header, &matcher),
            Verdict::Invalid(Mismatch::DoesNotMatch)
        );
    }

    #[test]
    fn test_truncated_header_is_too_short() {
        let template = header_template();
        let matcher = template.matcher(&policy()).unwrap();

        let full = template.render("2016-2024");
        let truncated: String = full.lines().take(5).map(|l| format!("{l}\n")).collect();

        assert_eq!(
            check_header(&truncated, &matcher),
            Verdict::Invalid(Mismatch::HeaderTooShort)
        );
    }

    #[test]
    fn test_stale_header_years() {
        let template = header_template();
        let matcher = template.matcher(&policy()).unwrap();

        let text = template.render("2016-2017");

        assert_eq!(
            check_header(&text, &matcher),
            Verdict::Invalid(Mismatch::IncorrectYears)
        );
    }

    #[test]
    fn test_crlf_header_is_valid() {
        let template = header_template();
        let matcher = template.matcher(&policy()).unwrap();

        let text = template.render("2016-2024").replace('\n', "\r\n");

        assert_eq!(check_header(&text, &matcher), Verdict::Valid);
    }

    #[test]
    fn test_license_check() {
        let template = Template::parse(REFERENCE_LICENSE).unwrap();
        let matcher = template.matcher(&policy()).unwrap();

        let good = template.render("2016-2024");
        assert_eq!(check_license(&good, &matcher), Verdict::Valid);

        let trailing = format!("{good}Extra terms.\n");
        assert_eq!(
            check_license(&trailing, &matcher),
            Verdict::Invalid(Mismatch::DoesNotMatch)
        );

        let stale = template.render("2016-2020");
        assert_eq!(
            check_license(&stale, &matcher),
            Verdict::Invalid(Mismatch::IncorrectYears)
        );
    }
}
