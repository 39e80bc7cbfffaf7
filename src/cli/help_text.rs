pub(super) const ROOT_LONG_ABOUT: &str = "\
License and copyright header checker for QIIME 2 source trees

q2lint is a build-time gate. It checks that a source tree carries the expected
LICENSE file, that every Python source file starts with the standard copyright
header, that setup.py follows the packaging policy, and that committed web
asset bundles match what their sources build to.

CHECKS:

  LICENSE:
    The LICENSE file at the root must be the BSD 3-Clause text of the QIIME 2
    development team. Only the copyright years may vary.

  Source headers:
    Every *.py file must begin with the 7-line QIIME 2 comment header,
    optionally after a #! line. Files named _version.py or versioneer.py and
    anything under build/ are skipped. Binary files are skipped.

  Copyright years:
    By default the years must read START-CURRENT (START being any 20xx year)
    or just CURRENT, where CURRENT is this calendar year. Use --license-date to
    require one exact value instead.

  setup.py:
    Dependencies belong in the conda recipe, so a non-empty install_requires
    is an error (disable with --disable-install-requires-check). The license
    must be declared as 'BSD-3-Clause'.

  Web assets:
    For every package.json below the top level (outside node_modules), runs
    npm install and npm run build, then diffs */bundle.js with git. A changed
    bundle means it is out of sync with its sources. Skip with
    --skip-asset-build.

CONFIGURATION:

  A .q2lint.toml file at the root of the tree may set defaults:

    install_requires_check = true
    license_date = \"2016-2024\"
    skip_asset_build = false
    exclude = [\"docs\", \"vendor/*\"]

  Command line flags take precedence over the file.

EXIT STATUS:

  0    every check passed
  1    one or more checks failed; all failures are printed to stderr
  255  q2lint could not run (bad directory, malformed configuration)

EXAMPLES:

  # Check the current directory
  $ q2lint

  # Check another tree
  $ q2lint -C /path/to/q2-plugin

  # Start a new year: bump every notice, then check
  $ q2lint --update-copyright-year

  # Show which files a year bump would touch
  $ q2lint --update-copyright-year --dry-run -v
";
