//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A stand-in for shellcheck: reports SC2164 for every `cd` line without `||`.
///
/// Each invocation appends its arguments to `calls.log` next to the script.
const FAKE_SHELLCHECK: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "ShellCheck - shell script analysis tool"
    echo "version: __VERSION__"
    exit 0
fi
for arg; do script="$arg"; done
echo "$*" >> "$(dirname "$0")/calls.log"
awk 'BEGIN { printf "[" }
/^cd / && !/\|\|/ {
    printf "%s{\"file\":\"-\",\"line\":%d,\"endLine\":%d,\"column\":1,\"endColumn\":3,\"level\":\"warning\",\"code\":2164,\"message\":\"Use cd ... || exit in case cd fails.\"}", sep, NR, NR
    sep = ","
}
END { print "]" }' "$script"
exit 1
"#;

/// Write an executable fake linter reporting `version` into `dir`.
#[cfg(unix)]
pub fn fake_shellcheck(dir: &Path, version: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-shellcheck");
    fs::write(&path, FAKE_SHELLCHECK.replace("__VERSION__", version)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Arguments of every fake linter invocation, one line per call.
pub fn recorded_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .map(|log| log.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// An installation page with one unguarded `cd` on line 6, column 6.
pub const INSTALL_RST: &str = "Install
=======

.. code-block:: bash

   $ cd mydir
   $ ./configure
   checking for gcc... yes
";

pub const CLEAN_RST: &str = "Usage
=====

.. code-block:: sh

   $ cd build || exit
   $ make
";
