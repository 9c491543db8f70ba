// This file is part of orcagen, a generator of typed clients for the Orca screen reader's D-Bus service.
//
// Copyright 2026 The orcagen contributors
//
// SPDX-License-Identifier: GPL-3.0-only
//
// orcagen is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// orcagen is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

//! Error Wrapping File System I/O Helpers
//!
//! Generated clients are written through [`write_artifact`], which never leaves a partially
//! written file at the destination: the text goes to a hidden sibling first and is renamed into
//! place once it is complete. Failures are converted to [`OrcaGenError::IOWrite`] and
//! [`OrcaGenError::IORename`] with the paths involved.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use orcagen::system_io::write_artifact;
//! # use std::path::Path;
//!
//! # fn example() -> Result<(), orcagen::OrcaGenError> {
//! write_artifact(Path::new("src/orca_client.rs"), "// @generated by orcagen\n")?;
//! # Ok(())
//! # }
//! ```

use crate::error::OrcaGenError;
use log::{trace, warn};
use std::fs::{OpenOptions, remove_file, rename};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Hidden sibling of `file_path` used while writing, e.g. `out/.client.rs.tmp`.
fn temporary_sibling(file_path: &Path) -> PathBuf {
    let name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    file_path.with_file_name(format!(".{name}.tmp"))
}

/// Write `contents` to a new file, replacing anything already there.
///
/// # Returns: `Result<(), OrcaGenError>`
/// * `Ok(())` - Write succeeded
/// * `Err(OrcaGenError::IOWrite)` - The file could not be created or written
pub fn fs_write(file_path: &Path, contents: &str) -> Result<(), OrcaGenError> {
    trace!("Attempting to write {} byte(s) to {file_path:?}", contents.len());
    let result = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(file_path)
        .and_then(|mut f| {
            f.write_all(contents.as_bytes())?;
            f.sync_all()
        });
    match result {
        Ok(_) => {
            trace!("Write done.");
            Ok(())
        }
        Err(e) => Err(OrcaGenError::IOWrite {
            file: file_path.into(),
            e,
        }),
    }
}

/// Move `from` over `to`.
///
/// # Returns: `Result<(), OrcaGenError>`
/// * `Ok(())` - `to` now has the contents of `from`
/// * `Err(OrcaGenError::IORename)` - The rename failed; both paths are left as they were
pub fn fs_rename(from: &Path, to: &Path) -> Result<(), OrcaGenError> {
    trace!("Attempting to rename {from:?} to {to:?}");
    rename(from, to).map_err(|e| OrcaGenError::IORename {
        from: from.into(),
        to: to.into(),
        e,
    })
}

/// Write a generated artifact so that `file_path` holds either its previous contents or all of
/// `contents`, never a prefix of them.
///
/// # Arguments
///
/// * `file_path` - Destination of the artifact; its directory must exist
/// * `contents` - Complete text of the artifact
///
/// # Returns: `Result<(), OrcaGenError>`
/// * `Ok(())` - The artifact is in place
/// * `Err(OrcaGenError::IOWrite)` - The temporary file could not be written
/// * `Err(OrcaGenError::IORename)` - The temporary file could not be moved into place
pub fn write_artifact(file_path: &Path, contents: &str) -> Result<(), OrcaGenError> {
    let temporary = temporary_sibling(file_path);
    let result = fs_write(&temporary, contents).and_then(|_| fs_rename(&temporary, file_path));
    if result.is_err() && temporary.exists() {
        if let Err(e) = remove_file(&temporary) {
            warn!("Could not remove {temporary:?}: {e}");
        }
    }
    result
}

#[cfg(test)]
mod test_write_artifact {
    use crate::system_io::{temporary_sibling, write_artifact};
    use googletest::prelude::*;
    use std::fs;
    use std::path::Path;

    #[gtest]
    fn sibling_is_hidden_next_to_the_target() {
        assert_that!(
            temporary_sibling(Path::new("out/client.rs")),
            eq(Path::new("out/.client.rs.tmp"))
        );
    }

    #[gtest]
    fn writes_and_replaces() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let target = dir.path().join("client.rs");
        fs::write(&target, "old").expect("seed file");

        assert_that!(write_artifact(&target, "new contents"), ok(anything()));
        assert_that!(
            fs::read_to_string(&target).expect("target readable"),
            eq("new contents")
        );
        assert_that!(temporary_sibling(&target).exists(), eq(false));
    }

    #[gtest]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let target = dir.path().join("missing").join("client.rs");

        assert_that!(
            write_artifact(&target, "text"),
            err(displays_as(contains_substring("OrcaGenError::IOWrite")))
        );
        assert_that!(target.exists(), eq(false));
    }

    #[gtest]
    fn failed_rename_keeps_the_old_target_and_cleans_up() {
        let dir = tempfile::tempdir().expect("temporary directory");
        // renaming a file over a non-empty directory fails
        let target = dir.path().join("client.rs");
        fs::create_dir(&target).expect("blocking directory");
        fs::write(target.join("keep"), "kept").expect("seed file");

        assert_that!(
            write_artifact(&target, "text"),
            err(displays_as(contains_substring("OrcaGenError::IORename")))
        );
        assert_that!(target.join("keep").exists(), eq(true));
        assert_that!(temporary_sibling(&target).exists(), eq(false));
    }
}
