/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::fs::{self,File};
use std::io::{Read,Write,ErrorKind::*};
use std::time::{SystemTime,Duration};
use std::path::{Path,PathBuf};
use tempfile::NamedTempFile;

use crate::{if_let, io_error};

type Result<T> = std::result::Result<T,std::io::Error>;

/// check if dir pathname exists and is writable, try to create dir otherwise
pub fn ensure_writable_dir (path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        let md = fs::metadata(&path)?;
        if md.permissions().readonly() {
            Err(io_error!(PermissionDenied, "output_dir {:?} not writable", &path))
        } else {
            Ok(())
        }

    } else {
        fs::create_dir_all(path)
    }
}

/// the directory a file path lives in. Bare filenames resolve to the current dir
pub fn parent_dir (path: impl AsRef<Path>) -> PathBuf {
    match path.as_ref().parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from(".")
    }
}

pub fn file_length <P: AsRef<Path>> (path: P) -> Option<u64> {
    fs::metadata(path).ok().map( |meta| meta.len())
}

pub fn get_modified_timestamp <P: AsRef<Path>> (path: P) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then( |meta| meta.modified().ok())
}

/// time since last modification of file, None if there is no such file.
/// Modification times in the future are reported as zero age
pub fn file_age <P: AsRef<Path>> (path: P) -> Option<Duration> {
    if_let! {
        Some(t) = { get_modified_timestamp(path) } else { None } => {
            Some( SystemTime::now().duration_since(t).unwrap_or(Duration::ZERO) )
        }
    }
}

pub fn filepath_contents <P: AsRef<Path>> (path: &P) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// write contents to a temp file within the target dir and rename it once complete, which keeps
/// readers from ever seeing partially written files
pub fn write_file_atomically <P: AsRef<Path>> (path: P, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = parent_dir(path);
    ensure_writable_dir(&dir)?;

    let mut file = NamedTempFile::new_in(&dir)?; // same file system, so we can rename
    file.write_all(contents)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// remove file if it exists. Answer if there was something to remove
pub fn remove_file_if_exists <P: AsRef<Path>> (path: P) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == NotFound => Ok(false),
        Err(e) => Err(e)
    }
}
