// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 阻塞式文件工具，异步上下文中应通过 `spawn_blocking` 调用

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};

/// 文件名是否为 gzip 压缩（大小写不敏感）
pub fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// 解压 `x.gz` 为 `x`，并删除压缩文件
///
/// # 返回值
///
/// 解压后的文件路径
pub fn gunzip_file(path: &Path) -> io::Result<PathBuf> {
    let target = path.with_extension("");
    if target == path {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no extension to strip", path.display()),
        ));
    }

    let mut decoder = GzDecoder::new(BufReader::new(File::open(path)?));
    let mut writer = BufWriter::new(File::create(&target)?);
    io::copy(&mut decoder, &mut writer)?;
    drop(writer);

    fs::remove_file(path)?;
    Ok(target)
}

pub fn file_size(path: &Path) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// 计算文件的 sha256 十六进制摘要
pub fn checksum(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// 删除文件，文件不存在时视为成功
pub fn delete_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
